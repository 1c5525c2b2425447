//! Analytics handler.

use tabled::Tabled;

use citypulse_core::model::AnalyticsSeries;
use citypulse_core::{AnalyticsRange, AnalyticsView};

use crate::cli::AnalyticsArgs;
use crate::error::CliError;
use crate::output;

use super::Context;

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Day")]
    day: &'static str,
    #[tabled(rename = "Uptime %")]
    uptime: String,
    #[tabled(rename = "Latency ms")]
    latency: String,
    #[tabled(rename = "Data TB")]
    data: String,
}

fn rows(view: &AnalyticsView) -> Vec<DayRow> {
    view.labels
        .iter()
        .enumerate()
        .map(|(i, &day)| DayRow {
            day,
            uptime: format!("{:.1}", view.uptime_pct[i]),
            latency: format!("{:.0}", view.latency_ms[i]),
            data: format!("{:.1}", view.data_volume_tb[i]),
        })
        .collect()
}

pub fn handle(args: &AnalyticsArgs, ctx: &Context) -> Result<(), CliError> {
    let range: AnalyticsRange = args.range.parse()?;
    let view = AnalyticsView::project(&AnalyticsSeries::default(), range);

    let out = output::render_single(
        ctx.format,
        &view,
        |v| {
            let table = tabled::Table::new(rows(v))
                .with(tabled::settings::Style::rounded())
                .to_string();
            format!("Analytics ({})\n{table}", v.range)
        },
        |v| v.range.to_string(),
    )?;
    ctx.print(&out);
    Ok(())
}
