//! Analytics screen: uptime and latency line charts plus daily data volume,
//! for the selected range.
//!
//! Layout:
//! ┌─ Analytics ── [7d]  30d  90d ──────────────────────────────────┐
//! │ ┌─ Uptime % ──────────────────┐ ┌─ Latency ms ─────────────────┐│
//! │ └─────────────────────────────┘ └──────────────────────────────┘│
//! │ ┌─ Data Volume TB ─────────────────────────────────────────────┐│
//! │ └──────────────────────────────────────────────────────────────┘│
//! ├─ r cycle range ─────────────────────────────────────────────────┤

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph,
};

use citypulse_core::{AnalyticsRange, AnalyticsView};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::sub_tabs;

/// Ranges in selector order.
const RANGES: [AnalyticsRange; 3] = [
    AnalyticsRange::Week,
    AnalyticsRange::Month,
    AnalyticsRange::Quarter,
];

pub struct AnalyticsScreen {
    focused: bool,
    view: Option<AnalyticsView>,
    uptime: Vec<(f64, f64)>,
    latency: Vec<(f64, f64)>,
}

/// Index the weekday series along the x axis.
fn points(series: &[f64; 7]) -> Vec<(f64, f64)> {
    series
        .iter()
        .zip(0u8..)
        .map(|(&v, i)| (f64::from(i), v))
        .collect()
}

/// Y bounds padded around the data so flat series stay visible.
fn bounds(series: &[(f64, f64)], pad: f64) -> [f64; 2] {
    let (lo, hi) = series
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
    if lo > hi {
        return [0.0, 1.0];
    }
    [(lo - pad).floor(), (hi + pad).ceil()]
}

/// Data volume bars use hundredths of a terabyte so they stay integral.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
fn centi(tb: f64) -> u64 {
    (tb * 100.0).round().max(0.0) as u64
}

impl AnalyticsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            view: None,
            uptime: Vec::new(),
            latency: Vec::new(),
        }
    }

    fn range_index(range: AnalyticsRange) -> usize {
        RANGES.iter().position(|&r| r == range).unwrap_or(0)
    }

    fn render_line_chart(
        frame: &mut Frame,
        area: Rect,
        title: &str,
        data: &[(f64, f64)],
        color: Color,
        pad: f64,
    ) {
        let block = Block::default()
            .title(format!(" {title} "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let y = bounds(data, pad);
        let dataset = Dataset::default()
            .name(title.to_owned())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(color))
            .data(data);

        let chart = Chart::new(vec![dataset])
            .block(block)
            .x_axis(
                Axis::default()
                    .bounds([0.0, 6.0])
                    .labels(citypulse_core::model::analytics::WEEKDAYS.to_vec())
                    .style(Style::default().fg(theme::BORDER_GRAY)),
            )
            .y_axis(
                Axis::default()
                    .bounds(y)
                    .labels(vec![format!("{:.0}", y[0]), format!("{:.0}", y[1])])
                    .style(Style::default().fg(theme::BORDER_GRAY)),
            );
        frame.render_widget(chart, area);
    }

    fn render_volume(view: &AnalyticsView, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Data Volume (TB) ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let bars: Vec<Bar> = view
            .labels
            .iter()
            .zip(view.data_volume_tb)
            .map(|(&day, tb)| {
                Bar::default()
                    .label(Line::from(day))
                    .value(centi(tb))
                    .text_value(format!("{tb:.1}"))
                    .style(Style::default().fg(theme::ELECTRIC_PURPLE))
            })
            .collect();

        let chart = BarChart::default()
            .block(block)
            .data(BarGroup::default().bars(&bars))
            .bar_width(5)
            .bar_gap(2);
        frame.render_widget(chart, area);
    }
}

impl Component for AnalyticsScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SnapshotUpdated(snapshot) = action {
            if self.view.as_ref() != Some(&snapshot.analytics) {
                self.uptime = points(&snapshot.analytics.uptime_pct);
                self.latency = points(&snapshot.analytics.latency_ms);
                self.view = Some(snapshot.analytics.clone());
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Analytics ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(view) = &self.view else {
            return;
        };

        let layout = Layout::vertical([
            Constraint::Length(1),      // range selector
            Constraint::Percentage(55), // line charts
            Constraint::Min(6),         // data volume
            Constraint::Length(1),      // hints
        ])
        .split(inner);

        let labels = RANGES.map(|r| r.to_string());
        frame.render_widget(
            Paragraph::new(sub_tabs::render_sub_tabs(&labels, Self::range_index(view.range))),
            layout[0],
        );

        let charts = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(layout[1]);
        Self::render_line_chart(frame, charts[0], "Uptime %", &self.uptime, theme::SUCCESS_GREEN, 0.5);
        Self::render_line_chart(frame, charts[1], "Latency ms", &self.latency, theme::NEON_CYAN, 2.0);
        Self::render_volume(view, frame, layout[2]);

        let hints = Line::from(vec![
            Span::styled("  r ", theme::key_hint_key()),
            Span::styled("cycle range", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[3]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
