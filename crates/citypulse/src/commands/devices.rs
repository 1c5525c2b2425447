//! Device command handlers.

use std::fmt::Write as _;
use std::sync::Arc;

use tabled::Tabled;

use citypulse_core::{Device, DeviceFilter};

use crate::cli::{DeviceArgs, DevicesArgs};
use crate::error::CliError;
use crate::output;

use super::Context;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "District")]
    district: String,
    #[tabled(rename = "Battery")]
    battery: String,
}

impl DeviceRow {
    fn new(d: &Device, color: bool) -> Self {
        Self {
            id: d.id.to_string(),
            name: d.name.clone(),
            kind: format!("{} {}", d.icon, d.kind),
            status: output::status_label(d.status, color),
            district: d.location.district.clone(),
            battery: d.battery.map(|b| format!("{b}%")).unwrap_or_default(),
        }
    }
}

// ── Detail view ─────────────────────────────────────────────────────

fn detail(d: &Device, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", d.icon, d.name);
    let _ = writeln!(out, "  ID:          {}", d.id);
    let _ = writeln!(out, "  Type:        {}", d.kind_label());
    let _ = writeln!(out, "  Status:      {}", output::status_label(d.status, color));
    let _ = writeln!(out, "  Location:    {}, {}", d.location.address, d.location.district);
    let _ = writeln!(
        out,
        "  Grid:        ({}, {})",
        d.location.point.x, d.location.point.y
    );
    if let Some(battery) = d.battery {
        let _ = writeln!(out, "  Battery:     {battery}%");
    }
    let _ = writeln!(
        out,
        "  Last Update: {}",
        d.last_update.format("%Y-%m-%d %H:%M:%S")
    );
    for (label, value) in d.payload.fields() {
        let _ = writeln!(out, "  {:<13}{value}", format!("{label}:"));
    }
    out.trim_end().to_owned()
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn list(args: &DevicesArgs, ctx: &Context) -> Result<(), CliError> {
    let filter: DeviceFilter = args.filter.parse()?;
    let engine = ctx.engine()?;

    let devices: Vec<Arc<Device>> = engine
        .state()
        .registry()
        .by_filter(filter)
        .filter(|d| !args.offline || !d.is_online())
        .cloned()
        .collect();
    tracing::debug!(%filter, count = devices.len(), "listing devices");

    let out = output::render_list(
        ctx.format,
        &devices,
        |d| DeviceRow::new(d, ctx.color),
        |d| d.id.to_string(),
    )?;
    ctx.print(&out);
    Ok(())
}

pub fn show(args: &DeviceArgs, ctx: &Context) -> Result<(), CliError> {
    let engine = ctx.engine()?;
    let device = engine.state().select_device(&args.id)?;

    let out = output::render_single(
        ctx.format,
        device.as_ref(),
        |d| detail(d, ctx.color),
        |d| d.id.to_string(),
    )?;
    ctx.print(&out);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use citypulse_core::{SimulationConfig, Engine};

    fn first_of(tag: &str) -> Arc<Device> {
        let engine = Engine::new(&SimulationConfig::seeded(11)).unwrap();
        let filter: DeviceFilter = tag.parse().unwrap();
        engine.state().registry().by_filter(filter).next().cloned().unwrap()
    }

    #[test]
    fn mains_powered_rows_leave_battery_blank() {
        let row = DeviceRow::new(&first_of("street_light"), false);
        assert!(row.battery.is_empty());
        assert_eq!(row.id, "street_light_1521");
    }

    #[test]
    fn battery_rows_show_percentage() {
        let row = DeviceRow::new(&first_of("air_sensor"), false);
        assert!(row.battery.ends_with('%'));
    }

    #[test]
    fn detail_lists_payload_fields() {
        let text = detail(&first_of("traffic_light"), false);
        assert!(text.contains("traffic_light_001"));
        assert!(text.contains("Current State:"));
        assert!(!text.contains("Battery:"));
    }
}
