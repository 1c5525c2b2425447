//! Catalog command handler.

use std::fmt::Write as _;

use tabled::Tabled;

use citypulse_core::{DeviceCatalog, DeviceType};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output;

use super::Context;

#[derive(Tabled)]
struct CatalogRow {
    #[tabled(rename = "Tag")]
    tag: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Icon")]
    icon: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Color")]
    color: String,
}

impl CatalogRow {
    fn new(t: &DeviceType) -> Self {
        Self {
            tag: t.kind.to_string(),
            name: t.name.clone(),
            icon: t.icon.clone(),
            count: t.count,
            color: t.color.clone(),
        }
    }
}

pub fn handle(ctx: &Context) -> Result<(), CliError> {
    let out = render(&ctx.simulation.catalog, ctx.format)?;
    ctx.print(&out);
    Ok(())
}

fn render(catalog: &DeviceCatalog, format: OutputFormat) -> Result<String, CliError> {
    let mut out = output::render_list(
        format,
        catalog.entries(),
        CatalogRow::new,
        |t| t.kind.to_string(),
    )?;
    if format == OutputFormat::Table {
        let _ = write!(out, "\nTotal devices: {}", catalog.total_count());
    }
    Ok(out)
}
