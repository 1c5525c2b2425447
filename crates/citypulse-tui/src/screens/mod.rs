//! Screen implementations. Each screen is a top-level Component.

pub mod analytics;
pub mod map;
pub mod overview;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create screen components for the tab bar.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Overview, Box::new(overview::OverviewScreen::new())),
        (ScreenId::Map, Box::new(map::MapScreen::new())),
        (ScreenId::Analytics, Box::new(analytics::AnalyticsScreen::new())),
    ]
}

/// Shared test helpers.
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use citypulse_core::{DashboardSnapshot, Engine, SimulationConfig};

    use crate::component::Component;

    /// Snapshot of a seeded session after `ticks` ticks.
    pub fn snapshot(ticks: u64) -> Arc<DashboardSnapshot> {
        let mut engine = Engine::new(&SimulationConfig::seeded(7)).unwrap_or_else(|e| {
            panic!("default config must be valid: {e}");
        });
        Arc::new(engine.run_ticks(ticks))
    }

    /// Render a component into an in-memory terminal and return its text.
    pub fn render_text(component: &dyn Component, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height))
            .unwrap_or_else(|e| panic!("test backend: {e}"));
        terminal
            .draw(|frame| component.render(frame, frame.area()))
            .unwrap_or_else(|e| panic!("draw: {e}"));
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(usize::from(width))
            .map(|row| row.iter().map(ratatui::buffer::Cell::symbol).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
