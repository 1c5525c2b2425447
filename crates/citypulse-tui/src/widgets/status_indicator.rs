//! Status dots: device online/offline and simulation clock state.

use ratatui::style::Style;
use ratatui::text::Span;

use citypulse_core::{ClockState, DeviceStatus, Visibility};

use crate::theme;

/// Returns a styled `Span` with the device status dot.
pub fn status_span(status: DeviceStatus) -> Span<'static> {
    let (symbol, color) = match status {
        DeviceStatus::Online => ("●", theme::SUCCESS_GREEN),
        DeviceStatus::Offline => ("○", theme::ERROR_RED),
    };
    Span::styled(symbol, Style::default().fg(color))
}

/// Clock indicator for the status bar. A hidden terminal reads differently
/// from an explicit pause so the user can tell why nothing moves.
pub fn clock_span(state: ClockState, visibility: Visibility, held: bool) -> Span<'static> {
    match (state, held, visibility) {
        (ClockState::Running, _, _) => {
            Span::styled("● live", Style::default().fg(theme::SUCCESS_GREEN))
        }
        (ClockState::Paused, true, _) => {
            Span::styled("◐ paused", Style::default().fg(theme::ELECTRIC_YELLOW))
        }
        (ClockState::Paused, false, Visibility::Hidden) => {
            Span::styled("○ hidden", Style::default().fg(theme::BORDER_GRAY))
        }
        (ClockState::Paused, false, Visibility::Visible) => {
            Span::styled("◐ paused", Style::default().fg(theme::BORDER_GRAY))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clock_labels() {
        let live = clock_span(ClockState::Running, Visibility::Visible, false);
        assert_eq!(live.content, "● live");
        let hidden = clock_span(ClockState::Paused, Visibility::Hidden, false);
        assert_eq!(hidden.content, "○ hidden");
        let held = clock_span(ClockState::Paused, Visibility::Hidden, true);
        assert_eq!(held.content, "◐ paused");
    }
}
