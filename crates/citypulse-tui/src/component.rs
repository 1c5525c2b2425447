//! The screen contract shared by Overview, City Map and Analytics.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::action::Action;

/// A screen holds the latest snapshot it was given and draws from it.
/// It never talks to the dashboard; intents go back out as actions.
pub trait Component: Send {
    /// Keys the app did not claim as global shortcuts.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// React to a dispatched action, optionally queueing another.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect);

    fn set_focused(&mut self, _focused: bool) {}

    /// `true` while Esc means something local, such as closing a popup.
    fn captures_escape(&self) -> bool {
        false
    }
}
