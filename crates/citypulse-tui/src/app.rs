//! Application core: event loop, screen management, action dispatch.
//!
//! User intents become [`Action`]s; the ones that change dashboard state
//! are forwarded to the [`Dashboard`], whose published snapshots come back
//! through the data bridge as `SnapshotUpdated`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use citypulse_core::{CoreError, Dashboard, DashboardSnapshot, DeviceFilter, DeviceKind, Visibility};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::data_bridge::spawn_data_bridge;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::status_indicator;

/// Top-level application state and event loop.
pub struct App {
    dashboard: Dashboard,
    /// Current active screen.
    active_screen: ScreenId,
    /// All screen components, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Whether the app should keep running.
    running: bool,
    /// Help overlay visibility.
    help_visible: bool,
    /// Latest snapshot, for the status bar and key handling.
    snapshot: Arc<DashboardSnapshot>,
    /// Explicit pause from the `p` key.
    held: bool,
    visibility: Visibility,
    notification: Option<Notification>,
    /// Terminal size for responsive layout.
    terminal_size: (u16, u16),
    /// Action sender: the data bridge and follow-ups dispatch through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver: main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let mut screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();
        if let Some(screen) = screens.get_mut(&ScreenId::default()) {
            screen.set_focused(true);
        }

        Self {
            snapshot: dashboard.snapshot(),
            dashboard,
            active_screen: ScreenId::default(),
            screens,
            running: true,
            help_visible: false,
            held: false,
            visibility: Visibility::Visible,
            notification: None,
            terminal_size: (0, 0),
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::enter()?;
        self.terminal_size = tui.size().unwrap_or((80, 24));

        self.dashboard.start().await?;
        let bridge_cancel = CancellationToken::new();
        let bridge = tokio::spawn(spawn_data_bridge(
            self.dashboard.snapshots(),
            self.action_tx.clone(),
            bridge_cancel.clone(),
        ));

        let mut events = EventReader::new(Duration::from_millis(100));
        info!("TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action
            let action = match event {
                Event::Key(key) => self.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                Event::Focus(visibility) => Some(Action::SetVisibility(visibility)),
                Event::Render => Some(Action::Render),
            };
            if let Some(action) = action {
                self.action_tx.send(action)?;
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action).await?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        bridge_cancel.cancel();
        let _ = bridge.await;
        self.dashboard.stop().await?;
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen component.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            // In help mode, Esc or ? closes help
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(match key.code {
                KeyCode::Char('c') => Some(Action::Quit),
                _ => None,
            });
        }

        // Esc belongs to the screen while it has a popup open; otherwise
        // it dismisses the status-bar notification.
        if key.code == KeyCode::Esc {
            let captured = match self.screens.get(&self.active_screen) {
                Some(screen) => screen.captures_escape(),
                None => false,
            };
            if !captured {
                self.notification = None;
                return Ok(None);
            }
        }

        let action = match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('?') => Action::ToggleHelp,

            // Screen navigation via number keys
            KeyCode::Char(c @ '1'..='3') => {
                let n = c.to_digit(10).and_then(|d| u8::try_from(d).ok());
                match n.and_then(ScreenId::from_number) {
                    Some(screen) => Action::SwitchScreen(screen),
                    None => return Ok(None),
                }
            }
            KeyCode::Tab => Action::SwitchScreen(self.active_screen.next()),
            KeyCode::BackTab => Action::SwitchScreen(self.active_screen.prev()),

            // Dashboard intents
            KeyCode::Char('p') => Action::TogglePause,
            KeyCode::Char('c') => Action::ClearInfoAlerts,
            KeyCode::Char('f') => Action::SetFilter(self.cycled_filter(true)),
            KeyCode::Char('F') => Action::SetFilter(self.cycled_filter(false)),
            KeyCode::Char('0') => Action::SetFilter(DeviceFilter::All),
            KeyCode::Char('r') => Action::ChangeAnalyticsRange(self.snapshot.analytics.range.next()),

            // Everything else belongs to the active screen
            _ => {
                return match self.screens.get_mut(&self.active_screen) {
                    Some(screen) => screen.handle_key_event(key),
                    None => Ok(None),
                };
            }
        };
        Ok(Some(action))
    }

    fn cycled_filter(&self, forward: bool) -> DeviceFilter {
        let order: Vec<DeviceKind> = self.snapshot.catalog.entries().iter().map(|t| t.kind).collect();
        self.snapshot.filter.cycle(&order, forward)
    }

    /// Process a single action: update app state, forward intents to the
    /// dashboard, and propagate to components.
    async fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Resize(w, h) => {
                self.terminal_size = (*w, *h);
            }

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            // Every screen keeps the latest snapshot, visible or not
            Action::SnapshotUpdated(snapshot) => {
                self.snapshot = Arc::clone(snapshot);
                for screen in self.screens.values_mut() {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            Action::SetFilter(filter) => {
                if let Err(e) = self.dashboard.set_filter(*filter).await {
                    self.intent_failed(&e);
                }
            }

            Action::ClearInfoAlerts => match self.dashboard.clear_info_alerts().await {
                Ok(removed) => {
                    self.notification = Some(Notification::info(format!(
                        "Cleared {removed} info alert{}",
                        if removed == 1 { "" } else { "s" }
                    )));
                }
                Err(e) => self.intent_failed(&e),
            },

            Action::ChangeAnalyticsRange(range) => {
                if let Err(e) = self.dashboard.change_analytics_range(*range).await {
                    self.intent_failed(&e);
                }
            }

            Action::TogglePause => {
                let held = !self.held;
                match self.dashboard.set_paused(held).await {
                    Ok(state) => {
                        self.held = held;
                        debug!(held, %state, "pause toggled");
                    }
                    Err(e) => self.intent_failed(&e),
                }
            }

            Action::SetVisibility(visibility) => {
                match self.dashboard.set_visibility(*visibility).await {
                    Ok(state) => {
                        self.visibility = *visibility;
                        debug!(%visibility, %state, "terminal focus changed");
                    }
                    Err(e) => self.intent_failed(&e),
                }
            }

            Action::SelectDevice(id) => match self.dashboard.select_device(id) {
                Ok(device) => self.action_tx.send(Action::DeviceSelected(device))?,
                Err(e) => {
                    self.notification = Some(Notification::warning(e.to_string()));
                }
            },

            Action::Notify(notification) => {
                self.notification = Some(notification.clone());
            }

            // Render is handled in the main loop, not here
            Action::Render => {}

            // Propagate everything else to the active screen
            other => {
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    if let Some(follow_up) = screen.update(other)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn intent_failed(&mut self, err: &CoreError) {
        warn!(error = %err, "dashboard command failed");
        self.notification = Some(Notification::error(err.to_string()));
    }

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: [screen content] [tab bar] [status bar]
        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }
        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    /// Render the bottom tab bar showing all screens.
    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                // Narrow terminals get numbers only
                let label = if self.terminal_size.0 < 60 {
                    format!(" {} ", id.number())
                } else {
                    format!(" {} {} ", id.number(), id.label())
                };
                Line::from(Span::styled(label, style))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    /// Render the bottom status bar: clock, tick, filter, notification, hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let snap = &self.snapshot;
        let period = humantime::format_duration(self.dashboard.config().tick_interval);

        let mut spans = vec![
            Span::raw(" "),
            status_indicator::clock_span(snap.clock, self.visibility, self.held),
            Span::styled(format!(" │ tick {} every {period}", snap.tick), theme::key_hint()),
            Span::styled(format!(" │ filter {}", snap.filter), theme::key_hint()),
        ];

        if let Some(n) = &self.notification {
            let color = match n.level {
                NotificationLevel::Info => theme::NEON_CYAN,
                NotificationLevel::Warning => theme::ELECTRIC_YELLOW,
                NotificationLevel::Error => theme::ERROR_RED,
            };
            spans.push(Span::styled(format!(" │ {}", n.message), Style::default().fg(color)));
        }

        spans.push(Span::styled(" │ ? help  q quit", theme::key_hint()));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Render the help overlay centered on screen.
    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_width = 52u16.min(area.width.saturating_sub(4));
        let help_height = 20u16.min(area.height.saturating_sub(4));

        let x = area.width.saturating_sub(help_width) / 2;
        let y = area.height.saturating_sub(help_height) / 2;
        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        frame.render_widget(Clear, help_area);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let key = |k: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {k:<10}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };
        let heading = |title: &'static str| {
            Line::from(Span::styled(format!("  {title}"), Style::default().fg(theme::NEON_CYAN)))
        };

        let help_text = vec![
            Line::from(""),
            heading("Navigation"),
            key("1-3", "Jump to screen"),
            key("Tab", "Next screen"),
            key("←↑↓→", "Move on the map"),
            key("Enter", "Device details"),
            key("Esc", "Close details"),
            Line::from(""),
            heading("Dashboard"),
            key("f / F", "Next / previous device filter"),
            key("0", "Show all devices"),
            key("c", "Clear info alerts"),
            key("r", "Cycle analytics range"),
            key("p", "Pause / resume"),
            Line::from(""),
            key("?", "This help"),
            key("q", "Quit"),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use citypulse_core::{AnalyticsRange, ClockState, SimulationConfig};
    use pretty_assertions::assert_eq;

    fn app() -> App {
        App::new(Dashboard::new(SimulationConfig::seeded(3)).unwrap())
    }

    fn press(app: &mut App, code: KeyCode) -> Option<Action> {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn filter_keys_cycle_through_the_catalog() {
        let mut app = app();
        assert_eq!(
            press(&mut app, KeyCode::Char('f')),
            Some(Action::SetFilter(DeviceFilter::Kind(DeviceKind::TrafficLight)))
        );
        assert_eq!(
            press(&mut app, KeyCode::Char('F')),
            Some(Action::SetFilter(DeviceFilter::Kind(DeviceKind::SecurityCamera)))
        );
        assert_eq!(
            press(&mut app, KeyCode::Char('0')),
            Some(Action::SetFilter(DeviceFilter::All))
        );
    }

    #[test]
    fn global_keys() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(
            press(&mut app, KeyCode::Char('2')),
            Some(Action::SwitchScreen(ScreenId::Map))
        );
        assert_eq!(
            press(&mut app, KeyCode::Tab),
            Some(Action::SwitchScreen(ScreenId::Map))
        );
        assert_eq!(
            press(&mut app, KeyCode::Char('r')),
            Some(Action::ChangeAnalyticsRange(AnalyticsRange::Month))
        );
        assert_eq!(press(&mut app, KeyCode::Char('p')), Some(Action::TogglePause));
        assert_eq!(press(&mut app, KeyCode::Char('c')), Some(Action::ClearInfoAlerts));
    }

    #[test]
    fn help_swallows_other_keys() {
        let mut app = app();
        app.help_visible = true;
        assert_eq!(press(&mut app, KeyCode::Char('q')), None);
        assert_eq!(press(&mut app, KeyCode::Esc), Some(Action::ToggleHelp));
    }

    #[test]
    fn escape_dismisses_notification_unless_a_popup_is_open() {
        let mut app = app();
        app.notification = Some(Notification::info("hello"));
        assert_eq!(press(&mut app, KeyCode::Esc), None);
        assert_eq!(app.notification, None);
    }

    #[tokio::test]
    async fn escape_reaches_an_open_map_popup() {
        let mut app = app();
        app.process_action(&Action::SwitchScreen(ScreenId::Map)).await.unwrap();
        let device = app.dashboard.select_device("traffic_light_001").unwrap();
        app.process_action(&Action::DeviceSelected(device)).await.unwrap();
        assert_eq!(press(&mut app, KeyCode::Esc), Some(Action::CloseDetail));
    }

    #[tokio::test]
    async fn pause_and_focus_reach_the_dashboard() {
        let mut app = app();
        app.process_action(&Action::TogglePause).await.unwrap();
        assert!(app.held);
        assert_eq!(app.dashboard.snapshot().clock, ClockState::Paused);

        // Regaining focus does not override an explicit pause
        app.process_action(&Action::SetVisibility(Visibility::Hidden)).await.unwrap();
        app.process_action(&Action::SetVisibility(Visibility::Visible)).await.unwrap();
        assert_eq!(app.dashboard.snapshot().clock, ClockState::Paused);

        app.process_action(&Action::TogglePause).await.unwrap();
        assert_eq!(app.dashboard.snapshot().clock, ClockState::Running);
    }

    #[tokio::test]
    async fn stale_selection_becomes_a_notification() {
        let mut app = app();
        app.process_action(&Action::SelectDevice("nonexistent_999".into()))
            .await
            .unwrap();
        let note = app.notification.clone().unwrap();
        assert_eq!(note.level, NotificationLevel::Warning);
        assert!(note.message.contains("nonexistent_999"));
    }

    #[tokio::test]
    async fn selection_is_forwarded_to_the_screen() {
        let mut app = app();
        app.process_action(&Action::SelectDevice("air_sensor_451".into()))
            .await
            .unwrap();
        let Ok(Action::DeviceSelected(device)) = app.action_rx.try_recv() else {
            panic!("expected DeviceSelected");
        };
        assert_eq!(device.name, "Air Sensor 451");
    }

    #[tokio::test]
    async fn clearing_info_alerts_reports_the_count() {
        let mut app = app();
        app.process_action(&Action::ClearInfoAlerts).await.unwrap();
        assert_eq!(
            app.notification.map(|n| n.message),
            Some("Cleared 1 info alert".to_owned())
        );
        assert!(app.dashboard.snapshot().alerts.iter().all(|a| !a.is_info()));
    }
}
