//! City map screen: device markers on a 12×8 grid, a filter bar and a
//! device detail popup.
//!
//! Arrows move the cell cursor; Enter opens the detail of a device in
//! that cell (again to step through the cell's devices); Esc closes it.

use std::sync::Arc;

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use citypulse_core::model::{GRID_COLUMNS, GRID_ROWS};
use citypulse_core::{DashboardSnapshot, Device, DeviceFilter, GridPoint};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{status_indicator, sub_tabs};

pub struct MapScreen {
    focused: bool,
    snapshot: Option<Arc<DashboardSnapshot>>,
    cursor: GridPoint,
    detail: Option<Arc<Device>>,
}

impl MapScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            snapshot: None,
            cursor: GridPoint { x: 0, y: 0 },
            detail: None,
        }
    }

    /// Markers drawn in one cell, in registry order.
    fn markers_at(snap: &DashboardSnapshot, point: GridPoint) -> Vec<&Arc<Device>> {
        snap.map_markers()
            .filter(|d| d.location.point == point)
            .collect()
    }

    fn move_cursor(&mut self, dx: i8, dy: i8) {
        let wrap = |v: u8, d: i8, n: u8| {
            let n = i16::from(n);
            u8::try_from((i16::from(v) + i16::from(d)).rem_euclid(n)).unwrap_or(0)
        };
        self.cursor = GridPoint {
            x: wrap(self.cursor.x, dx, GRID_COLUMNS),
            y: wrap(self.cursor.y, dy, GRID_ROWS),
        };
    }

    /// The device Enter should open: the first in the cell, or the one
    /// after the currently open device when it sits in the same cell.
    fn next_in_cell(&self) -> Option<String> {
        let snap = self.snapshot.as_ref()?;
        let markers = Self::markers_at(snap, self.cursor);
        if markers.is_empty() {
            return None;
        }
        let next = self
            .detail
            .as_ref()
            .and_then(|open| markers.iter().position(|d| d.id == open.id))
            .map_or(0, |i| (i + 1) % markers.len());
        markers.get(next).map(|d| d.id.to_string())
    }

    fn filter_index(snap: &DashboardSnapshot) -> usize {
        match snap.filter {
            DeviceFilter::All => 0,
            DeviceFilter::Kind(kind) => snap
                .catalog
                .entries()
                .iter()
                .position(|t| t.kind == kind)
                .map_or(0, |i| i + 1),
        }
    }

    fn render_filter_bar(snap: &DashboardSnapshot, frame: &mut Frame, area: Rect) {
        let mut labels = vec!["All".to_owned()];
        labels.extend(snap.catalog.entries().iter().map(|t| format!("{} {}", t.icon, t.name)));
        let line = sub_tabs::render_sub_tabs(&labels, Self::filter_index(snap));
        frame.render_widget(Paragraph::new(line), area);
    }

    fn cell_area(grid: Rect, point: GridPoint) -> Rect {
        let w = grid.width / u16::from(GRID_COLUMNS);
        let h = grid.height / u16::from(GRID_ROWS);
        Rect::new(
            grid.x + u16::from(point.x) * w,
            grid.y + u16::from(point.y) * h,
            w,
            h,
        )
    }

    fn render_grid(&self, snap: &DashboardSnapshot, frame: &mut Frame, area: Rect) {
        for y in 0..GRID_ROWS {
            for x in 0..GRID_COLUMNS {
                let point = GridPoint { x, y };
                let cell = Self::cell_area(area, point);
                if cell.width == 0 || cell.height == 0 {
                    continue;
                }
                let markers = Self::markers_at(snap, point);
                let mut spans = Vec::new();
                if let Some(first) = markers.first() {
                    let color = if first.is_online() {
                        theme::hex_color(&first.color)
                    } else {
                        theme::ERROR_RED
                    };
                    spans.push(Span::styled(first.icon.clone(), Style::default().fg(color)));
                    if markers.len() > 1 {
                        spans.push(Span::styled(format!("+{}", markers.len() - 1), theme::key_hint()));
                    }
                } else {
                    spans.push(Span::styled("·", theme::key_hint()));
                }

                let style = if point == self.cursor {
                    theme::selected()
                } else {
                    Style::default()
                };
                frame.render_widget(Paragraph::new(Line::from(spans)).style(style), cell);
            }
        }
    }

    fn render_side_panel(&self, snap: &DashboardSnapshot, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Cell {},{} ", self.cursor.x, self.cursor.y))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let shown = snap.map_markers().count();
        let matching = snap.filtered_devices().count();
        let mut lines = vec![
            Line::from(Span::styled(
                format!(" {shown} of {matching} devices shown"),
                theme::key_hint(),
            )),
            Line::from(""),
        ];
        for d in Self::markers_at(snap, self.cursor) {
            lines.push(Line::from(vec![
                Span::raw(" "),
                status_indicator::status_span(d.status),
                Span::raw(format!(" {} ", d.icon)),
                Span::styled(d.name.clone(), theme::text()),
            ]));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_detail(device: &Device, frame: &mut Frame, area: Rect) {
        let width = 56u16.min(area.width.saturating_sub(4));
        let height = 16u16.min(area.height.saturating_sub(2));
        let popup = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!(" {} {} ", device.icon, device.name))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let field = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!(" {label:<18}"), theme::key_hint()),
                Span::styled(value, theme::text()),
            ])
        };

        let mut lines = vec![
            field("ID", device.id.to_string()),
            field("Type", device.kind_label()),
            Line::from(vec![
                Span::styled(format!(" {:<18}", "Status"), theme::key_hint()),
                status_indicator::status_span(device.status),
                Span::styled(format!(" {}", device.status), theme::text()),
            ]),
            field("Location", device.location.address.clone()),
            field("District", device.location.district.clone()),
        ];
        if let Some(battery) = device.battery {
            lines.push(field("Battery", format!("{battery}%")));
        }
        for (label, value) in device.payload.fields() {
            lines.push(field(label, value));
        }
        lines.push(field("Last Update", device.last_seen(Utc::now())));
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for MapScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(1, 0),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(0, -1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(0, 1),
            KeyCode::Enter => return Ok(self.next_in_cell().map(Action::SelectDevice)),
            KeyCode::Esc if self.detail.is_some() => return Ok(Some(Action::CloseDetail)),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SnapshotUpdated(snapshot) => {
                // Keep the popup in step with the fleet; a device that is no
                // longer present closes it.
                if let Some(open) = &self.detail {
                    self.detail = snapshot.find_device(open.id.as_str()).ok();
                }
                self.snapshot = Some(Arc::clone(snapshot));
            }
            Action::DeviceSelected(device) => self.detail = Some(Arc::clone(device)),
            Action::CloseDetail => self.detail = None,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" City Map ")
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

        let Some(snap) = &self.snapshot else {
            return;
        };

        let rows = Layout::vertical([
            Constraint::Length(1), // filter bar
            Constraint::Min(8),    // grid + side panel
            Constraint::Length(1), // hints
        ])
        .split(inner);

        Self::render_filter_bar(snap, frame, rows[0]);

        let body = Layout::horizontal([Constraint::Percentage(72), Constraint::Percentage(28)])
            .split(rows[1]);
        self.render_grid(snap, frame, body[0]);
        self.render_side_panel(snap, frame, body[1]);

        let hints = Line::from(vec![
            Span::styled("  ←↑↓→ ", theme::key_hint_key()),
            Span::styled("move  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("details  ", theme::key_hint()),
            Span::styled("f/F ", theme::key_hint_key()),
            Span::styled("filter  ", theme::key_hint()),
            Span::styled("0 ", theme::key_hint_key()),
            Span::styled("all", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), rows[2]);

        if let Some(device) = &self.detail {
            Self::render_detail(device, frame, area);
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn captures_escape(&self) -> bool {
        self.detail.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::screens::testing;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded() -> (MapScreen, Arc<DashboardSnapshot>) {
        let mut screen = MapScreen::new();
        let snap = testing::snapshot(0);
        screen.update(&Action::SnapshotUpdated(Arc::clone(&snap))).unwrap();
        (screen, snap)
    }

    #[test]
    fn cursor_wraps_around_the_grid() {
        let mut screen = MapScreen::new();
        screen.handle_key_event(key(KeyCode::Left)).unwrap();
        screen.handle_key_event(key(KeyCode::Up)).unwrap();
        assert_eq!(screen.cursor, GridPoint { x: GRID_COLUMNS - 1, y: GRID_ROWS - 1 });
        screen.handle_key_event(key(KeyCode::Right)).unwrap();
        assert_eq!(screen.cursor.x, 0);
    }

    #[test]
    fn enter_selects_a_device_in_the_cursor_cell() {
        let (mut screen, snap) = loaded();
        let occupied = snap.map_markers().next().unwrap().location.point;
        screen.cursor = occupied;

        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        let Some(Action::SelectDevice(id)) = action else {
            panic!("expected a selection, got {action:?}");
        };
        let device = snap.find_device(&id).unwrap();
        assert_eq!(device.location.point, occupied);
    }

    #[test]
    fn enter_on_empty_cell_does_nothing() {
        let (mut screen, snap) = loaded();
        let empty = (0..GRID_ROWS)
            .flat_map(|y| (0..GRID_COLUMNS).map(move |x| GridPoint { x, y }))
            .find(|p| MapScreen::markers_at(&snap, *p).is_empty());
        if let Some(point) = empty {
            screen.cursor = point;
            assert_eq!(screen.handle_key_event(key(KeyCode::Enter)).unwrap(), None);
        }
    }

    #[test]
    fn popup_opens_and_closes() {
        let (mut screen, snap) = loaded();
        let device = snap.find_device("air_sensor_451").unwrap();
        screen.update(&Action::DeviceSelected(device)).unwrap();
        assert!(screen.captures_escape());

        let text = testing::render_text(&screen, 140, 40);
        assert!(text.contains("Air Sensor 451"));
        assert!(text.contains("Battery"));

        assert_eq!(
            screen.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::CloseDetail)
        );
        screen.update(&Action::CloseDetail).unwrap();
        assert!(!screen.captures_escape());
    }

    #[test]
    fn markers_never_exceed_the_cap() {
        let (_, snap) = loaded();
        let drawn: usize = (0..GRID_ROWS)
            .flat_map(|y| (0..GRID_COLUMNS).map(move |x| GridPoint { x, y }))
            .map(|p| MapScreen::markers_at(&snap, p).len())
            .sum();
        assert_eq!(drawn, citypulse_core::MAX_MAP_MARKERS);
    }

    #[test]
    fn filter_bar_tracks_the_snapshot_filter() {
        let (_, snap) = loaded();
        assert_eq!(MapScreen::filter_index(&snap), 0);
    }
}
