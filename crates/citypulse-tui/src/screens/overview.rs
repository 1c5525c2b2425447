//! Overview screen: metric cards, fleet breakdown, alerts and live feed.
//!
//! Layout:
//! ┌─ Total ──┐┌─ Active ─┐┌─ Alerts ─┐┌─ Health ─┐
//! └──────────┘└──────────┘└──────────┘└──────────┘
//! ┌─ Fleet ────────────────────────────────────────┐
//! └────────────────────────────────────────────────┘
//! ┌─ Alerts ──────────────┐┌─ Live Feed ───────────┐
//! └───────────────────────┘└───────────────────────┘

use std::sync::Arc;

use chrono::Utc;
use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use citypulse_core::{DashboardSnapshot, DeviceFilter};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct OverviewScreen {
    focused: bool,
    snapshot: Option<Arc<DashboardSnapshot>>,
}

fn panel(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        })
}

/// Integer percentage of `part` in `whole`; 0 for an empty whole.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub(crate) fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

impl OverviewScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            snapshot: None,
        }
    }

    fn render_card(frame: &mut Frame, area: Rect, title: &str, value: Span<'static>, sub: Line<'static>) {
        let block = panel(title, false);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let lines = vec![
            Line::from(value.patch_style(Style::default().add_modifier(Modifier::BOLD))),
            sub,
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_cards(snap: &DashboardSnapshot, frame: &mut Frame, area: Rect) {
        let m = &snap.metrics;
        let cols = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);

        Self::render_card(
            frame,
            cols[0],
            "Total Devices",
            Span::styled(format!(" {}", m.total_devices), Style::default().fg(theme::NEON_CYAN)),
            Line::from(Span::styled(
                format!(" {} offline", m.offline_devices),
                theme::key_hint(),
            )),
        );
        Self::render_card(
            frame,
            cols[1],
            "Active",
            Span::styled(
                format!(" {}", m.active_devices),
                Style::default().fg(theme::SUCCESS_GREEN),
            ),
            Line::from(Span::styled(
                format!(" {:.1}% of fleet", percent(m.active_devices, m.total_devices)),
                theme::key_hint(),
            )),
        );
        Self::render_card(
            frame,
            cols[2],
            "Alerts",
            Span::styled(
                format!(" {} critical", m.critical_alerts),
                Style::default().fg(theme::ERROR_RED),
            ),
            Line::from(Span::styled(
                format!(" {} warning", m.warning_alerts),
                Style::default().fg(theme::ELECTRIC_YELLOW),
            )),
        );
        Self::render_card(
            frame,
            cols[3],
            "Network Health",
            Span::styled(
                format!(" {:.1}%", m.network_health),
                Style::default().fg(theme::health_color(m.network_health)),
            ),
            Line::from(Span::styled(
                format!(" {} ms · {:.1} TB/day", m.avg_latency_ms, m.data_usage_tb),
                theme::key_hint(),
            )),
        );
    }

    fn render_fleet(snap: &DashboardSnapshot, frame: &mut Frame, area: Rect) {
        let block = panel("Fleet", false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = snap
            .catalog
            .entries()
            .iter()
            .map(|t| {
                let filter = DeviceFilter::Kind(t.kind);
                let (count, online) = snap
                    .devices
                    .iter()
                    .filter(|d| filter.matches(d))
                    .fold((0, 0), |(n, on), d| (n + 1, on + usize::from(d.is_online())));
                Line::from(vec![
                    Span::styled(format!("  {} ", t.icon), Style::default().fg(theme::kind_color(t))),
                    Span::styled(format!("{:<18}", t.name), theme::text()),
                    Span::styled(format!("{count:>5}"), Style::default().fg(theme::NEON_CYAN)),
                    Span::styled(format!("  {online} online"), theme::key_hint()),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_alerts(&self, snap: &DashboardSnapshot, frame: &mut Frame, area: Rect) {
        let block = panel("Alerts", self.focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if snap.alerts.is_empty() {
            frame.render_widget(
                Paragraph::new("  No active alerts").style(theme::key_hint()),
                inner,
            );
            return;
        }

        let now = Utc::now();
        let lines: Vec<Line> = snap
            .alerts
            .iter()
            .flat_map(|a| {
                [
                    Line::from(vec![
                        Span::raw(format!(" {} ", a.icon())),
                        Span::styled(
                            a.message.clone(),
                            Style::default().fg(theme::severity_color(a.severity)),
                        ),
                    ]),
                    Line::from(Span::styled(
                        format!("    {} · {}", a.device, a.relative_time(now)),
                        theme::key_hint(),
                    )),
                ]
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_feed(snap: &DashboardSnapshot, frame: &mut Frame, area: Rect) {
        let block = panel("Live Feed", false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = snap
            .feed
            .iter()
            .take(usize::from(inner.height))
            .map(|e| {
                Line::from(vec![
                    Span::styled(
                        format!(" {} ", e.timestamp.format("%H:%M:%S")),
                        theme::key_hint(),
                    ),
                    Span::raw(format!("{} ", e.icon)),
                    Span::styled(format!("{}: ", e.device), Style::default().fg(theme::NEON_CYAN)),
                    Span::styled(e.message.clone(), theme::text()),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for OverviewScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SnapshotUpdated(snapshot) = action {
            self.snapshot = Some(Arc::clone(snapshot));
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(snap) = &self.snapshot else {
            frame.render_widget(
                Paragraph::new("  Generating city fleet…").block(panel("Overview", self.focused)),
                area,
            );
            return;
        };

        let fleet_height = u16::try_from(snap.catalog.entries().len())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        let rows = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(fleet_height),
            Constraint::Min(6),
        ])
        .split(area);

        Self::render_cards(snap, frame, rows[0]);
        Self::render_fleet(snap, frame, rows[1]);

        let bottom = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[2]);
        self.render_alerts(snap, frame, bottom[0]);
        Self::render_feed(snap, frame, bottom[1]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
