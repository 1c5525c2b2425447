// ── One simulation step ──

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use super::phrases::{ALERT_MESSAGES, FEED_MESSAGES};
use crate::model::{Alert, AlertSeverity, FeedEntry};
use crate::random::RandomSource;
use crate::state::DashboardState;

/// Rates that shape a tick.
#[derive(Debug, Clone, Copy)]
pub struct TickRates {
    pub alert_probability: f64,
    pub alert_pool_size: usize,
}

/// What a tick appended to the logs.
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    pub alert: Option<Alert>,
    pub feed: Option<FeedEntry>,
}

/// Advance the state by one tick. Draw order is fixed, so a seeded
/// source reproduces a run exactly:
///
/// 1. health delta
/// 2. active-count delta
/// 3. alert roll, then device, message and severity if it succeeds
/// 4. feed device and message
pub fn advance(
    state: &mut DashboardState,
    rng: &mut dyn RandomSource,
    rates: TickRates,
    now: DateTime<Utc>,
) -> TickOutcome {
    state.metrics.shift_health(rng.centered() * 0.5);
    state
        .metrics
        .shift_active(active_delta(rng.centered()), state.min_active);

    let alert = if rng.chance(rates.alert_probability) {
        raise_alert(state, rng, rates.alert_pool_size, now)
    } else {
        None
    };
    let feed = report_feed(state, rng, now);

    state.tick += 1;
    state.updated_at = now;

    trace!(
        tick = state.tick,
        health = state.metrics.network_health,
        active = state.metrics.active_devices,
        alert = alert.is_some(),
        "tick"
    );

    TickOutcome { alert, feed }
}

/// `floor(c * 10)` for `c` in `[-0.5, 0.5)`, so always in `-5..=4`.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn active_delta(centered: f64) -> i64 {
    (centered * 10.0).floor() as i64
}

fn raise_alert(
    state: &mut DashboardState,
    rng: &mut dyn RandomSource,
    pool_size: usize,
    now: DateTime<Utc>,
) -> Option<Alert> {
    let pool = state.registry.alert_pool(pool_size);
    if pool.is_empty() {
        return None;
    }
    let device = pool.get(rng.index(pool.len()))?.name.clone();
    let message = ALERT_MESSAGES[rng.index(ALERT_MESSAGES.len())];
    let severity = [AlertSeverity::Warning, AlertSeverity::Info][rng.index(2)];

    if severity == AlertSeverity::Warning {
        state.metrics.warning_alerts += 1;
    }
    debug!(%severity, %device, message, "alert raised");
    Some(state.push_alert(severity, device, message.to_owned(), now))
}

fn report_feed(
    state: &mut DashboardState,
    rng: &mut dyn RandomSource,
    now: DateTime<Utc>,
) -> Option<FeedEntry> {
    if state.registry.is_empty() {
        return None;
    }
    let device = Arc::clone(state.registry.get(rng.index(state.registry.len()))?);
    let message = FEED_MESSAGES[rng.index(FEED_MESSAGES.len())];

    let entry = state.push_feed(&device, message.to_owned(), now);
    state.registry.touch(&device.id, now);
    Some(entry)
}
