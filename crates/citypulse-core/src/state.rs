// ── Dashboard state ──
//
// Everything the dashboard shows, in one place. Owned exclusively by the
// engine; views only ever see `DashboardSnapshot` copies.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use crate::catalog::DeviceCatalog;
use crate::config::SimulationConfig;
use crate::error::CoreError;
use crate::model::{
    Alert, AlertSeverity, AnalyticsRange, AnalyticsSeries, AnalyticsView, CityMetrics, Device,
    FeedEntry,
};
use crate::random::RandomSource;
use crate::simulation::phrases::BACKFILL_MESSAGES;
use crate::store::{AlertLog, DeviceRegistry, FeedLog};
use crate::stream::DeviceFilter;

/// Alerts present before the first tick, oldest first.
const SEEDED_ALERTS: [(AlertSeverity, &str, &str, i64); 3] = [
    (
        AlertSeverity::Info,
        "Parking Zone P-078",
        "High occupancy rate detected",
        8,
    ),
    (
        AlertSeverity::Warning,
        "Air Sensor AS-123",
        "PM2.5 levels above normal",
        5,
    ),
    (
        AlertSeverity::Critical,
        "Traffic Light TL-045",
        "Intersection malfunction detected",
        2,
    ),
];

/// Mutable dashboard state.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub(crate) catalog: Arc<DeviceCatalog>,
    pub(crate) registry: DeviceRegistry,
    pub(crate) metrics: CityMetrics,
    pub(crate) alerts: AlertLog,
    pub(crate) feed: FeedLog,
    pub(crate) filter: DeviceFilter,
    pub(crate) analytics_range: AnalyticsRange,
    pub(crate) analytics_base: AnalyticsSeries,
    pub(crate) min_active: usize,
    pub(crate) tick: u64,
    pub(crate) updated_at: DateTime<Utc>,
    next_alert_id: u64,
    next_feed_id: u64,
}

impl DashboardState {
    /// Generate the registry and seed counters, alerts and the feed
    /// backfill.
    pub fn seed(
        config: &SimulationConfig,
        rng: &mut dyn RandomSource,
        now: DateTime<Utc>,
    ) -> Self {
        let registry = DeviceRegistry::generate_at(
            &config.catalog,
            config.initial_offline_probability,
            rng,
            now,
        );
        let metrics = CityMetrics::initial(
            registry.len(),
            registry.online_count(),
            config.min_active_devices,
        );

        let mut state = Self {
            catalog: Arc::new(config.catalog.clone()),
            registry,
            metrics,
            alerts: AlertLog::with_capacity(config.alert_capacity),
            feed: FeedLog::with_capacity(config.feed_capacity),
            filter: DeviceFilter::All,
            analytics_range: AnalyticsRange::default(),
            analytics_base: AnalyticsSeries::default(),
            min_active: config.min_active_devices,
            tick: 0,
            updated_at: now,
            next_alert_id: 1,
            next_feed_id: 1,
        };

        for (severity, device, message, minutes_ago) in SEEDED_ALERTS {
            state.push_alert(
                severity,
                device.to_owned(),
                message.to_owned(),
                now - TimeDelta::minutes(minutes_ago),
            );
        }
        state.backfill_feed(config.feed_capacity, rng, now);
        state
    }

    /// Fill the feed with entries 1-30 s old, strictly descending.
    fn backfill_feed(&mut self, count: usize, rng: &mut dyn RandomSource, now: DateTime<Utc>) {
        if self.registry.is_empty() {
            return;
        }
        let mut drafts: Vec<(Arc<Device>, &str, DateTime<Utc>)> = (0..count)
            .filter_map(|_| {
                let device = self.registry.get(rng.index(self.registry.len()))?;
                let message = BACKFILL_MESSAGES[rng.index(BACKFILL_MESSAGES.len())];
                let secs_ago = rng.offset(1, 30);
                Some((
                    Arc::clone(device),
                    message,
                    now - TimeDelta::seconds(i64::from(secs_ago)),
                ))
            })
            .collect();

        // Oldest first, so each prepend lands on top and ties get nudged.
        drafts.sort_by_key(|(_, _, at)| *at);
        for (device, message, at) in drafts {
            self.push_feed(&device, message.to_owned(), at);
        }
    }

    // ── Log helpers ──────────────────────────────────────────────────

    pub(crate) fn push_alert(
        &mut self,
        severity: AlertSeverity,
        device: String,
        message: String,
        raised_at: DateTime<Utc>,
    ) -> Alert {
        let alert = Alert {
            id: self.next_alert_id,
            severity,
            device,
            message,
            raised_at,
        };
        self.next_alert_id += 1;
        self.alerts.prepend(alert.clone());
        alert
    }

    pub(crate) fn push_feed(
        &mut self,
        device: &Device,
        message: String,
        timestamp: DateTime<Utc>,
    ) -> FeedEntry {
        let entry = FeedEntry {
            id: self.next_feed_id,
            device: device.name.clone(),
            message,
            timestamp,
            icon: device.icon.clone(),
        };
        self.next_feed_id += 1;
        self.feed.prepend(entry.clone());
        entry
    }

    // ── User intents ─────────────────────────────────────────────────

    /// Record the map filter. The registry is never touched.
    pub fn set_filter(&mut self, filter: DeviceFilter, now: DateTime<Utc>) {
        self.filter = filter;
        self.updated_at = now;
    }

    /// Remove every `info` alert and decrement the warning counter by one
    /// (saturating). Returns how many alerts were removed.
    pub fn clear_info_alerts(&mut self, now: DateTime<Utc>) -> usize {
        let removed = self.alerts.clear_info();
        self.metrics.warning_alerts = self.metrics.warning_alerts.saturating_sub(1);
        self.updated_at = now;
        removed
    }

    pub fn change_analytics_range(
        &mut self,
        range: AnalyticsRange,
        now: DateTime<Utc>,
    ) -> AnalyticsView {
        self.analytics_range = range;
        self.updated_at = now;
        self.analytics()
    }

    pub fn select_device(&self, id: &str) -> Result<Arc<Device>, CoreError> {
        self.registry.find(id)
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn catalog(&self) -> &DeviceCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &CityMetrics {
        &self.metrics
    }

    pub fn alerts(&self) -> &AlertLog {
        &self.alerts
    }

    pub fn feed(&self) -> &FeedLog {
        &self.feed
    }

    pub fn filter(&self) -> DeviceFilter {
        self.filter
    }

    pub fn analytics(&self) -> AnalyticsView {
        AnalyticsView::project(&self.analytics_base, self.analytics_range)
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeviceKind;
    use crate::random::SeededRandom;

    fn small_config() -> SimulationConfig {
        let mut config = SimulationConfig::seeded(42);
        config.catalog = DeviceCatalog::default()
            .with_count(DeviceKind::TrafficLight, 10)
            .with_count(DeviceKind::AirSensor, 10)
            .with_count(DeviceKind::ParkingMeter, 10)
            .with_count(DeviceKind::StreetLight, 10)
            .with_count(DeviceKind::WeatherStation, 10)
            .with_count(DeviceKind::SecurityCamera, 10);
        config
    }

    fn seeded() -> DashboardState {
        let mut rng = SeededRandom::new(42);
        DashboardState::seed(&small_config(), &mut rng, Utc::now())
    }

    #[test]
    fn seeds_three_alerts_newest_first() {
        let state = seeded();
        let severities: Vec<AlertSeverity> =
            state.alerts().entries().iter().map(|a| a.severity).collect();
        assert_eq!(
            severities,
            vec![
                AlertSeverity::Critical,
                AlertSeverity::Warning,
                AlertSeverity::Info
            ]
        );
        assert_eq!(state.metrics().critical_alerts, 3);
        assert_eq!(state.metrics().warning_alerts, 12);
    }

    #[test]
    fn backfill_fills_feed_strictly_descending() {
        let now = Utc::now();
        let mut rng = SeededRandom::new(1);
        let state = DashboardState::seed(&small_config(), &mut rng, now);

        let stamps: Vec<_> = state.feed().entries().iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps.len(), 50);
        assert!(stamps.windows(2).all(|w| w[0] > w[1]));
        // Nudging can push a tie a few milliseconds past the 1 s floor.
        assert!(stamps.iter().all(|t| *t <= now));
        assert!(stamps.iter().all(|t| *t >= now - TimeDelta::seconds(30)));
    }

    #[test]
    fn empty_catalog_skips_backfill() {
        let mut config = small_config();
        config.catalog = DeviceCatalog::new(Vec::new());
        let mut rng = SeededRandom::new(1);
        let state = DashboardState::seed(&config, &mut rng, Utc::now());
        assert!(state.feed().is_empty());
        assert_eq!(state.metrics().total_devices, 0);
        assert_eq!(state.metrics().active_devices, 0);
    }

    #[test]
    fn clear_info_decrements_warning_once() {
        let mut state = seeded();
        assert_eq!(state.clear_info_alerts(Utc::now()), 1);
        assert_eq!(state.metrics().warning_alerts, 11);
        assert!(state.alerts().entries().iter().all(|a| !a.is_info()));

        state.metrics.warning_alerts = 0;
        assert_eq!(state.clear_info_alerts(Utc::now()), 0);
        assert_eq!(state.metrics().warning_alerts, 0);
    }

    #[test]
    fn filter_leaves_registry_alone() {
        let mut state = seeded();
        let before = state.registry().devices();
        state.set_filter(DeviceFilter::Kind(DeviceKind::AirSensor), Utc::now());
        assert_eq!(state.filter(), DeviceFilter::Kind(DeviceKind::AirSensor));
        assert!(Arc::ptr_eq(&before, &state.registry().devices()));
    }

    #[test]
    fn analytics_range_is_display_only() {
        let mut state = seeded();
        let view = state.change_analytics_range(AnalyticsRange::Quarter, Utc::now());
        assert_eq!(view.range, AnalyticsRange::Quarter);
        assert_eq!(state.analytics_base, AnalyticsSeries::default());
        let back = state.change_analytics_range(AnalyticsRange::Week, Utc::now());
        assert_eq!(back.uptime_pct, AnalyticsSeries::default().uptime_pct);
    }
}
