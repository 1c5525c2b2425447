// ── Dashboard snapshot ──
//
// Read-only composite published to views after every tick and every
// state-changing command. Cheap to clone: the device list is shared.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::DeviceCatalog;
use crate::error::CoreError;
use crate::model::{Alert, AnalyticsView, CityMetrics, Device, FeedEntry};
use crate::simulation::{ClockState, SimulationClock};
use crate::state::DashboardState;
use crate::stream::DeviceFilter;

/// Most markers the city map draws at once.
pub const MAX_MAP_MARKERS: usize = 97;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub tick: u64,
    pub generated_at: DateTime<Utc>,
    pub clock: ClockState,
    pub metrics: CityMetrics,
    pub filter: DeviceFilter,
    pub alerts: Vec<Alert>,
    pub feed: Vec<FeedEntry>,
    pub analytics: AnalyticsView,
    #[serde(skip)]
    pub devices: Arc<Vec<Arc<Device>>>,
    #[serde(skip)]
    pub catalog: Arc<DeviceCatalog>,
    /// Id to position in `devices`.
    #[serde(skip)]
    index: Arc<HashMap<String, usize>>,
}

impl DashboardSnapshot {
    pub(crate) fn capture(state: &DashboardState, clock: &SimulationClock) -> Self {
        Self {
            tick: state.tick,
            generated_at: state.updated_at,
            clock: clock.state(),
            metrics: state.metrics.clone(),
            filter: state.filter,
            alerts: state.alerts.entries().to_vec(),
            feed: state.feed.entries().to_vec(),
            analytics: state.analytics(),
            devices: state.registry.devices(),
            catalog: Arc::clone(&state.catalog),
            index: state.registry.index(),
        }
    }

    /// Devices passing the current filter, in registry order.
    pub fn filtered_devices(&self) -> impl Iterator<Item = &Arc<Device>> {
        let filter = self.filter;
        self.devices.iter().filter(move |d| filter.matches(d))
    }

    /// The devices drawn on the map: the filtered list, capped.
    pub fn map_markers(&self) -> impl Iterator<Item = &Arc<Device>> {
        self.filtered_devices().take(MAX_MAP_MARKERS)
    }

    /// Look a device up by id. A stale id is `DeviceNotFound`.
    pub fn find_device(&self, id: &str) -> Result<Arc<Device>, CoreError> {
        self.index
            .get(id)
            .and_then(|&i| self.devices.get(i))
            .cloned()
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: id.to_owned(),
            })
    }

    pub fn is_running(&self) -> bool {
        self.clock == ClockState::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::simulation::Engine;

    #[test]
    fn find_device_uses_the_id_index() {
        let mut engine = Engine::new(&SimulationConfig::seeded(5)).unwrap_or_else(|e| panic!("{e}"));
        let snapshot = engine.run_ticks(3);

        for id in ["traffic_light_001", "parking_meter_1520", "security_camera_2947"] {
            let device = snapshot
                .find_device(id)
                .unwrap_or_else(|e| panic!("{id}: {e}"));
            assert_eq!(device.id.as_str(), id);
        }
        let last = snapshot.devices.last().map(|d| d.id.as_str().to_owned());
        assert_eq!(last.as_deref(), Some("security_camera_2947"));
    }

    #[test]
    fn stale_ids_are_not_found() {
        let engine = Engine::new(&SimulationConfig::seeded(5)).unwrap_or_else(|e| panic!("{e}"));
        let err = engine.snapshot().find_device("nonexistent_999");
        assert!(err.is_err_and(|e| e.is_not_found()));
    }

    #[test]
    fn snapshots_share_the_index_with_the_registry() {
        let mut engine = Engine::new(&SimulationConfig::seeded(5)).unwrap_or_else(|e| panic!("{e}"));
        let before = engine.snapshot();
        let after = engine.run_ticks(10);
        assert!(Arc::ptr_eq(&before.index, &after.index));

        // The index points at the current copies, not the ones it was built from
        for device in after.devices.iter().step_by(97) {
            let found = after
                .find_device(device.id.as_str())
                .unwrap_or_else(|e| panic!("{e}"));
            assert!(Arc::ptr_eq(&found, device));
        }
    }
}
