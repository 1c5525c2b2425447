use serde::{Deserialize, Serialize};

/// City-wide counters shown on the overview cards.
///
/// `offline_devices` is always derived from `total_devices - active_devices`;
/// use [`set_active`](Self::set_active) rather than writing the fields
/// separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityMetrics {
    pub total_devices: usize,
    pub active_devices: usize,
    pub offline_devices: usize,
    pub critical_alerts: u32,
    pub warning_alerts: u32,
    /// Percentage, kept within `[HEALTH_FLOOR, HEALTH_CEILING]`.
    pub network_health: f64,
    /// Terabytes per day.
    pub data_usage_tb: f64,
    pub avg_latency_ms: u32,
}

impl CityMetrics {
    pub const HEALTH_FLOOR: f64 = 95.0;
    pub const HEALTH_CEILING: f64 = 100.0;

    /// Starting counters for a registry of `total` devices, `online` of which
    /// came up online.
    pub fn initial(total: usize, online: usize, min_active: usize) -> Self {
        let mut metrics = Self {
            total_devices: total,
            active_devices: 0,
            offline_devices: total,
            critical_alerts: 3,
            warning_alerts: 12,
            network_health: 98.2,
            data_usage_tb: 1.2,
            avg_latency_ms: 15,
        };
        metrics.set_active(online, min_active);
        metrics
    }

    /// Lowest active count the simulation allows.
    pub fn active_floor(&self, min_active: usize) -> usize {
        min_active.min(self.total_devices)
    }

    /// Set the active count, clamped to `[min(min_active, total), total]`,
    /// and recompute the offline count.
    pub fn set_active(&mut self, active: usize, min_active: usize) {
        let floor = self.active_floor(min_active);
        self.active_devices = active.clamp(floor, self.total_devices);
        self.offline_devices = self.total_devices - self.active_devices;
    }

    /// Shift the active count by a signed delta, with the same clamping as
    /// [`set_active`](Self::set_active).
    pub fn shift_active(&mut self, delta: i64, min_active: usize) {
        let current = i64::try_from(self.active_devices).unwrap_or(i64::MAX);
        let shifted = usize::try_from(current.saturating_add(delta).max(0)).unwrap_or(0);
        self.set_active(shifted, min_active);
    }

    /// Shift network health, clamped to `[95, 100]`.
    pub fn shift_health(&mut self, delta: f64) {
        self.network_health =
            (self.network_health + delta).clamp(Self::HEALTH_FLOOR, Self::HEALTH_CEILING);
    }
}
