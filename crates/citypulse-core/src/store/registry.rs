// ── Device registry ──
//
// Generates the device population from the catalog and answers queries
// over it. The device list is shared behind an `Arc` so snapshots cost
// one reference-count bump; `touch` copies on write.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use crate::catalog::{DeviceCatalog, DeviceType};
use crate::error::CoreError;
use crate::model::{
    Device, DeviceId, DeviceKind, DevicePayload, DeviceStatus, GRID_COLUMNS, GRID_ROWS,
    GridPoint, Location, PaymentStatus, SignalState,
};
use crate::random::RandomSource;
use crate::stream::DeviceFilter;

/// Probability that a freshly generated device starts offline.
pub const DEFAULT_OFFLINE_PROBABILITY: f64 = 0.02;

const DISTRICTS: [&str; 6] = [
    "Downtown",
    "Business District",
    "Residential North",
    "Industrial Zone",
    "Harbor Area",
    "Tech Park",
];

const STREETS: [&str; 8] = [
    "Main St",
    "Oak Ave",
    "Pine Rd",
    "Cedar Blvd",
    "Maple Dr",
    "Elm St",
    "Park Ave",
    "River Rd",
];

/// Id to position in the device list. Ids never change after generation,
/// so one index serves every snapshot of a session.
pub(crate) type DeviceIndex = Arc<HashMap<String, usize>>;

/// The generated device population, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Arc<Vec<Arc<Device>>>,
    by_id: DeviceIndex,
}

impl DeviceRegistry {
    /// Generate with the default offline probability, stamped relative to now.
    pub fn generate(catalog: &DeviceCatalog, rng: &mut dyn RandomSource) -> Self {
        Self::generate_at(catalog, DEFAULT_OFFLINE_PROBABILITY, rng, Utc::now())
    }

    /// Generate `catalog.total_count()` devices. The count and ids are
    /// fixed by the catalog; every attribute value comes from `rng`.
    pub fn generate_at(
        catalog: &DeviceCatalog,
        offline_probability: f64,
        rng: &mut dyn RandomSource,
        now: DateTime<Utc>,
    ) -> Self {
        let mut devices = Vec::with_capacity(catalog.total_count());
        let mut sequence = 1;

        for entry in catalog.entries() {
            for _ in 0..entry.count {
                devices.push(Arc::new(generate_device(
                    entry,
                    sequence,
                    offline_probability,
                    rng,
                    now,
                )));
                sequence += 1;
            }
        }

        Self::from_devices(devices)
    }

    /// Wrap an existing device list.
    pub fn from_devices(devices: Vec<Arc<Device>>) -> Self {
        let by_id = devices
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id.as_str().to_owned(), i))
            .collect();
        Self {
            devices: Arc::new(devices),
            by_id: Arc::new(by_id),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Shared handle to the full list (cheap `Arc` clone).
    pub fn devices(&self) -> Arc<Vec<Arc<Device>>> {
        Arc::clone(&self.devices)
    }

    pub(crate) fn index(&self) -> DeviceIndex {
        Arc::clone(&self.by_id)
    }

    /// Devices matching `filter`, in registry order.
    pub fn by_filter(&self, filter: DeviceFilter) -> impl Iterator<Item = &Arc<Device>> {
        self.devices.iter().filter(move |d| filter.matches(d))
    }

    pub fn find(&self, id: &str) -> Result<Arc<Device>, CoreError> {
        self.by_id
            .get(id)
            .and_then(|&i| self.devices.get(i))
            .cloned()
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: id.to_owned(),
            })
    }

    /// The first `n` devices, the pool alerts are raised against.
    pub fn alert_pool(&self, n: usize) -> &[Arc<Device>] {
        &self.devices[..n.min(self.devices.len())]
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Device>> {
        self.devices.get(index)
    }

    pub fn online_count(&self) -> usize {
        self.devices.iter().filter(|d| d.is_online()).count()
    }

    pub fn count_of(&self, kind: DeviceKind) -> usize {
        self.by_filter(DeviceFilter::Kind(kind)).count()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Refresh a device's `last_update`. Returns `false` for unknown ids.
    pub fn touch(&mut self, id: &DeviceId, at: DateTime<Utc>) -> bool {
        let Some(&index) = self.by_id.get(id.as_str()) else {
            return false;
        };
        let devices = Arc::make_mut(&mut self.devices);
        match devices.get_mut(index) {
            Some(device) => {
                Arc::make_mut(device).last_update = at;
                true
            }
            None => false,
        }
    }
}

// ── Generation ──────────────────────────────────────────────────────

fn generate_device(
    entry: &DeviceType,
    sequence: usize,
    offline_probability: f64,
    rng: &mut dyn RandomSource,
    now: DateTime<Utc>,
) -> Device {
    let status = if rng.chance(offline_probability) {
        DeviceStatus::Offline
    } else {
        DeviceStatus::Online
    };
    let location = generate_location(rng);
    let age_ms = rng.below(3_600_000);
    let battery = if entry.kind.is_battery_powered() {
        u8::try_from(rng.below(100)).ok()
    } else {
        None
    };
    let payload = generate_payload(entry.kind, rng);

    Device {
        id: DeviceId::generated(entry.kind, sequence),
        kind: entry.kind,
        name: format!("{} {sequence:03}", entry.singular_name()),
        icon: entry.icon.clone(),
        color: entry.color.clone(),
        status,
        location,
        battery,
        payload,
        last_update: now - TimeDelta::milliseconds(i64::from(age_ms)),
    }
}

fn generate_location(rng: &mut dyn RandomSource) -> Location {
    let district = DISTRICTS[rng.index(DISTRICTS.len())];
    let number = rng.offset(1, 9_999);
    let street = STREETS[rng.index(STREETS.len())];
    let x = u8::try_from(rng.below(u32::from(GRID_COLUMNS))).unwrap_or(0);
    let y = u8::try_from(rng.below(u32::from(GRID_ROWS))).unwrap_or(0);

    Location {
        district: district.to_owned(),
        address: format!("{number} {street}"),
        point: GridPoint { x, y },
    }
}

fn generate_payload(kind: DeviceKind, rng: &mut dyn RandomSource) -> DevicePayload {
    match kind {
        DeviceKind::TrafficLight => DevicePayload::TrafficLight {
            signal: [SignalState::Green, SignalState::Yellow, SignalState::Red][rng.index(3)],
            vehicle_count: rng.below(50),
            cycle_time_secs: rng.offset(30, 60),
        },
        DeviceKind::AirSensor => DevicePayload::AirSensor {
            pm25: rng.offset(10, 50),
            co2_ppm: rng.offset(300, 200),
            temperature_c: celsius(rng.offset(15, 30)),
            humidity_pct: rng.offset(40, 40),
        },
        DeviceKind::ParkingMeter => DevicePayload::ParkingMeter {
            occupied: rng.chance(0.6),
            payment: if rng.chance(0.8) {
                PaymentStatus::Paid
            } else {
                PaymentStatus::Expired
            },
            revenue: rng.below(50),
        },
        DeviceKind::StreetLight => DevicePayload::StreetLight {
            brightness_pct: rng.below(100),
            energy_usage_w: rng.offset(20, 50),
            operational_hours: rng.offset(6, 12),
        },
        DeviceKind::WeatherStation => DevicePayload::WeatherStation {
            temperature_c: celsius(rng.offset(10, 25)),
            humidity_pct: rng.offset(40, 40),
            wind_speed_kmh: rng.offset(5, 20),
            pressure_hpa: rng.offset(950, 100),
        },
        DeviceKind::SecurityCamera => DevicePayload::SecurityCamera {
            recording: rng.chance(0.9),
            alerts_triggered: rng.below(10),
            storage_used_pct: rng.offset(10, 80),
        },
    }
}

fn celsius(raw: u32) -> i32 {
    i32::try_from(raw).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedRandom, SeededRandom};

    fn small_catalog() -> DeviceCatalog {
        DeviceCatalog::default()
            .with_count(DeviceKind::TrafficLight, 3)
            .with_count(DeviceKind::AirSensor, 2)
            .with_count(DeviceKind::ParkingMeter, 2)
            .with_count(DeviceKind::StreetLight, 4)
            .with_count(DeviceKind::WeatherStation, 1)
            .with_count(DeviceKind::SecurityCamera, 1)
    }

    #[test]
    fn ids_and_names_follow_the_running_counter() {
        let mut rng = SeededRandom::new(3);
        let registry = DeviceRegistry::generate(&small_catalog(), &mut rng);
        assert_eq!(registry.len(), 13);

        let ids: Vec<&str> = registry.devices.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids[0], "traffic_light_001");
        assert_eq!(ids[3], "air_sensor_004");
        assert_eq!(ids[12], "security_camera_013");

        let fourth = registry.find("air_sensor_004");
        assert_eq!(fourth.map(|d| d.name.clone()).ok(), Some("Air Sensor 004".into()));
    }

    #[test]
    fn battery_present_only_for_meters_and_sensors() {
        let mut rng = SeededRandom::new(11);
        let registry = DeviceRegistry::generate(&small_catalog(), &mut rng);
        for device in registry.devices.iter() {
            assert_eq!(device.battery.is_some(), device.kind.is_battery_powered());
            if let Some(level) = device.battery {
                assert!(level < 100);
            }
            assert_eq!(device.payload.kind(), device.kind);
            assert!(device.location.point.x < GRID_COLUMNS);
            assert!(device.location.point.y < GRID_ROWS);
        }
    }

    #[test]
    fn offline_roll_is_two_percent() {
        let now = Utc::now();
        let catalog = DeviceCatalog::default().with_count(DeviceKind::TrafficLight, 1);
        let only_lights = DeviceCatalog::new(vec![catalog.entries()[0].clone()]);

        let mut low = ScriptedRandom::constant(0.01);
        let registry = DeviceRegistry::generate_at(&only_lights, 0.02, &mut low, now);
        assert_eq!(registry.online_count(), 0);

        let mut high = ScriptedRandom::constant(0.5);
        let registry = DeviceRegistry::generate_at(&only_lights, 0.02, &mut high, now);
        assert_eq!(registry.online_count(), 1);
    }

    #[test]
    fn filter_by_kind() {
        let mut rng = SeededRandom::new(5);
        let registry = DeviceRegistry::generate(&small_catalog(), &mut rng);
        assert_eq!(registry.count_of(DeviceKind::StreetLight), 4);
        assert!(registry
            .by_filter(DeviceFilter::Kind(DeviceKind::AirSensor))
            .all(|d| d.kind == DeviceKind::AirSensor));
        assert_eq!(registry.by_filter(DeviceFilter::All).count(), 13);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let registry = DeviceRegistry::default();
        let err = registry.find("nonexistent_999");
        assert!(err.is_err_and(|e| e.is_not_found()));
        assert!(registry.alert_pool(20).is_empty());
    }

    #[test]
    fn touch_copies_on_write() {
        let mut rng = SeededRandom::new(9);
        let mut registry = DeviceRegistry::generate(&small_catalog(), &mut rng);
        let before = registry.devices();
        let at = Utc::now() + TimeDelta::hours(1);

        assert!(registry.touch(&DeviceId::from("street_light_010"), at));
        assert!(!registry.touch(&DeviceId::from("street_light_999"), at));

        let after = registry.find("street_light_010").map(|d| d.last_update).ok();
        assert_eq!(after, Some(at));
        // The earlier shared handle is untouched.
        assert_ne!(before[9].last_update, at);
    }
}
