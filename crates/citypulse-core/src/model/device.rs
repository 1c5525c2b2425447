// ── Device domain types ──

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Width of the city map grid (columns).
pub const GRID_COLUMNS: u8 = 12;
/// Height of the city map grid (rows).
pub const GRID_ROWS: u8 = 8;

/// Device type tag. The string form (`traffic_light`, ...) is the tag
/// used by filters, ids, and serialized output.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceKind {
    TrafficLight,
    AirSensor,
    ParkingMeter,
    StreetLight,
    WeatherStation,
    SecurityCamera,
}

impl DeviceKind {
    pub fn tag(self) -> &'static str {
        self.into()
    }

    /// Meters and sensors run on batteries; everything else is mains powered.
    pub fn is_battery_powered(self) -> bool {
        let tag = self.tag();
        tag.contains("meter") || tag.contains("sensor")
    }
}

/// Device operational status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl DeviceStatus {
    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

// ── DeviceId ────────────────────────────────────────────────────────

/// Stable identifier of a generated device, e.g. `traffic_light_001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Build the canonical id for the `sequence`-th generated device.
    pub fn generated(kind: DeviceKind, sequence: usize) -> Self {
        Self(format!("{}_{sequence:03}", kind.tag()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ── Location ────────────────────────────────────────────────────────

/// Cell on the city map grid. `x < GRID_COLUMNS`, `y < GRID_ROWS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: u8,
    pub y: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub district: String,
    pub address: String,
    pub point: GridPoint,
}

// ── Type-specific payloads ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SignalState {
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Expired,
}

/// Latest readings, one shape per device kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DevicePayload {
    TrafficLight {
        signal: SignalState,
        vehicle_count: u32,
        cycle_time_secs: u32,
    },
    AirSensor {
        pm25: u32,
        co2_ppm: u32,
        temperature_c: i32,
        humidity_pct: u32,
    },
    ParkingMeter {
        occupied: bool,
        payment: PaymentStatus,
        revenue: u32,
    },
    StreetLight {
        brightness_pct: u32,
        energy_usage_w: u32,
        operational_hours: u32,
    },
    WeatherStation {
        temperature_c: i32,
        humidity_pct: u32,
        wind_speed_kmh: u32,
        pressure_hpa: u32,
    },
    SecurityCamera {
        recording: bool,
        alerts_triggered: u32,
        storage_used_pct: u32,
    },
}

impl DevicePayload {
    /// The kind this payload belongs to.
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::TrafficLight { .. } => DeviceKind::TrafficLight,
            Self::AirSensor { .. } => DeviceKind::AirSensor,
            Self::ParkingMeter { .. } => DeviceKind::ParkingMeter,
            Self::StreetLight { .. } => DeviceKind::StreetLight,
            Self::WeatherStation { .. } => DeviceKind::WeatherStation,
            Self::SecurityCamera { .. } => DeviceKind::SecurityCamera,
        }
    }

    /// Labelled readings in display order, units included.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::TrafficLight {
                signal,
                vehicle_count,
                cycle_time_secs,
            } => vec![
                ("Current State", signal.to_string()),
                ("Vehicle Count", vehicle_count.to_string()),
                ("Cycle Time", format!("{cycle_time_secs}s")),
            ],
            Self::AirSensor {
                pm25,
                co2_ppm,
                temperature_c,
                humidity_pct,
            } => vec![
                ("PM2.5", format!("{pm25} µg/m³")),
                ("CO2", format!("{co2_ppm} ppm")),
                ("Temperature", format!("{temperature_c}°C")),
                ("Humidity", format!("{humidity_pct}%")),
            ],
            Self::ParkingMeter {
                occupied,
                payment,
                revenue,
            } => vec![
                ("Occupied", if *occupied { "yes" } else { "no" }.to_owned()),
                ("Payment Status", payment.to_string()),
                ("Revenue", format!("${revenue}")),
            ],
            Self::StreetLight {
                brightness_pct,
                energy_usage_w,
                operational_hours,
            } => vec![
                ("Brightness", format!("{brightness_pct}%")),
                ("Energy Usage", format!("{energy_usage_w} W")),
                ("Operational Hours", format!("{operational_hours}h")),
            ],
            Self::WeatherStation {
                temperature_c,
                humidity_pct,
                wind_speed_kmh,
                pressure_hpa,
            } => vec![
                ("Temperature", format!("{temperature_c}°C")),
                ("Humidity", format!("{humidity_pct}%")),
                ("Wind Speed", format!("{wind_speed_kmh} km/h")),
                ("Pressure", format!("{pressure_hpa} hPa")),
            ],
            Self::SecurityCamera {
                recording,
                alerts_triggered,
                storage_used_pct,
            } => vec![
                ("Recording", if *recording { "yes" } else { "no" }.to_owned()),
                ("Alerts Triggered", alerts_triggered.to_string()),
                ("Storage Used", format!("{storage_used_pct}%")),
            ],
        }
    }
}

// ── Device ──────────────────────────────────────────────────────────

/// A simulated city device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub kind: DeviceKind,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub status: DeviceStatus,
    pub location: Location,
    /// Present only for battery-powered kinds. `None` is never "0 %".
    pub battery: Option<u8>,
    pub payload: DevicePayload,
    pub last_update: DateTime<Utc>,
}

impl Device {
    pub fn is_online(&self) -> bool {
        self.status.is_online()
    }

    /// How long ago the device last reported, e.g. `3 minutes ago`.
    pub fn last_seen(&self, now: DateTime<Utc>) -> String {
        super::alert::relative_time(self.last_update, now)
    }

    /// Human-readable kind, e.g. `TRAFFIC LIGHT`.
    pub fn kind_label(&self) -> String {
        self.kind.tag().replace('_', " ").to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn kind_tags_round_trip() {
        for kind in DeviceKind::iter() {
            let parsed: DeviceKind = kind.tag().parse().unwrap_or_else(|_| {
                panic!("tag {} should parse", kind.tag());
            });
            assert_eq!(parsed, kind);
        }
        assert_eq!(DeviceKind::TrafficLight.to_string(), "traffic_light");
        assert!("toaster".parse::<DeviceKind>().is_err());
    }

    #[test]
    fn only_meters_and_sensors_carry_batteries() {
        let powered: Vec<DeviceKind> = DeviceKind::iter()
            .filter(|k| k.is_battery_powered())
            .collect();
        assert_eq!(powered, vec![DeviceKind::AirSensor, DeviceKind::ParkingMeter]);
    }

    #[test]
    fn generated_ids_are_zero_padded() {
        assert_eq!(
            DeviceId::generated(DeviceKind::StreetLight, 7).as_str(),
            "street_light_007"
        );
        assert_eq!(
            DeviceId::generated(DeviceKind::StreetLight, 2947).as_str(),
            "street_light_2947"
        );
    }

    #[test]
    fn payload_serializes_with_kind_tag() {
        let payload = DevicePayload::ParkingMeter {
            occupied: true,
            payment: PaymentStatus::Expired,
            revenue: 12,
        };
        let json = serde_json::to_value(&payload).unwrap_or_default();
        assert_eq!(json["kind"], "parking_meter");
        assert_eq!(json["payment"], "expired");
        assert_eq!(payload.kind(), DeviceKind::ParkingMeter);
        assert_eq!(payload.fields().len(), 3);
    }
}
