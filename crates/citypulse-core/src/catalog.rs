// ── Device catalog ──
//
// Static metadata for each device kind: how many to generate and how to
// render them. Loaded once; the registry is built from it.

use serde::{Deserialize, Serialize};

use crate::model::DeviceKind;

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceType {
    pub kind: DeviceKind,
    pub count: usize,
    /// Hex color, e.g. `#FF6B6B`.
    pub color: String,
    pub icon: String,
    /// Plural display name, e.g. `Traffic Lights`.
    pub name: String,
}

impl DeviceType {
    fn new(kind: DeviceKind, count: usize, color: &str, icon: &str, name: &str) -> Self {
        Self {
            kind,
            count,
            color: color.to_owned(),
            icon: icon.to_owned(),
            name: name.to_owned(),
        }
    }

    /// Display name with a trailing plural `s` removed.
    pub fn singular_name(&self) -> &str {
        self.name.strip_suffix('s').unwrap_or(&self.name)
    }

    /// Color as an RGB triple. Malformed colors fall back to mid grey.
    pub fn rgb(&self) -> (u8, u8, u8) {
        parse_hex(&self.color).unwrap_or((128, 128, 128))
    }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Ordered table of device types. Generation walks it in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCatalog {
    entries: Vec<DeviceType>,
}

impl Default for DeviceCatalog {
    fn default() -> Self {
        Self::new(vec![
            DeviceType::new(DeviceKind::TrafficLight, 450, "#FF6B6B", "🚦", "Traffic Lights"),
            DeviceType::new(DeviceKind::AirSensor, 180, "#4ECDC4", "🌬️", "Air Sensors"),
            DeviceType::new(DeviceKind::ParkingMeter, 890, "#45B7D1", "🅿️", "Parking Meters"),
            DeviceType::new(DeviceKind::StreetLight, 1200, "#FFA726", "💡", "Street Lights"),
            DeviceType::new(DeviceKind::WeatherStation, 85, "#66BB6A", "🌤️", "Weather Stations"),
            DeviceType::new(DeviceKind::SecurityCamera, 142, "#AB47BC", "📹", "Security Cameras"),
        ])
    }
}

impl DeviceCatalog {
    pub fn new(entries: Vec<DeviceType>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[DeviceType] {
        &self.entries
    }

    pub fn entry(&self, kind: DeviceKind) -> Option<&DeviceType> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    /// Sum of all counts: the size of the generated registry.
    pub fn total_count(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Override the population of one kind. Unknown kinds are ignored.
    #[must_use]
    pub fn with_count(mut self, kind: DeviceKind, count: usize) -> Self {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.kind == kind) {
            entry.count = count;
        }
        self
    }
}
