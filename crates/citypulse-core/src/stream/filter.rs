// ── Device filter ──
//
// Selects which devices the map shows. Applied to snapshots; never
// mutates the registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{Device, DeviceKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceFilter {
    #[default]
    All,
    Kind(DeviceKind),
}

impl DeviceFilter {
    pub fn matches(self, device: &Device) -> bool {
        match self {
            Self::All => true,
            Self::Kind(kind) => device.kind == kind,
        }
    }

    /// Step through `all → each kind → all`. `forward = false` walks back.
    #[must_use]
    pub fn cycle(self, order: &[DeviceKind], forward: bool) -> Self {
        let mut ring: Vec<Self> = Vec::with_capacity(order.len() + 1);
        ring.push(Self::All);
        ring.extend(order.iter().copied().map(Self::Kind));

        let pos = ring.iter().position(|f| *f == self).unwrap_or(0);
        let next = if forward {
            (pos + 1) % ring.len()
        } else {
            (pos + ring.len() - 1) % ring.len()
        };
        ring.get(next).copied().unwrap_or_default()
    }
}

impl fmt::Display for DeviceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Kind(kind) => f.write_str(kind.tag()),
        }
    }
}

impl FromStr for DeviceFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        if tag.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        tag.parse::<DeviceKind>()
            .map(Self::Kind)
            .map_err(|_| CoreError::UnknownDeviceKind {
                tag: tag.to_owned(),
            })
    }
}

impl From<DeviceKind> for DeviceFilter {
    fn from(kind: DeviceKind) -> Self {
        Self::Kind(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        assert_eq!("all".parse::<DeviceFilter>().ok(), Some(DeviceFilter::All));
        assert_eq!(
            "parking_meter".parse::<DeviceFilter>().ok(),
            Some(DeviceFilter::Kind(DeviceKind::ParkingMeter))
        );
        assert_eq!(
            DeviceFilter::Kind(DeviceKind::SecurityCamera).to_string(),
            "security_camera"
        );
        let err = "drone".parse::<DeviceFilter>();
        assert!(matches!(err, Err(CoreError::UnknownDeviceKind { .. })));
    }

    #[test]
    fn cycle_wraps_both_ways() {
        let order = [DeviceKind::TrafficLight, DeviceKind::AirSensor];
        let f = DeviceFilter::All.cycle(&order, true);
        assert_eq!(f, DeviceFilter::Kind(DeviceKind::TrafficLight));
        let f = f.cycle(&order, true).cycle(&order, true);
        assert_eq!(f, DeviceFilter::All);
        assert_eq!(
            DeviceFilter::All.cycle(&order, false),
            DeviceFilter::Kind(DeviceKind::AirSensor)
        );
    }
}
