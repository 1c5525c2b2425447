// ── Analytics view ──

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::error::CoreError;

/// Weekday labels for the analytics x-axis.
pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Historical window selected in the analytics panel.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum AnalyticsRange {
    #[default]
    #[serde(rename = "7d")]
    #[strum(serialize = "7d")]
    Week,
    #[serde(rename = "30d")]
    #[strum(serialize = "30d")]
    Month,
    #[serde(rename = "90d")]
    #[strum(serialize = "90d")]
    Quarter,
}

impl AnalyticsRange {
    /// Scale applied to the base series for this window.
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Week => 1.0,
            Self::Month => 0.98,
            Self::Quarter => 0.95,
        }
    }

    /// The next range in `7d → 30d → 90d → 7d` order.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Week => Self::Month,
            Self::Month => Self::Quarter,
            Self::Quarter => Self::Week,
        }
    }
}

impl FromStr for AnalyticsRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "7d" => Ok(Self::Week),
            "30d" => Ok(Self::Month),
            "90d" => Ok(Self::Quarter),
            other => Err(CoreError::UnknownRange {
                value: other.to_owned(),
            }),
        }
    }
}

/// The three base series, one value per weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSeries {
    pub uptime_pct: [f64; 7],
    pub latency_ms: [f64; 7],
    pub data_volume_tb: [f64; 7],
}

impl Default for AnalyticsSeries {
    fn default() -> Self {
        Self {
            uptime_pct: [99.2, 98.8, 99.1, 98.9, 99.3, 98.7, 99.0],
            latency_ms: [12.0, 15.0, 18.0, 14.0, 16.0, 13.0, 15.0],
            data_volume_tb: [0.8, 1.1, 1.3, 1.2, 1.4, 1.1, 1.2],
        }
    }
}

/// Series as displayed for one range. Derived on demand; the base series
/// are never modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsView {
    pub range: AnalyticsRange,
    pub labels: [&'static str; 7],
    pub uptime_pct: [f64; 7],
    pub latency_ms: [f64; 7],
    pub data_volume_tb: [f64; 7],
}

impl AnalyticsView {
    /// Uptime is scaled by the multiplier, latency is divided by it and
    /// rounded, data volume passes through.
    pub fn project(base: &AnalyticsSeries, range: AnalyticsRange) -> Self {
        let m = range.multiplier();
        Self {
            range,
            labels: WEEKDAYS,
            uptime_pct: base.uptime_pct.map(|v| v * m),
            latency_ms: base.latency_ms.map(|v| (v / m).round()),
            data_volume_tb: base.data_volume_tb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_ranges() {
        assert_eq!("7d".parse::<AnalyticsRange>().ok(), Some(AnalyticsRange::Week));
        assert_eq!("30D".parse::<AnalyticsRange>().ok(), Some(AnalyticsRange::Month));
        assert_eq!("90d".parse::<AnalyticsRange>().ok(), Some(AnalyticsRange::Quarter));
        assert!("1y".parse::<AnalyticsRange>().is_err());
        assert_eq!(AnalyticsRange::Month.to_string(), "30d");
    }

    #[test]
    fn week_is_identity() {
        let base = AnalyticsSeries::default();
        let view = AnalyticsView::project(&base, AnalyticsRange::Week);
        assert_eq!(view.uptime_pct, base.uptime_pct);
        assert_eq!(view.latency_ms, base.latency_ms);
    }

    #[test]
    fn month_scales_uptime_and_latency() {
        let base = AnalyticsSeries::default();
        let view = AnalyticsView::project(&base, AnalyticsRange::Month);
        assert!((view.uptime_pct[0] - 99.2 * 0.98).abs() < 1e-9);
        // 18 / 0.98 = 18.37 -> 18
        assert!((view.latency_ms[2] - 18.0).abs() < f64::EPSILON);
        assert_eq!(view.data_volume_tb, base.data_volume_tb);
    }

    #[test]
    fn quarter_rounds_latency() {
        let base = AnalyticsSeries::default();
        let view = AnalyticsView::project(&base, AnalyticsRange::Quarter);
        // 16 / 0.95 = 16.84 -> 17, 12 / 0.95 = 12.63 -> 13
        assert!((view.latency_ms[4] - 17.0).abs() < f64::EPSILON);
        assert!((view.latency_ms[0] - 13.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ranges_cycle() {
        assert_eq!(AnalyticsRange::Week.next().next().next(), AnalyticsRange::Week);
    }
}
