use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    Warning,
    Info,
}

impl AlertSeverity {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Critical => "🚨",
            Self::Warning => "⚠️",
            Self::Info => "ℹ️",
        }
    }
}

/// A raised alert.
///
/// `device` is the source device's display name, not its id. It is a
/// display-only reference and may not resolve back to a registry entry
/// (the seeded alerts name devices that were never generated).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: u64,
    pub severity: AlertSeverity,
    pub device: String,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Alert {
    pub fn icon(&self) -> &'static str {
        self.severity.icon()
    }

    pub fn is_info(&self) -> bool {
        self.severity == AlertSeverity::Info
    }

    /// "just now", "1 minute ago", "3 hours ago".
    pub fn relative_time(&self, now: DateTime<Utc>) -> String {
        relative_time(self.raised_at, now)
    }
}

pub(crate) fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    let (n, unit) = match secs {
        0..60 => return "just now".to_owned(),
        60..3_600 => (secs / 60, "minute"),
        3_600..86_400 => (secs / 3_600, "hour"),
        _ => (secs / 86_400, "day"),
    };
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn alert_at(raised_at: DateTime<Utc>) -> Alert {
        Alert {
            id: 1,
            severity: AlertSeverity::Warning,
            device: "Air Sensor 004".into(),
            message: "Battery level low".into(),
            raised_at,
        }
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc::now();
        assert_eq!(alert_at(now).relative_time(now), "just now");
        assert_eq!(
            alert_at(now - Duration::seconds(59)).relative_time(now),
            "just now"
        );
        assert_eq!(
            alert_at(now - Duration::minutes(1)).relative_time(now),
            "1 minute ago"
        );
        assert_eq!(
            alert_at(now - Duration::minutes(8)).relative_time(now),
            "8 minutes ago"
        );
        assert_eq!(
            alert_at(now - Duration::hours(3)).relative_time(now),
            "3 hours ago"
        );
        // Clock skew never renders a negative age.
        assert_eq!(
            alert_at(now + Duration::minutes(5)).relative_time(now),
            "just now"
        );
    }

    #[test]
    fn severity_icons() {
        assert_eq!(AlertSeverity::Critical.icon(), "🚨");
        assert_eq!(AlertSeverity::Warning.icon(), "⚠️");
        assert_eq!(AlertSeverity::Info.icon(), "ℹ️");
        assert_eq!("info".parse::<AlertSeverity>().ok(), Some(AlertSeverity::Info));
    }
}
