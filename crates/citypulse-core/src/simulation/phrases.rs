// Message tables for synthesized alerts and feed entries.

pub const ALERT_MESSAGES: [&str; 6] = [
    "High traffic detected",
    "Unusual sensor readings",
    "Maintenance window approaching",
    "Battery level low",
    "Performance degradation detected",
    "Connection intermittent",
];

/// Messages for the per-tick feed entry.
pub const FEED_MESSAGES: [&str; 5] = [
    "Data packet received",
    "Heartbeat signal",
    "Status check complete",
    "Sensor reading updated",
    "System health verified",
];

/// Messages used to backfill the feed at startup.
pub const BACKFILL_MESSAGES: [&str; 10] = [
    "Status update received",
    "Data transmission successful",
    "Battery level updated",
    "Configuration changed",
    "Alert threshold exceeded",
    "Maintenance required",
    "Performance metrics updated",
    "Connection restored",
    "Scheduled task completed",
    "Sensor calibration performed",
];
