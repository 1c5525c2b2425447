use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::alert::relative_time;

/// One line of the live device feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub id: u64,
    pub device: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// The reporting device's icon.
    pub icon: String,
}

impl FeedEntry {
    pub fn relative_time(&self, now: DateTime<Utc>) -> String {
        relative_time(self.timestamp, now)
    }
}
