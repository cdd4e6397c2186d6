use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::errors::SubtrackError;

/// Platform a streamer publishes on.
///
/// Stored as its canonical string form; parsing is case-insensitive but
/// closed — unknown platforms are a validation error, not `Other`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Platform {
    YouTube,
    Twitch,
    TikTok,
    Instagram,
    Twitter,
    Facebook,
    Other,
}

impl Platform {
    /// Strict parse with a validation error naming the accepted values
    pub fn parse(s: &str) -> Result<Self, SubtrackError> {
        s.parse::<Platform>().map_err(|_| {
            let valid: Vec<String> = Platform::iter().map(|p| p.to_string()).collect();
            SubtrackError::validation(format!(
                "Unknown platform '{}'. Valid platforms: {}",
                s,
                valid.join(", ")
            ))
        })
    }
}

/// One subscriber-count observation.
///
/// `timestamp` is milliseconds since the Unix epoch. This is the value type
/// the stats module and the API history arrays work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub count: i64,
    pub timestamp: i64,
}

/// A tracked streamer with its full history, ascending by timestamp.
///
/// `history` is always present — empty only for rows predating the
/// seed-entry invariant, which the create path never produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Streamer {
    pub id: i64,
    pub name: String,
    pub platform: Platform,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Streamer {
    /// Count of the newest entry, 0 when history is empty
    pub fn latest_count(&self) -> i64 {
        crate::stats::latest_count(&self.history)
    }

    /// Timestamp (ms) of the newest entry
    pub fn latest_timestamp(&self) -> Option<i64> {
        crate::stats::latest_timestamp(&self.history)
    }
}

impl crate::stats::HistoryView for Streamer {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn history(&self) -> &[HistoryEntry] {
        &self.history
    }
}

/// A persisted history row as returned by the append endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRow {
    pub id: i64,
    pub streamer_id: i64,
    pub count: i64,
    pub timestamp: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Input for creating a streamer together with its seed history entry
#[derive(Debug, Clone)]
pub struct NewStreamer {
    pub name: String,
    pub platform: Platform,
    pub initial_count: i64,
    /// Seed entry timestamp (ms), stamped by the service at request time
    pub timestamp: i64,
}
