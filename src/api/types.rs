//! API wire types
//!
//! The response shapes are the tracker's public contract: streamers embed
//! their full ascending history, ids travel as strings, request bodies use
//! the camelCase field names the original frontend sends.

use serde::{Deserialize, Serialize};

use crate::storage::{HistoryEntry, HistoryRow, Streamer};

/// Error body for every non-2xx response
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StreamerResponse {
    pub id: String,
    pub name: String,
    pub platform: String,
    pub history: Vec<HistoryEntry>,
}

impl From<Streamer> for StreamerResponse {
    fn from(s: Streamer) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name,
            platform: s.platform.to_string(),
            history: s.history,
        }
    }
}

impl crate::stats::HistoryView for StreamerResponse {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn history(&self) -> &[HistoryEntry] {
        &self.history
    }
}

/// `PUT` response carries metadata only — history is untouched by edits
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StreamerMetaResponse {
    pub id: String,
    pub name: String,
    pub platform: String,
}

impl From<Streamer> for StreamerMetaResponse {
    fn from(s: Streamer) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name,
            platform: s.platform.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateStreamerBody {
    pub name: String,
    pub platform: String,
    pub initial_count: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UpdateStreamerBody {
    pub name: String,
    pub platform: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AppendHistoryBody {
    pub count: i64,
    pub timestamp: i64,
}

/// Created history row, `streamer_id` stringified like streamer ids
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HistoryRowResponse {
    pub id: i64,
    pub streamer_id: String,
    pub count: i64,
    pub timestamp: i64,
}

impl From<HistoryRow> for HistoryRowResponse {
    fn from(row: HistoryRow) -> Self {
        Self {
            id: row.id,
            streamer_id: row.streamer_id.to_string(),
            count: row.count,
            timestamp: row.timestamp,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}
