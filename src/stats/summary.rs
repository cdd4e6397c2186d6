use serde::{Deserialize, Serialize};

use super::aggregate::latest_count;
use crate::storage::models::HistoryEntry;

/// Anything with a display name and a subscriber history.
///
/// Lets the dashboard summary run over storage models and API responses
/// alike.
pub trait HistoryView {
    fn display_name(&self) -> &str;
    fn history(&self) -> &[HistoryEntry];
}

/// Dashboard aggregate over the whole tracked roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSummary {
    pub total_subs: i64,
    pub total_streamers: usize,
    pub avg_subs: i64,
    /// Name of the streamer with the highest latest count
    pub top_streamer: Option<String>,
}

/// Compute the global dashboard numbers from the loaded roster
pub fn summarize<T: HistoryView>(streamers: &[T]) -> TrackerSummary {
    let total_subs: i64 = streamers.iter().map(|s| latest_count(s.history())).sum();

    let top_streamer = streamers
        .iter()
        .max_by_key(|s| latest_count(s.history()))
        .map(|s| s.display_name().to_string());

    let avg_subs = if streamers.is_empty() {
        0
    } else {
        (total_subs as f64 / streamers.len() as f64).round() as i64
    };

    TrackerSummary {
        total_subs,
        total_streamers: streamers.len(),
        avg_subs,
        top_streamer,
    }
}
