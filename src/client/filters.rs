//! Pure filter and sort transforms over a cached streamer list
//!
//! No network round-trip per filter change: everything here is a
//! synchronous function of the input list.

use std::collections::HashSet;

use crate::api::types::StreamerResponse;
use crate::stats;
use crate::storage::Platform;

/// Client-side filter over the cached list
#[derive(Debug, Clone, Default)]
pub struct StreamerFilter {
    /// Case-insensitive substring match on name or platform
    pub search: Option<String>,
    /// Keep only these platforms
    pub platforms: Option<HashSet<Platform>>,
    /// Inclusive bounds on the current subscriber count
    pub min_subs: Option<i64>,
    pub max_subs: Option<i64>,
}

impl StreamerFilter {
    pub fn matches(&self, streamer: &StreamerResponse) -> bool {
        if let Some(ref search) = self.search {
            let needle = search.to_lowercase();
            let name_matches = streamer.name.to_lowercase().contains(&needle);
            let platform_matches = streamer.platform.to_lowercase().contains(&needle);
            if !name_matches && !platform_matches {
                return false;
            }
        }

        if let Some(ref platforms) = self.platforms {
            match streamer.platform.parse::<Platform>() {
                Ok(p) if platforms.contains(&p) => {}
                _ => return false,
            }
        }

        let current = stats::latest_count(&streamer.history);
        if let Some(min) = self.min_subs {
            if current < min {
                return false;
            }
        }
        if let Some(max) = self.max_subs {
            if current > max {
                return false;
            }
        }

        true
    }

    /// Filter a list, leaving the input untouched
    pub fn apply(&self, streamers: &[StreamerResponse]) -> Vec<StreamerResponse> {
        streamers
            .iter()
            .filter(|s| self.matches(s))
            .cloned()
            .collect()
    }
}

/// Sort key for the streamer list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortKey {
    /// Most recently updated first
    #[default]
    LastUpdate,
    /// Alphabetical by display name
    Name,
    /// Current subscriber count
    Followers,
    /// Platform name
    Platform,
}

/// Sort in place; `descending` flips the order
pub fn sort_streamers(streamers: &mut [StreamerResponse], key: SortKey, descending: bool) {
    match key {
        SortKey::LastUpdate => streamers
            .sort_by_key(|s| stats::latest_timestamp(&s.history).unwrap_or(0)),
        SortKey::Name => streamers.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
        }),
        SortKey::Followers => streamers.sort_by_key(|s| stats::latest_count(&s.history)),
        SortKey::Platform => streamers.sort_by(|a, b| a.platform.cmp(&b.platform)),
    }
    if descending {
        streamers.reverse();
    }
}
