//! Streamer management service
//!
//! Provides unified business logic for streamer operations, shared between
//! the HTTP handlers and the CLI. All validation happens here; the API
//! layer only translates errors into HTTP statuses.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{Result, SubtrackError};
use crate::stats;
use crate::stats::WeekBucket;
use crate::storage::{HistoryEntry, HistoryRow, NewStreamer, Platform, Streamer, StreamerStore};

// ============ Request DTOs ============

/// Request to create a new streamer
#[derive(Debug, Clone)]
pub struct CreateStreamerRequest {
    pub name: String,
    pub platform: String,
    pub initial_count: i64,
}

/// Request to update streamer metadata (never touches history)
#[derive(Debug, Clone)]
pub struct UpdateStreamerRequest {
    pub name: String,
    pub platform: String,
}

/// Derived statistics for one streamer, computed by the stats module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamerStats {
    pub latest_count: i64,
    pub last_update: Option<i64>,
    pub update_count: usize,
    pub weekly_growth: i64,
    pub weekly_earnings: i64,
    pub monthly_earnings_estimate: i64,
    pub tracked_growth: i64,
    pub tracked_earnings: i64,
    pub target_progress_percent: u32,
    pub weekly_buckets: Vec<WeekBucket>,
}

impl StreamerStats {
    /// Assemble every derived metric for a history sequence at reference
    /// time `now`.
    ///
    /// The timezone of `now` determines the Monday alignment of the weekly
    /// buckets: the server computes in UTC, the CLI in local time.
    pub fn compute<Tz: TimeZone>(
        history: &[HistoryEntry],
        now: &DateTime<Tz>,
        week_count: usize,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let now_ms = now.timestamp_millis();
        let weekly_growth = stats::rolling_weekly_growth(history, now_ms);

        Self {
            latest_count: stats::latest_count(history),
            last_update: stats::latest_timestamp(history),
            update_count: history.len(),
            weekly_growth,
            weekly_earnings: stats::weekly_earnings(history, now_ms),
            monthly_earnings_estimate: stats::estimate_monthly_earnings(history, now_ms),
            tracked_growth: stats::tracked_growth(history),
            tracked_earnings: stats::earnings_for_growth(stats::tracked_growth(history)),
            target_progress_percent: stats::target_progress_percent(weekly_growth),
            weekly_buckets: stats::weekly_buckets(history, now, week_count),
        }
    }
}

// ============ StreamerService Implementation ============

/// Service for streamer CRUD and history operations
pub struct StreamerService {
    store: Arc<dyn StreamerStore>,
}

impl StreamerService {
    pub fn new(store: Arc<dyn StreamerStore>) -> Self {
        Self { store }
    }

    fn validate_name(name: &str) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(SubtrackError::validation("Streamer name must not be empty"));
        }
        Ok(trimmed.to_string())
    }

    fn validate_count(count: i64) -> Result<i64> {
        if count < 0 {
            return Err(SubtrackError::validation(
                "Subscriber count must not be negative",
            ));
        }
        Ok(count)
    }

    /// All streamers, newest first, with ascending history
    pub async fn list(&self) -> Result<Vec<Streamer>> {
        self.store.load_all().await
    }

    /// Single streamer; `NotFound` when the id is unknown
    pub async fn get(&self, id: i64) -> Result<Streamer> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| SubtrackError::not_found(format!("Streamer not found: {}", id)))
    }

    /// Create a streamer with its seed history entry at current server time
    pub async fn create(&self, req: CreateStreamerRequest) -> Result<Streamer> {
        let name = Self::validate_name(&req.name)?;
        let platform = Platform::parse(&req.platform)?;
        let initial_count = Self::validate_count(req.initial_count)?;

        let created = self
            .store
            .create(NewStreamer {
                name,
                platform,
                initial_count,
                timestamp: Utc::now().timestamp_millis(),
            })
            .await?;

        info!(
            "StreamerService: created '{}' on {} with {} subscribers",
            created.name, created.platform, initial_count
        );
        Ok(created)
    }

    /// Update name/platform only
    pub async fn update(&self, id: i64, req: UpdateStreamerRequest) -> Result<Streamer> {
        let name = Self::validate_name(&req.name)?;
        let platform = Platform::parse(&req.platform)?;

        let updated = self.store.update_metadata(id, &name, platform).await?;
        info!("StreamerService: updated metadata for {}", id);
        Ok(updated)
    }

    /// Delete a streamer; its history goes with it
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.store.remove(id).await?;
        info!("StreamerService: deleted {}", id);
        Ok(())
    }

    /// Append one subscriber-count observation
    pub async fn append_history(&self, id: i64, count: i64, timestamp: i64) -> Result<HistoryRow> {
        let count = Self::validate_count(count)?;
        if timestamp <= 0 {
            return Err(SubtrackError::validation(
                "Timestamp must be a positive millisecond epoch value",
            ));
        }

        let row = self.store.append_history(id, count, timestamp).await?;
        info!(
            "StreamerService: recorded count {} for streamer {} at {}",
            count, id, timestamp
        );
        Ok(row)
    }

    /// Derived statistics for one streamer at current server time (UTC)
    pub async fn stats(&self, id: i64, week_count: usize) -> Result<StreamerStats> {
        let streamer = self.get(id).await?;
        Ok(StreamerStats::compute(
            &streamer.history,
            &Utc::now(),
            week_count,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stats_compute_empty_history() {
        let now = Utc.with_ymd_and_hms(2025, 6, 5, 12, 0, 0).unwrap();
        let stats = StreamerStats::compute(&[], &now, 8);

        assert_eq!(stats.latest_count, 0);
        assert_eq!(stats.last_update, None);
        assert_eq!(stats.weekly_growth, 0);
        assert_eq!(stats.weekly_earnings, 0);
        assert_eq!(stats.monthly_earnings_estimate, 0);
        assert_eq!(stats.weekly_buckets.len(), 8);
    }

    #[test]
    fn test_stats_compute_with_growth() {
        let now = Utc.with_ymd_and_hms(2025, 6, 5, 12, 0, 0).unwrap();
        let now_ms = now.timestamp_millis();
        let history = vec![
            HistoryEntry {
                count: 1_000,
                timestamp: now_ms - 8 * 24 * 3_600_000,
            },
            HistoryEntry {
                count: 21_000,
                timestamp: now_ms - 1,
            },
        ];
        let stats = StreamerStats::compute(&history, &now, 8);

        assert_eq!(stats.latest_count, 21_000);
        assert_eq!(stats.weekly_growth, 20_000);
        assert_eq!(stats.weekly_earnings, 30);
        assert_eq!(stats.tracked_growth, 20_000);
        assert_eq!(stats.target_progress_percent, 100);
        assert_eq!(stats.update_count, 2);
    }
}
