use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::aggregate::growth;
use crate::storage::models::HistoryEntry;

/// One labeled 7-day growth window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekBucket {
    pub label: String,
    pub growth: i64,
}

/// Monday 00:00 of the week containing `now`, in `now`'s timezone
/// (ISO-8601 week start).
pub fn week_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let days_from_monday = now.weekday().num_days_from_monday() as i64;
    let monday = now.date_naive() - Duration::days(days_from_monday);
    let midnight = monday.and_time(NaiveTime::MIN);
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .unwrap_or_else(|| now.timezone().from_utc_datetime(&midnight))
}

/// Partition time into `week_count` consecutive Monday-aligned 7-day
/// windows ending at the week containing `now`, oldest first.
///
/// Always returns exactly `week_count` buckets regardless of history
/// length; windows with no data resolve to zero growth via the
/// closest-preceding-entry semantics of [`growth`].
pub fn weekly_buckets<Tz: TimeZone>(
    history: &[HistoryEntry],
    now: &DateTime<Tz>,
    week_count: usize,
) -> Vec<WeekBucket>
where
    Tz::Offset: std::fmt::Display,
{
    let current_week_end = week_start(now) + Duration::weeks(1);

    let mut buckets = Vec::with_capacity(week_count);
    for k in (0..week_count).rev() {
        let end = current_week_end.clone() - Duration::weeks(k as i64);
        let start = end.clone() - Duration::weeks(1);
        let label = format!("{} - {}", start.format("%b %d"), end.format("%b %d"));
        buckets.push(WeekBucket {
            label,
            growth: growth(history, start.timestamp_millis(), end.timestamp_millis()),
        });
    }
    buckets
}
