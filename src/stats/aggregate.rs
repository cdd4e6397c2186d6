use crate::storage::models::HistoryEntry;

/// Count of the newest entry, 0 for an empty history.
///
/// Contract: `history` is sorted ascending by timestamp.
pub fn latest_count(history: &[HistoryEntry]) -> i64 {
    history.last().map(|h| h.count).unwrap_or(0)
}

/// Timestamp (ms) of the newest entry
pub fn latest_timestamp(history: &[HistoryEntry]) -> Option<i64> {
    history.last().map(|h| h.timestamp)
}

/// Count of the most recent entry with `timestamp <= ts`.
///
/// Falls back to the earliest entry's count when every entry is newer than
/// `ts`, and to 0 when the history is empty. The fallback is deliberate:
/// growth over a window that predates the streamer is zero, not negative.
pub fn count_at_or_before(history: &[HistoryEntry], ts: i64) -> i64 {
    let idx = history.partition_point(|h| h.timestamp <= ts);
    match idx {
        0 => history.first().map(|h| h.count).unwrap_or(0),
        n => history[n - 1].count,
    }
}

/// Subscriber growth between two instants, closest-preceding-entry semantics
pub fn growth(history: &[HistoryEntry], window_start: i64, window_end: i64) -> i64 {
    count_at_or_before(history, window_end) - count_at_or_before(history, window_start)
}

/// Total growth since tracking began: last count minus first count.
///
/// Needs at least two points to have a delta.
pub fn tracked_growth(history: &[HistoryEntry]) -> i64 {
    if history.len() < 2 {
        return 0;
    }
    latest_count(history) - history[0].count
}

/// Whether enough time has passed since the last update to record another.
///
/// A rolling window: false while `now - latest < cooldown`. An empty history
/// can always record.
pub fn can_record_update(history: &[HistoryEntry], now_ms: i64, cooldown_ms: i64) -> bool {
    match latest_timestamp(history) {
        Some(last) => now_ms - last >= cooldown_ms,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(count: i64, timestamp: i64) -> HistoryEntry {
        HistoryEntry { count, timestamp }
    }

    #[test]
    fn test_latest_count_empty() {
        assert_eq!(latest_count(&[]), 0);
        assert_eq!(latest_timestamp(&[]), None);
    }

    #[test]
    fn test_latest_count_is_last_entry() {
        let history = vec![entry(100, 1_000), entry(250, 2_000), entry(230, 3_000)];
        assert_eq!(latest_count(&history), 230);
        assert_eq!(latest_timestamp(&history), Some(3_000));
    }

    #[test]
    fn test_count_at_or_before_exact_and_between() {
        let history = vec![entry(100, 1_000), entry(200, 2_000), entry(300, 3_000)];
        assert_eq!(count_at_or_before(&history, 2_000), 200);
        assert_eq!(count_at_or_before(&history, 2_500), 200);
        assert_eq!(count_at_or_before(&history, 9_999), 300);
    }

    #[test]
    fn test_count_at_or_before_falls_back_to_earliest() {
        let history = vec![entry(100, 1_000), entry(200, 2_000)];
        assert_eq!(count_at_or_before(&history, 500), 100);
    }

    #[test]
    fn test_count_at_or_before_empty() {
        assert_eq!(count_at_or_before(&[], 1_000), 0);
    }

    #[test]
    fn test_growth_zero_width_window() {
        let history = vec![entry(100, 1_000), entry(200, 2_000)];
        assert_eq!(growth(&history, 1_500, 1_500), 0);
    }

    #[test]
    fn test_growth_basic_window() {
        let history = vec![entry(1_000, 1_000), entry(1_500, 5_000)];
        assert_eq!(growth(&history, 2_000, 6_000), 500);
    }

    #[test]
    fn test_growth_window_before_first_entry_is_zero() {
        // Both boundaries precede the earliest entry: fallback makes both
        // sides the earliest count, so growth is 0, not negative.
        let history = vec![entry(1_000, 10_000), entry(1_500, 20_000)];
        assert_eq!(growth(&history, 1_000, 2_000), 0);
    }

    #[test]
    fn test_growth_single_entry_is_zero() {
        let history = vec![entry(1_000, 10_000)];
        assert_eq!(growth(&history, 0, 99_999), 0);
    }

    #[test]
    fn test_tracked_growth() {
        assert_eq!(tracked_growth(&[]), 0);
        assert_eq!(tracked_growth(&[entry(500, 1_000)]), 0);
        let history = vec![entry(500, 1_000), entry(900, 2_000), entry(800, 3_000)];
        assert_eq!(tracked_growth(&history), 300);
    }

    #[test]
    fn test_can_record_update_cooldown() {
        let cooldown = 12 * 60 * 60 * 1000;
        let history = vec![entry(100, 1_000_000)];

        // Immediately after the entry: blocked
        assert!(!can_record_update(&history, 1_000_000, cooldown));
        // One millisecond short of the window: still blocked
        assert!(!can_record_update(&history, 1_000_000 + cooldown - 1, cooldown));
        // Exactly at the window boundary: allowed
        assert!(can_record_update(&history, 1_000_000 + cooldown, cooldown));
    }

    #[test]
    fn test_can_record_update_empty_history() {
        assert!(can_record_update(&[], 123, 12 * 60 * 60 * 1000));
    }
}
