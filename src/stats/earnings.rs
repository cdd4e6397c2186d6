use super::aggregate::growth;
use crate::storage::models::HistoryEntry;

/// Subscribers per payout block. A fixed business constant, not a rate.
pub const SUB_BLOCK_SIZE: i64 = 19_500;
/// Currency units paid per full block
pub const BLOCK_PAYOUT: i64 = 30;

/// Seven days in milliseconds
pub const WEEK_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Payout for a growth amount: whole 19 500-subscriber blocks at 30 units
/// each, integer division. Non-positive growth pays nothing — the estimate
/// is a display motivator, never a debt.
pub fn earnings_for_growth(growth: i64) -> i64 {
    if growth <= 0 {
        return 0;
    }
    (growth / SUB_BLOCK_SIZE) * BLOCK_PAYOUT
}

/// Growth over the trailing 7 days from `now_ms`
pub fn rolling_weekly_growth(history: &[HistoryEntry], now_ms: i64) -> i64 {
    growth(history, now_ms - WEEK_MS, now_ms)
}

/// Estimated payout for the trailing week
pub fn weekly_earnings(history: &[HistoryEntry], now_ms: i64) -> i64 {
    earnings_for_growth(rolling_weekly_growth(history, now_ms))
}

/// Monthly estimate: average growth over the last four trailing weeks,
/// floored to whole blocks, times four weeks.
pub fn estimate_monthly_earnings(history: &[HistoryEntry], now_ms: i64) -> i64 {
    if history.is_empty() {
        return 0;
    }
    let mut total = 0;
    for w in 0..4 {
        let end = now_ms - w * WEEK_MS;
        total += growth(history, end - WEEK_MS, end);
    }
    earnings_for_growth(total / 4) * 4
}

/// Progress toward one payout block, as a rounded 0-100 percentage
pub fn target_progress_percent(growth: i64) -> u32 {
    let pct = (growth as f64 / SUB_BLOCK_SIZE as f64 * 100.0).clamp(0.0, 100.0);
    pct.round() as u32
}
