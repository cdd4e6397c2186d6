//! Pure aggregation over subscriber history sequences.
//!
//! Every function here is a deterministic function of `(history, reference
//! time)` — no I/O, no hidden state, safe to call from any number of
//! concurrent readers. Inputs are expected sorted ascending by timestamp;
//! the storage layer guarantees that order on read.
//!
//! Edge policy: empty history resolves to 0 everywhere, a single entry
//! yields 0 growth. Nothing in this module errors or panics.

mod aggregate;
mod buckets;
mod earnings;
mod summary;

pub use aggregate::{
    can_record_update, count_at_or_before, growth, latest_count, latest_timestamp, tracked_growth,
};
pub use buckets::{WeekBucket, week_start, weekly_buckets};
pub use earnings::{
    BLOCK_PAYOUT, SUB_BLOCK_SIZE, WEEK_MS, earnings_for_growth, estimate_monthly_earnings,
    rolling_weekly_growth, target_progress_percent, weekly_earnings,
};
pub use summary::{HistoryView, TrackerSummary, summarize};
