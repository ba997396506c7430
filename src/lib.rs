// Reward Points - Core Library
// Exposes the rewards engine for the CLI, the API server, and tests

pub mod transaction;
pub mod calculator;     // Tiered rate schedule
pub mod calendar;       // Month keys, labels and date helpers
pub mod aggregation;    // Per-month buckets
pub mod filter;         // Month/year period filter
pub mod statistics;     // Point statistics
pub mod diagnostics;    // Injected diagnostic sinks
pub mod engine;         // Output contracts + reports
pub mod fixture;        // JSON/CSV data loading
pub mod pagination;
pub mod config;

// Re-export commonly used types
pub use transaction::{Customer, RewardedTransaction, Transaction};
pub use calculator::{
    calculate_rewards, calculate_rewards_f64, calculate_total_rewards, saturating_sum,
    total_points, RateSchedule, ScheduleError, Tier,
};
pub use calendar::{
    day_of_week, format_date, format_date_range, is_current_month, last_n_months,
    month_index_from_name, month_key, month_label, month_name, month_number,
    parse_transaction_date, CalendarError, CalendarKey, MonthPeriod, MONTHS,
};
pub use aggregation::{
    aggregate_by_month, aggregate_customers_parallel, aggregate_with_skips, merge_buckets,
    sort_chronologically, CustomerAggregation, MonthBucket, MonthlyAggregation, SkippedRecord,
};
pub use filter::{
    filter_by_month_year, filter_by_period, is_known_month, search_by_date_range, select_period,
    PeriodError, PeriodSelection,
};
pub use statistics::{amount_statistics, get_rewards_statistics, summarize, AmountStatistics, Statistics};
pub use diagnostics::{Diagnostic, DiagnosticSink, Level, MemorySink, NullSink, TracingSink};
pub use engine::{RewardsEngine, RewardsReport};
pub use fixture::{load_data, load_fixture, load_transactions_csv, CustomerSummary, Fixture};
pub use pagination::{paginate, Page};
pub use config::RewardsConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
