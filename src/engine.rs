// ⚙️ Rewards Engine - Output contracts for reporting collaborators
// Wraps the pure calculation core with a rate schedule and a diagnostic
// sink. The core functions stay side-effect free; this layer reports
// invalid amounts, skipped records and fallback periods around them.

use crate::aggregation::{aggregate_with_skips, MonthBucket, SkippedRecord};
use crate::calculator::{saturating_sum, RateSchedule};
use crate::calendar::month_index_from_name;
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::filter::{select_period, PeriodError};
use crate::statistics::{summarize, Statistics};
use crate::transaction::{RewardedTransaction, Transaction};
use rust_decimal::Decimal;
use serde::Serialize;

// ============================================================================
// REPORT
// ============================================================================

/// Everything a customer rewards view needs, computed in one pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardsReport {
    pub total_rewards: Decimal,
    pub rewards_by_month: Vec<MonthBucket>,
    pub rewards_by_transaction: Vec<RewardedTransaction>,
    /// Equals `rewards_by_transaction` when no period was requested
    pub filtered_rewards: Vec<RewardedTransaction>,
    pub statistics: Statistics,
    pub filtered_transaction_count: usize,
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct RewardsEngine<S: DiagnosticSink = TracingSink> {
    schedule: RateSchedule,
    sink: S,
}

impl RewardsEngine<TracingSink> {
    /// Default 50/100 schedule, diagnostics to `tracing`
    pub fn new() -> Self {
        RewardsEngine::with_sink(RateSchedule::default(), TracingSink)
    }
}

impl Default for RewardsEngine<TracingSink> {
    fn default() -> Self {
        RewardsEngine::new()
    }
}

impl<S: DiagnosticSink> RewardsEngine<S> {
    pub fn with_sink(schedule: RateSchedule, sink: S) -> Self {
        RewardsEngine { schedule, sink }
    }

    pub fn schedule(&self) -> &RateSchedule {
        &self.schedule
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Points for a single amount
    pub fn calculate_rewards(&self, amount: Decimal) -> Decimal {
        if amount.is_sign_negative() && !amount.is_zero() {
            self.sink.emit(&Diagnostic::InvalidAmount { transaction_id: None });
        }
        self.schedule.points(amount)
    }

    /// Sum of points over all transactions
    pub fn calculate_total_rewards(&self, transactions: &[Transaction]) -> Decimal {
        const OPERATION: &str = "calculate_total_rewards";
        if self.note_empty(OPERATION, transactions) {
            return Decimal::ZERO;
        }
        self.note_invalid_amounts(transactions);

        let total = saturating_sum(transactions.iter().map(|tx| tx.points(&self.schedule)));
        self.note_completed(OPERATION, transactions.len(), format!("total {}", total));
        total
    }

    /// Month buckets in first-seen order; records with unparseable dates
    /// are skipped and reported
    pub fn calculate_rewards_by_month(&self, transactions: &[Transaction]) -> Vec<MonthBucket> {
        const OPERATION: &str = "calculate_rewards_by_month";
        if self.note_empty(OPERATION, transactions) {
            return Vec::new();
        }
        self.note_invalid_amounts(transactions);
        self.buckets(OPERATION, transactions)
    }

    /// Lenient month/year filter. Unknown month names fall back to January
    /// and are reported.
    pub fn filter_transactions_by_month_year(
        &self,
        transactions: &[Transaction],
        month_name: &str,
        year: i32,
    ) -> Vec<Transaction> {
        let month_index = month_index_from_name(month_name).unwrap_or_else(|| {
            self.sink.emit(&Diagnostic::UnknownMonth {
                month: month_name.to_string(),
            });
            0
        });
        self.select("filter_transactions_by_month_year", transactions, month_index, year)
    }

    /// Strict month/year filter
    pub fn filter_transactions_by_period(
        &self,
        transactions: &[Transaction],
        month_name: &str,
        year: i32,
    ) -> Result<Vec<Transaction>, PeriodError> {
        let month_index = month_index_from_name(month_name)
            .ok_or_else(|| PeriodError::UnknownMonth(month_name.to_string()))?;
        Ok(self.select("filter_transactions_by_period", transactions, month_index, year))
    }

    pub fn get_rewards_statistics(&self, transactions: &[Transaction]) -> Statistics {
        const OPERATION: &str = "get_rewards_statistics";
        if self.note_empty(OPERATION, transactions) {
            return Statistics::default();
        }
        self.note_invalid_amounts(transactions);

        let stats = summarize(transactions, &self.schedule);
        self.note_completed(
            OPERATION,
            stats.count,
            format!("min {} max {} average {}", stats.min, stats.max, stats.average),
        );
        stats
    }

    /// Every transaction with its points attached, in input order
    pub fn rewards_by_transaction(&self, transactions: &[Transaction]) -> Vec<RewardedTransaction> {
        transactions
            .iter()
            .map(|tx| tx.with_points(&self.schedule))
            .collect()
    }

    /// Full customer view, optionally narrowed to a (month name, year)
    /// period. An empty input yields a zeroed report.
    pub fn report(&self, transactions: &[Transaction], period: Option<(&str, i32)>) -> RewardsReport {
        const OPERATION: &str = "report";
        if self.note_empty(OPERATION, transactions) {
            return RewardsReport::default();
        }
        self.note_invalid_amounts(transactions);

        let rewards_by_transaction = self.rewards_by_transaction(transactions);
        let total_rewards = saturating_sum(rewards_by_transaction.iter().map(|r| r.points));
        let rewards_by_month = self.buckets(OPERATION, transactions);
        let statistics = summarize(transactions, &self.schedule);

        let filtered_rewards = match period {
            Some((month_name, year)) => self
                .filter_transactions_by_month_year(transactions, month_name, year)
                .iter()
                .map(|tx| tx.with_points(&self.schedule))
                .collect(),
            None => rewards_by_transaction.clone(),
        };

        self.note_completed(
            OPERATION,
            transactions.len(),
            format!("total {}, {} months", total_rewards, rewards_by_month.len()),
        );

        RewardsReport {
            total_rewards,
            filtered_transaction_count: filtered_rewards.len(),
            rewards_by_month,
            rewards_by_transaction,
            filtered_rewards,
            statistics,
        }
    }

    // ========================================================================
    // DIAGNOSTIC HELPERS
    // ========================================================================

    fn buckets(&self, operation: &'static str, transactions: &[Transaction]) -> Vec<MonthBucket> {
        let aggregation = aggregate_with_skips(transactions, &self.schedule);
        self.note_skipped(operation, &aggregation.skipped);
        self.note_completed(
            operation,
            aggregation.placed_count(),
            format!("{} months", aggregation.buckets.len()),
        );
        aggregation.buckets
    }

    fn select(
        &self,
        operation: &'static str,
        transactions: &[Transaction],
        month_index: u32,
        year: i32,
    ) -> Vec<Transaction> {
        let selection = select_period(transactions, month_index, year);
        self.note_skipped(operation, &selection.skipped);
        self.note_completed(
            operation,
            selection.transactions.len(),
            format!("month index {} year {}", month_index, year),
        );
        selection.transactions
    }

    fn note_empty(&self, operation: &'static str, transactions: &[Transaction]) -> bool {
        if transactions.is_empty() {
            self.sink.emit(&Diagnostic::EmptyInput { operation });
            return true;
        }
        false
    }

    fn note_invalid_amounts(&self, transactions: &[Transaction]) {
        for tx in transactions.iter().filter(|tx| tx.valid_amount().is_none()) {
            self.sink.emit(&Diagnostic::InvalidAmount {
                transaction_id: Some(tx.id.clone()),
            });
        }
    }

    fn note_skipped(&self, operation: &'static str, skipped: &[SkippedRecord]) {
        for record in skipped {
            self.sink.emit(&Diagnostic::SkippedRecord {
                operation,
                transaction_id: record.transaction_id.clone(),
                date: record.date.clone(),
                reason: record.reason.clone(),
            });
        }
    }

    fn note_completed(&self, operation: &'static str, records: usize, detail: String) {
        self.sink.emit(&Diagnostic::Completed {
            operation,
            records,
            detail,
        });
    }
}

// ============================================================================
// TESTS
// ============================================================================
