// 🗓️ Transaction Aggregator - Per-month reward buckets
// Groups transactions by calendar month (YYYY-MM), summing points and
// counting records.
//
// Buckets keep first-seen order: the order in which distinct month keys
// first appear in the input. Callers that want chronological order call
// `sort_chronologically` on the result.

use crate::calendar::CalendarKey;
use crate::calculator::{saturating_sum, RateSchedule};
use crate::transaction::{RewardedTransaction, Transaction};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// MONTH BUCKET
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthBucket {
    /// "YYYY-MM"
    pub month_key: String,

    /// "<MonthName> <Year>"
    pub month_label: String,

    pub total_points: Decimal,

    /// Always equals `transactions.len()`
    pub transaction_count: usize,

    pub transactions: Vec<RewardedTransaction>,
}

impl MonthBucket {
    pub fn new(key: CalendarKey) -> Self {
        MonthBucket {
            month_key: key.key(),
            month_label: key.label(),
            total_points: Decimal::ZERO,
            transaction_count: 0,
            transactions: Vec::new(),
        }
    }

    /// Add one transaction (with its points) to the bucket
    pub fn record(&mut self, rewarded: RewardedTransaction) {
        self.total_points = self.total_points.saturating_add(rewarded.points);
        self.transaction_count += 1;
        self.transactions.push(rewarded);
    }

    /// Fold another bucket for the same month into this one
    fn absorb(&mut self, other: MonthBucket) {
        for rewarded in other.transactions {
            self.record(rewarded);
        }
    }
}

/// A record left out because its date could not be parsed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRecord {
    pub transaction_id: String,
    pub date: String,
    pub reason: String,
}

/// Buckets plus the records that could not be placed in one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregation {
    pub buckets: Vec<MonthBucket>,
    pub skipped: Vec<SkippedRecord>,
}

impl MonthlyAggregation {
    /// Number of transactions placed in buckets
    pub fn placed_count(&self) -> usize {
        self.buckets.iter().map(|b| b.transaction_count).sum()
    }

    pub fn total_points(&self) -> Decimal {
        saturating_sum(self.buckets.iter().map(|b| b.total_points))
    }
}

// ============================================================================
// ORDERED BUCKET MAP
// ============================================================================

/// Month key → bucket, preserving insertion order
#[derive(Debug, Default)]
struct BucketMap {
    index: HashMap<String, usize>,
    buckets: Vec<MonthBucket>,
}

impl BucketMap {
    fn bucket_for(&mut self, key: CalendarKey) -> &mut MonthBucket {
        let month_key = key.key();
        let position = match self.index.get(&month_key).copied() {
            Some(position) => position,
            None => {
                self.buckets.push(MonthBucket::new(key));
                self.index.insert(month_key, self.buckets.len() - 1);
                self.buckets.len() - 1
            }
        };
        &mut self.buckets[position]
    }

    fn merge(&mut self, bucket: MonthBucket) {
        match self.index.get(&bucket.month_key).copied() {
            Some(position) => self.buckets[position].absorb(bucket),
            None => {
                self.index.insert(bucket.month_key.clone(), self.buckets.len());
                self.buckets.push(bucket);
            }
        }
    }

    fn into_buckets(self) -> Vec<MonthBucket> {
        self.buckets
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Group transactions into month buckets, reporting records whose date
/// does not parse instead of failing the batch
pub fn aggregate_with_skips(
    transactions: &[Transaction],
    schedule: &RateSchedule,
) -> MonthlyAggregation {
    let mut map = BucketMap::default();
    let mut skipped = Vec::new();

    for tx in transactions {
        match CalendarKey::parse(&tx.date) {
            Ok(key) => map.bucket_for(key).record(tx.with_points(schedule)),
            Err(err) => skipped.push(SkippedRecord {
                transaction_id: tx.id.clone(),
                date: tx.date.clone(),
                reason: err.to_string(),
            }),
        }
    }

    MonthlyAggregation {
        buckets: map.into_buckets(),
        skipped,
    }
}

/// Month buckets under the default schedule, in first-seen order
pub fn aggregate_by_month(transactions: &[Transaction]) -> Vec<MonthBucket> {
    aggregate_with_skips(transactions, &RateSchedule::default()).buckets
}

/// Union several bucket lists by month key, accumulating points, counts
/// and transactions. Keys keep first-seen order across the parts.
pub fn merge_buckets<I>(parts: I) -> Vec<MonthBucket>
where
    I: IntoIterator<Item = Vec<MonthBucket>>,
{
    let mut map = BucketMap::default();
    for bucket in parts.into_iter().flatten() {
        map.merge(bucket);
    }
    map.into_buckets()
}

/// Order buckets oldest month first. Keys that do not parse go last.
pub fn sort_chronologically(buckets: &mut [MonthBucket]) {
    buckets.sort_by_cached_key(|bucket| {
        let key = CalendarKey::from_key(&bucket.month_key);
        (key.is_none(), key, bucket.month_key.clone())
    });
}

// ============================================================================
// PER-CUSTOMER BATCH
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAggregation {
    pub customer_id: String,
    pub aggregation: MonthlyAggregation,
}

/// One aggregation per customer, run on the rayon pool. Each worker owns
/// its customer's slice of records; results come back in first-seen
/// customer order.
pub fn aggregate_customers_parallel(
    transactions: &[Transaction],
    schedule: &RateSchedule,
) -> Vec<CustomerAggregation> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<Transaction>> = HashMap::new();

    for tx in transactions {
        let group = groups.entry(tx.customer_id.as_str()).or_insert_with(|| {
            order.push(tx.customer_id.as_str());
            Vec::new()
        });
        group.push(tx.clone());
    }

    let grouped: Vec<(&str, Vec<Transaction>)> = order
        .into_iter()
        .map(|id| (id, groups.remove(id).unwrap_or_default()))
        .collect();

    grouped
        .into_par_iter()
        .map(|(customer_id, records)| CustomerAggregation {
            customer_id: customer_id.to_string(),
            aggregation: aggregate_with_skips(&records, schedule),
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
