// 📊 Statistics Summarizer - min / max / average / total of earned points
// Depends only on the multiset of point values, never on input order.
// Every field is zero for an empty collection.

use crate::calculator::{saturating_sum, RateSchedule};
use crate::transaction::Transaction;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub min: Decimal,
    pub max: Decimal,
    pub average: Decimal,
    pub total: Decimal,
    pub count: usize,
}

impl Statistics {
    /// Summary over already-computed point values
    pub fn from_points(points: &[Decimal]) -> Self {
        let (Some(min), Some(max)) = (points.iter().min(), points.iter().max()) else {
            return Statistics::default();
        };

        let total = saturating_sum(points.iter().copied());
        let count = points.len();

        Statistics {
            min: *min,
            max: *max,
            average: total / Decimal::from(count),
            total,
            count,
        }
    }
}

/// Point statistics under the given schedule. Records with invalid amounts
/// count as 0-point transactions.
pub fn summarize(transactions: &[Transaction], schedule: &RateSchedule) -> Statistics {
    let points: Vec<Decimal> = transactions.iter().map(|tx| tx.points(schedule)).collect();
    Statistics::from_points(&points)
}

/// Point statistics under the default schedule
pub fn get_rewards_statistics(transactions: &[Transaction]) -> Statistics {
    summarize(transactions, &RateSchedule::default())
}

// ============================================================================
// AMOUNT STATISTICS
// ============================================================================

/// Spending profile of a customer: raw amounts rather than points
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountStatistics {
    pub total_transactions: usize,
    pub min_transaction: Decimal,
    pub max_transaction: Decimal,
    pub average_transaction: Decimal,
}

/// Statistics over valid (present, non-negative) amounts.
/// `total_transactions` counts every record.
pub fn amount_statistics(transactions: &[Transaction]) -> AmountStatistics {
    let amounts: Vec<Decimal> = transactions.iter().filter_map(|tx| tx.valid_amount()).collect();
    let summary = Statistics::from_points(&amounts);

    AmountStatistics {
        total_transactions: transactions.len(),
        min_transaction: summary.min,
        max_transaction: summary.max,
        average_transaction: summary.average,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn amounts(values: &[Decimal]) -> Vec<Transaction> {
        values
            .iter()
            .enumerate()
            .map(|(i, amount)| Transaction::new(&format!("T{}", i), "C1", *amount, "2024-10-05"))
            .collect()
    }

    #[test]
    fn test_empty_is_all_zero() {
        let stats = get_rewards_statistics(&[]);
        assert_eq!(
            stats,
            Statistics {
                min: Decimal::ZERO,
                max: Decimal::ZERO,
                average: Decimal::ZERO,
                total: Decimal::ZERO,
                count: 0,
            }
        );
    }

    #[test]
    fn test_two_transactions() {
        let stats = get_rewards_statistics(&amounts(&[dec!(60), dec!(200)]));

        assert_eq!(stats.min, dec!(10));
        assert_eq!(stats.max, dec!(250));
        assert_eq!(stats.average, dec!(130));
        assert_eq!(stats.total, dec!(260));
        assert_eq!(stats.count, 2);
    }

    #[test]
    fn test_invalid_amount_counts_as_zero_points() {
        let mut transactions = amounts(&[dec!(120)]);
        transactions.push(Transaction {
            amount: None,
            ..Transaction::new("T9", "C1", Decimal::ZERO, "2024-10-05")
        });

        let stats = get_rewards_statistics(&transactions);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.min, Decimal::ZERO);
        assert_eq!(stats.total, dec!(90));
        assert_eq!(stats.average, dec!(45));
    }

    #[test]
    fn test_huge_points_saturate() {
        let stats = get_rewards_statistics(&amounts(&[Decimal::MAX, Decimal::MAX]));

        assert_eq!(stats.count, 2);
        assert_eq!(stats.max, Decimal::MAX);
        assert_eq!(stats.total, Decimal::MAX);
        assert!(stats.average > Decimal::ZERO);

        let spending = amount_statistics(&amounts(&[Decimal::MAX, dec!(1)]));
        assert_eq!(spending.max_transaction, Decimal::MAX);
    }

    #[test]
    fn test_amount_statistics() {
        let mut transactions = amounts(&[dec!(60), dec!(200), dec!(40)]);
        transactions.push(Transaction::new("NEG", "C1", dec!(-5), "2024-10-05"));

        let stats = amount_statistics(&transactions);
        assert_eq!(stats.total_transactions, 4);
        assert_eq!(stats.min_transaction, dec!(40));
        assert_eq!(stats.max_transaction, dec!(200));
        assert_eq!(stats.average_transaction, dec!(100));

        assert_eq!(amount_statistics(&[]), AmountStatistics::default());
    }

    proptest! {
        #[test]
        fn order_independent(cents in prop::collection::vec(0i64..100_000, 0..30)) {
            let values: Vec<Decimal> = cents.iter().map(|c| Decimal::new(*c, 2)).collect();
            let mut reversed = values.clone();
            reversed.reverse();

            prop_assert_eq!(
                get_rewards_statistics(&amounts(&values)),
                get_rewards_statistics(&amounts(&reversed))
            );
        }
    }
}
