// 🔎 Period Filter - Transactions in a given month and year
// Selects records whose date falls in (month name, year). Never mutates
// the input; always returns a fresh Vec.
//
// Two flavours for month names outside the calendar table:
//   filter_by_month_year → falls back to January (lenient, historical)
//   filter_by_period     → PeriodError::UnknownMonth (strict)

use crate::aggregation::SkippedRecord;
use crate::calendar::{month_index_from_name, parse_transaction_date, CalendarKey, MONTHS};
use crate::transaction::Transaction;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    #[error("unknown month name {0:?}, expected one of January..December")]
    UnknownMonth(String),
}

/// Outcome of a period selection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodSelection {
    pub transactions: Vec<Transaction>,
    /// Records whose date did not parse
    pub skipped: Vec<SkippedRecord>,
}

/// Transactions whose month (0-based index) and year match exactly
pub fn select_period(transactions: &[Transaction], month_index: u32, year: i32) -> PeriodSelection {
    let mut selection = PeriodSelection::default();

    for tx in transactions {
        match CalendarKey::parse(&tx.date) {
            Ok(key) => {
                if key.month_index() == month_index && key.year == year {
                    selection.transactions.push(tx.clone());
                }
            }
            Err(err) => selection.skipped.push(SkippedRecord {
                transaction_id: tx.id.clone(),
                date: tx.date.clone(),
                reason: err.to_string(),
            }),
        }
    }

    selection
}

/// Lenient filter: an unrecognised month name is treated as January.
/// Validate names against [`MONTHS`] first, or use [`filter_by_period`].
pub fn filter_by_month_year(
    transactions: &[Transaction],
    month_name: &str,
    year: i32,
) -> Vec<Transaction> {
    let month_index = month_index_from_name(month_name).unwrap_or(0);
    select_period(transactions, month_index, year).transactions
}

/// Strict filter: an unrecognised month name is an error, distinguishable
/// from a recognised period with zero matches
pub fn filter_by_period(
    transactions: &[Transaction],
    month_name: &str,
    year: i32,
) -> Result<Vec<Transaction>, PeriodError> {
    let month_index = month_index_from_name(month_name)
        .ok_or_else(|| PeriodError::UnknownMonth(month_name.to_string()))?;
    Ok(select_period(transactions, month_index, year).transactions)
}

/// True when `name` is one of the canonical month names
pub fn is_known_month(name: &str) -> bool {
    MONTHS.contains(&name)
}

/// Transactions dated within `start..=end`; unparseable dates never match
pub fn search_by_date_range(
    transactions: &[Transaction],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| {
            parse_transaction_date(&tx.date)
                .map(|date| date >= start && date <= end)
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn sample() -> Vec<Transaction> {
        vec![
            Transaction::new("T1", "C1", dec!(60), "2024-10-05"),
            Transaction::new("T2", "C1", dec!(200), "2024-10-20"),
            Transaction::new("T3", "C1", dec!(30), "2024-11-01"),
        ]
    }

    #[test]
    fn test_october_2024() {
        let filtered = filter_by_month_year(&sample(), "October", 2024);
        let ids: Vec<&str> = filtered.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["T1", "T2"]);
    }

    #[test]
    fn test_year_must_match() {
        assert!(filter_by_month_year(&sample(), "October", 2023).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_by_month_year(&[], "October", 2024).is_empty());
        assert_eq!(filter_by_period(&[], "October", 2024), Ok(vec![]));
    }

    #[test]
    fn test_unknown_month_falls_back_to_january() {
        let mut transactions = sample();
        transactions.push(Transaction::new("T4", "C1", dec!(120), "2024-01-15"));

        let filtered = filter_by_month_year(&transactions, "Octobre", 2024);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "T4");

        // Case-sensitive
        assert_eq!(filter_by_month_year(&transactions, "october", 2024).len(), 1);
    }

    #[test]
    fn test_strict_rejects_unknown_month() {
        assert_eq!(
            filter_by_period(&sample(), "Octobre", 2024),
            Err(PeriodError::UnknownMonth("Octobre".to_string()))
        );
        assert_eq!(filter_by_period(&sample(), "November", 2024).unwrap().len(), 1);
        assert!(is_known_month("May"));
        assert!(!is_known_month("may"));
    }

    #[test]
    fn test_source_is_untouched_and_bad_dates_reported() {
        let mut transactions = sample();
        transactions.push(Transaction::new("BAD", "C1", dec!(120), "31/31/2024"));
        let before = transactions.clone();

        let selection = select_period(&transactions, 9, 2024);

        assert_eq!(transactions, before);
        assert_eq!(selection.transactions.len(), 2);
        assert_eq!(selection.skipped.len(), 1);
        assert_eq!(selection.skipped[0].transaction_id, "BAD");
    }

    #[test]
    fn test_search_by_date_range_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 10, 5).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 10, 20).unwrap();

        let found = search_by_date_range(&sample(), start, end);
        assert_eq!(found.len(), 2);

        let none = search_by_date_range(&sample(), end, start);
        assert!(none.is_empty());
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent(
            days in prop::collection::vec((2023i32..2026, 1u32..=12, 1u32..=28), 0..40),
            month in 0usize..12,
            year in 2023i32..2026,
        ) {
            let transactions: Vec<Transaction> = days
                .iter()
                .enumerate()
                .map(|(i, (y, m, d))| {
                    Transaction::new(
                        &format!("T{}", i),
                        "C1",
                        Decimal::new(12_000, 2),
                        &format!("{:04}-{:02}-{:02}", y, m, d),
                    )
                })
                .collect();

            let once = filter_by_month_year(&transactions, MONTHS[month], year);
            let twice = filter_by_month_year(&once, MONTHS[month], year);
            prop_assert_eq!(once, twice);
        }
    }
}
