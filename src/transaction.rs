// 🧾 Transaction Model - Immutable input records
// Dated monetary transactions as served by the data-fetching layer
//
// Amounts are decimals, never floats. A JSON number is decoded from its
// textual form so 125.75 stays 125.75; any other JSON value (string, bool,
// null, missing) is kept as "no amount" and earns no points.

use crate::calculator::RateSchedule;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

// ============================================================================
// TRANSACTION
// ============================================================================

/// A single purchase made by a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: String,

    /// Owning customer
    pub customer_id: String,

    /// Monetary value; `None` when the source value was not a number
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: Option<Decimal>,

    /// Calendar date as received (ISO-8601 or MM/DD/YYYY)
    pub date: String,
}

impl Transaction {
    pub fn new(id: &str, customer_id: &str, amount: Decimal, date: &str) -> Self {
        Transaction {
            id: id.to_string(),
            customer_id: customer_id.to_string(),
            amount: Some(amount),
            date: date.to_string(),
        }
    }

    /// Amount usable for point calculation (present and non-negative)
    pub fn valid_amount(&self) -> Option<Decimal> {
        self.amount.filter(|amount| !amount.is_sign_negative() || amount.is_zero())
    }

    /// Points earned under the given schedule. Invalid amounts earn 0.
    pub fn points(&self, schedule: &RateSchedule) -> Decimal {
        self.amount
            .map(|amount| schedule.points(amount))
            .unwrap_or(Decimal::ZERO)
    }

    /// Attach computed points to a copy of this transaction
    pub fn with_points(&self, schedule: &RateSchedule) -> RewardedTransaction {
        RewardedTransaction {
            points: self.points(schedule),
            transaction: self.clone(),
        }
    }
}

/// Transaction plus the points it earned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,

    pub points: Decimal,
}

// ============================================================================
// CUSTOMER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
}

// ============================================================================
// AMOUNT DECODING
// ============================================================================

fn deserialize_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::Number(number) => decimal_from_number(&number),
        _ => None,
    }))
}

fn decimal_from_number(number: &serde_json::Number) -> Option<Decimal> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decode_numeric_amount_exactly() {
        let tx: Transaction = serde_json::from_str(
            r#"{"id":"T1","customerId":"C1","amount":125.75,"date":"2024-10-05"}"#,
        )
        .unwrap();

        assert_eq!(tx.amount, Some(dec!(125.75)));
        assert_eq!(tx.customer_id, "C1");
    }

    #[test]
    fn test_decode_non_numeric_amount_as_none() {
        let text = r#"{"id":"T1","customerId":"C1","amount":"120","date":"2024-10-05"}"#;
        let tx: Transaction = serde_json::from_str(text).unwrap();
        assert_eq!(tx.amount, None);

        let missing = r#"{"id":"T2","customerId":"C1","date":"2024-10-05"}"#;
        let tx: Transaction = serde_json::from_str(missing).unwrap();
        assert_eq!(tx.amount, None);

        let null = r#"{"id":"T3","customerId":"C1","amount":null,"date":"2024-10-05"}"#;
        let tx: Transaction = serde_json::from_str(null).unwrap();
        assert_eq!(tx.amount, None);
    }

    #[test]
    fn test_invalid_amounts_earn_nothing() {
        let schedule = RateSchedule::default();

        let mut tx = Transaction::new("T1", "C1", dec!(-120), "2024-10-05");
        assert_eq!(tx.valid_amount(), None);
        assert_eq!(tx.points(&schedule), Decimal::ZERO);

        tx.amount = None;
        assert_eq!(tx.points(&schedule), Decimal::ZERO);
    }

    #[test]
    fn test_with_points_keeps_record() {
        let tx = Transaction::new("T1", "C1", dec!(120), "2024-10-05");
        let rewarded = tx.with_points(&RateSchedule::default());

        assert_eq!(rewarded.points, dec!(90));
        assert_eq!(rewarded.transaction, tx);

        let json = serde_json::to_value(&rewarded).unwrap();
        assert_eq!(json["id"], "T1");
        assert_eq!(json["customerId"], "C1");
        assert!(json.get("points").is_some());
    }
}
