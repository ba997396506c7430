// 📂 Fixture Loader - Customers and transactions for the reports
// Reads the `{ "customers": [...], "transactions": [...] }` JSON document,
// or a transactions-only CSV, and serves per-customer views of it.

use crate::calculator::{total_points, RateSchedule};
use crate::filter::search_by_date_range;
use crate::statistics::{amount_statistics, AmountStatistics};
use crate::transaction::{Customer, Transaction};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// A customer row with its earned points
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub id: String,
    pub name: String,
    pub total_points: Decimal,
    pub transaction_count: usize,
}

/// Load the JSON fixture document
pub fn load_fixture(path: &Path) -> Result<Fixture> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture file: {:?}", path))?;

    serde_json::from_str(&content).context("Failed to parse fixture JSON")
}

/// Load transactions from a CSV with an `id,customerId,amount,date` header
pub fn load_transactions_csv(path: &Path) -> Result<Vec<Transaction>> {
    let mut rdr = csv::Reader::from_path(path).context("Failed to open CSV file")?;

    let mut transactions = Vec::new();
    for result in rdr.deserialize() {
        let transaction: Transaction = result.context("Failed to deserialize transaction")?;
        transactions.push(transaction);
    }

    Ok(transactions)
}

/// Load a fixture by extension: `.csv` holds transactions only, anything
/// else is read as the JSON document
pub fn load_data(path: &Path) -> Result<Fixture> {
    let is_csv = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        load_transactions_csv(path).map(Fixture::from_transactions)
    } else {
        load_fixture(path)
    }
}

impl Fixture {
    /// Fixture without a customer list: one customer per distinct id,
    /// named after the id
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        let mut customers: Vec<Customer> = Vec::new();
        for tx in &transactions {
            if !customers.iter().any(|c| c.id == tx.customer_id) {
                customers.push(Customer {
                    id: tx.customer_id.clone(),
                    name: tx.customer_id.clone(),
                });
            }
        }
        Fixture {
            customers,
            transactions,
        }
    }

    pub fn customer(&self, customer_id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == customer_id)
    }

    /// All transactions of one customer, in fixture order
    pub fn transactions_for(&self, customer_id: &str) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.customer_id == customer_id)
            .cloned()
            .collect()
    }

    /// Every customer with total points and transaction count
    pub fn customers_with_points(&self, schedule: &RateSchedule) -> Vec<CustomerSummary> {
        self.customers
            .iter()
            .map(|customer| {
                let transactions = self.transactions_for(&customer.id);
                CustomerSummary {
                    id: customer.id.clone(),
                    name: customer.name.clone(),
                    total_points: total_points(&transactions, schedule),
                    transaction_count: transactions.len(),
                }
            })
            .collect()
    }

    /// Summary for one customer, `None` when the id is unknown
    pub fn customer_summary(&self, customer_id: &str, schedule: &RateSchedule) -> Option<CustomerSummary> {
        let customer = self.customer(customer_id)?;
        let transactions = self.transactions_for(customer_id);
        Some(CustomerSummary {
            id: customer.id.clone(),
            name: customer.name.clone(),
            total_points: total_points(&transactions, schedule),
            transaction_count: transactions.len(),
        })
    }

    /// Spending statistics for one customer, `None` when the id is unknown
    pub fn customer_statistics(&self, customer_id: &str) -> Option<AmountStatistics> {
        self.customer(customer_id)?;
        Some(amount_statistics(&self.transactions_for(customer_id)))
    }

    /// A customer's transactions dated within `start..=end`
    pub fn search_transactions(
        &self,
        customer_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<Transaction> {
        search_by_date_range(&self.transactions_for(customer_id), start, end)
    }
}

// ============================================================================
// TESTS
// ============================================================================
