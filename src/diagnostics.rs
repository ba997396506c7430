// 📣 Diagnostics - Injected observability collaborator
// The calculation core never logs. The engine reports what it skipped or
// recovered from through a DiagnosticSink handed to it by the caller.
//
// Sinks:
//   TracingSink  → forwards to `tracing` (default for binaries)
//   MemorySink   → collects events, used by tests and batch reports
//   NullSink     → drops everything
//   Fn(&Diagnostic) closures are sinks too

use std::fmt;
use std::sync::Mutex;

// ============================================================================
// DIAGNOSTIC EVENTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Amount missing, non-numeric or negative; the record earned 0 points
    InvalidAmount { transaction_id: Option<String> },

    /// Record left out of a collection-level result because its date did not parse
    SkippedRecord {
        operation: &'static str,
        transaction_id: String,
        date: String,
        reason: String,
    },

    /// Month name not in the calendar table; filtering fell back to January
    UnknownMonth { month: String },

    /// Operation ran on an empty collection
    EmptyInput { operation: &'static str },

    /// Operation finished
    Completed {
        operation: &'static str,
        records: usize,
        detail: String,
    },
}

impl Diagnostic {
    pub fn level(&self) -> Level {
        match self {
            Diagnostic::InvalidAmount { .. } => Level::Warn,
            Diagnostic::SkippedRecord { .. } => Level::Error,
            Diagnostic::UnknownMonth { .. } => Level::Warn,
            Diagnostic::EmptyInput { .. } => Level::Info,
            Diagnostic::Completed { .. } => Level::Debug,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InvalidAmount {
                transaction_id: Some(id),
            } => write!(f, "invalid amount on transaction {}, no points earned", id),
            Diagnostic::InvalidAmount { transaction_id: None } => {
                write!(f, "invalid amount, no points earned")
            }
            Diagnostic::SkippedRecord {
                operation,
                transaction_id,
                date,
                reason,
            } => write!(
                f,
                "{}: skipped transaction {} with date {:?}: {}",
                operation, transaction_id, date, reason
            ),
            Diagnostic::UnknownMonth { month } => {
                write!(f, "unknown month name {:?}, falling back to January", month)
            }
            Diagnostic::EmptyInput { operation } => write!(f, "{}: no transactions", operation),
            Diagnostic::Completed {
                operation,
                records,
                detail,
            } => write!(f, "{}: {} records, {}", operation, records, detail),
        }
    }
}

// ============================================================================
// SINKS
// ============================================================================

pub trait DiagnosticSink {
    fn emit(&self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic),
{
    fn emit(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// Forwards diagnostics to `tracing` with structured fields
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::InvalidAmount { transaction_id } => {
                tracing::warn!(transaction_id = ?transaction_id, "Invalid amount for rewards calculation");
            }
            Diagnostic::SkippedRecord {
                operation,
                transaction_id,
                date,
                reason,
            } => {
                tracing::error!(
                    operation = *operation,
                    transaction_id = %transaction_id,
                    date = %date,
                    reason = %reason,
                    "Skipped transaction with unparseable date"
                );
            }
            Diagnostic::UnknownMonth { month } => {
                tracing::warn!(month = %month, "Unknown month name, falling back to January");
            }
            Diagnostic::EmptyInput { operation } => {
                tracing::info!(operation = *operation, "No transactions to process");
            }
            Diagnostic::Completed {
                operation,
                records,
                detail,
            } => {
                tracing::debug!(operation = *operation, records = *records, detail = %detail, "Completed");
            }
        }
    }
}

/// Keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }

    /// Snapshot of everything emitted so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Diagnostics at or above the given level
    pub fn at_least(&self, level: Level) -> Vec<Diagnostic> {
        self.diagnostics()
            .into_iter()
            .filter(|d| d.level() >= level)
            .collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: &Diagnostic) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(diagnostic.clone());
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: &Diagnostic) {}
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_memory_sink_collects_in_order() {
        let sink = MemorySink::new();
        sink.emit(&Diagnostic::EmptyInput { operation: "summarize" });
        sink.emit(&Diagnostic::UnknownMonth {
            month: "Smarch".to_string(),
        });

        let events = sink.diagnostics();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].level(), Level::Warn);
        assert_eq!(sink.at_least(Level::Warn).len(), 1);
    }

    #[test]
    fn test_closure_is_a_sink() {
        let seen = RefCell::new(Vec::new());
        let sink = |d: &Diagnostic| seen.borrow_mut().push(d.to_string());

        sink.emit(&Diagnostic::InvalidAmount {
            transaction_id: Some("T9".to_string()),
        });

        assert_eq!(
            seen.into_inner(),
            vec!["invalid amount on transaction T9, no points earned".to_string()]
        );
    }

    #[test]
    fn test_display_skipped_record() {
        let diagnostic = Diagnostic::SkippedRecord {
            operation: "aggregate_by_month",
            transaction_id: "T1".to_string(),
            date: "bogus".to_string(),
            reason: "unparseable date: \"bogus\"".to_string(),
        };
        assert!(diagnostic.to_string().starts_with("aggregate_by_month: skipped transaction T1"));
        assert_eq!(diagnostic.level(), Level::Error);
    }
}
