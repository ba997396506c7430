// 🎯 Tiered Rate Calculator - Amount → reward points
// Two-tier schedule: nothing below $50, 1 point per whole dollar from $50
// to $100, 2 points per dollar (cents included) above $100.
//
//   amount < 50          → 0
//   50 <= amount <= 100  → floor(amount - 50) × 1
//   amount > 100         → 50 + (amount - 100) × 2
//
// Pure functions of the amount alone. Invalid input (negative, NaN,
// infinite) earns 0 points instead of failing. Arithmetic saturates at
// Decimal::MAX, so huge amounts and totals never panic.

use crate::transaction::Transaction;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// RATE SCHEDULE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateSchedule {
    /// Minimum amount that earns anything
    pub minimum: Decimal,

    /// Last amount still priced at the tier-1 rate
    pub tier1_end: Decimal,

    /// Amount above which the tier-2 rate applies
    pub tier2_start: Decimal,

    /// Points per whole dollar in tier 1
    pub tier1_rate: Decimal,

    /// Points per dollar in tier 2
    pub tier2_rate: Decimal,
}

impl Default for RateSchedule {
    fn default() -> Self {
        RateSchedule {
            minimum: Decimal::new(50, 0),
            tier1_end: Decimal::ONE_HUNDRED,
            tier2_start: Decimal::ONE_HUNDRED,
            tier1_rate: Decimal::ONE,
            tier2_rate: Decimal::new(2, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    BelowMinimum,
    Tier1,
    Tier2,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    #[error("minimum ({minimum}) must not be negative")]
    NegativeMinimum { minimum: Decimal },

    #[error("minimum ({minimum}) exceeds tier-1 end ({tier1_end})")]
    MinimumAboveTier1End { minimum: Decimal, tier1_end: Decimal },

    #[error("tier-2 start ({tier2_start}) is below tier-1 end ({tier1_end})")]
    Tier2BeforeTier1End { tier1_end: Decimal, tier2_start: Decimal },

    #[error("rate for {tier} must not be negative, got {rate}")]
    NegativeRate { tier: &'static str, rate: Decimal },
}

impl RateSchedule {
    /// Check that breakpoints are ordered and rates are non-negative
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.minimum.is_sign_negative() && !self.minimum.is_zero() {
            return Err(ScheduleError::NegativeMinimum { minimum: self.minimum });
        }
        if self.minimum > self.tier1_end {
            return Err(ScheduleError::MinimumAboveTier1End {
                minimum: self.minimum,
                tier1_end: self.tier1_end,
            });
        }
        if self.tier2_start < self.tier1_end {
            return Err(ScheduleError::Tier2BeforeTier1End {
                tier1_end: self.tier1_end,
                tier2_start: self.tier2_start,
            });
        }
        for (tier, rate) in [("tier 1", self.tier1_rate), ("tier 2", self.tier2_rate)] {
            if rate.is_sign_negative() && !rate.is_zero() {
                return Err(ScheduleError::NegativeRate { tier, rate });
            }
        }
        Ok(())
    }

    /// Which tier an amount falls into. Amounts between `tier1_end` and
    /// `tier2_start` stay in tier 1 at its cap.
    pub fn tier_for(&self, amount: Decimal) -> Tier {
        if amount < self.minimum {
            Tier::BelowMinimum
        } else if amount <= self.tier1_end.max(self.tier2_start) {
            Tier::Tier1
        } else {
            Tier::Tier2
        }
    }

    /// Fixed contribution of a fully-used tier 1
    pub fn tier1_cap(&self) -> Decimal {
        self.tier1_end
            .saturating_sub(self.minimum)
            .floor()
            .saturating_mul(self.tier1_rate)
            .max(Decimal::ZERO)
    }

    /// Points earned on a single amount, never negative
    pub fn points(&self, amount: Decimal) -> Decimal {
        if amount.is_sign_negative() {
            return Decimal::ZERO;
        }

        let points = match self.tier_for(amount) {
            Tier::BelowMinimum => Decimal::ZERO,
            // Whole dollars only: cents in this range are truncated
            Tier::Tier1 => amount
                .min(self.tier1_end)
                .saturating_sub(self.minimum)
                .floor()
                .saturating_mul(self.tier1_rate),
            // Exact excess, cents preserved
            Tier::Tier2 => self.tier1_cap().saturating_add(
                amount
                    .saturating_sub(self.tier2_start)
                    .saturating_mul(self.tier2_rate),
            ),
        };
        points.max(Decimal::ZERO)
    }
}

/// Sum that sticks at `Decimal::MAX` / `Decimal::MIN` instead of overflowing
pub fn saturating_sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .fold(Decimal::ZERO, |total, value| total.saturating_add(value))
}

// ============================================================================
// FREE FUNCTIONS (default schedule)
// ============================================================================

/// Points for one amount under the default 50/100 schedule
pub fn calculate_rewards(amount: Decimal) -> Decimal {
    RateSchedule::default().points(amount)
}

/// Same as [`calculate_rewards`] for float input. NaN, infinities and
/// negative values earn 0.
pub fn calculate_rewards_f64(amount: f64) -> Decimal {
    if !amount.is_finite() || amount < 0.0 {
        return Decimal::ZERO;
    }
    Decimal::from_f64(amount)
        .map(calculate_rewards)
        .unwrap_or(Decimal::ZERO)
}

/// Sum of points over all transactions under the given schedule
pub fn total_points(transactions: &[Transaction], schedule: &RateSchedule) -> Decimal {
    saturating_sum(transactions.iter().map(|tx| tx.points(schedule)))
}

/// Sum of points over all transactions under the default schedule
pub fn calculate_total_rewards(transactions: &[Transaction]) -> Decimal {
    total_points(transactions, &RateSchedule::default())
}

// ============================================================================
// TESTS
// ============================================================================
