use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::loans::{Loan, LoanState};

/// penalty configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyConfig {
    /// penalty charged per overdue day, as a share of the base total owed
    pub daily_rate: Rate,
}

impl PenaltyConfig {
    pub fn new(daily_rate: Rate) -> Self {
        Self { daily_rate }
    }
}

impl Default for PenaltyConfig {
    /// 5% of the base total per overdue day
    fn default() -> Self {
        Self::new(Rate::from_percentage(5))
    }
}

/// derived late-payment figures for one loan on one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyAssessment {
    pub days_overdue: u32,
    pub daily_penalty: Money,
    pub penalty_total: Money,
    /// penalty-inclusive amount owed, or the frozen collected amount once settled
    pub updated_total: Money,
    pub delinquent: bool,
}

/// engine for late-payment penalties
///
/// Penalties are simple interest on the base total owed: linear in days and
/// recomputed from scratch on every call, never from a previously penalized
/// total. Settled loans are frozen at their collected amount, blocked loans
/// at their base total. Figures too large to represent saturate at `Money::MAX`.
#[derive(Debug, Clone, Default)]
pub struct PenaltyEngine;

impl PenaltyEngine {
    pub fn new() -> Self {
        Self
    }

    /// whole calendar days past due, zero when not yet due
    pub fn days_overdue(due_on: NaiveDate, today: NaiveDate) -> u32 {
        let days = (today - due_on).num_days();
        u32::try_from(days.max(0)).unwrap_or(u32::MAX)
    }

    /// assess a loan as of `today`
    pub fn assess(&self, loan: &Loan, today: NaiveDate) -> PenaltyAssessment {
        match &loan.state {
            LoanState::Paid { collected, .. } | LoanState::Renewed { collected, .. } => {
                PenaltyAssessment {
                    days_overdue: 0,
                    daily_penalty: Money::ZERO,
                    penalty_total: Money::ZERO,
                    updated_total: *collected,
                    delinquent: false,
                }
            }
            LoanState::Blocked { .. } => PenaltyAssessment {
                days_overdue: 0,
                daily_penalty: Money::ZERO,
                penalty_total: Money::ZERO,
                updated_total: loan.total_owed,
                delinquent: false,
            },
            LoanState::Pending => {
                self.assess_pending(loan.total_owed, loan.penalty_rate, loan.due_on, today)
            }
        }
    }

    /// figures for an unsettled balance
    pub fn assess_pending(
        &self,
        base_total: Money,
        daily_rate: Rate,
        due_on: NaiveDate,
        today: NaiveDate,
    ) -> PenaltyAssessment {
        let days_overdue = Self::days_overdue(due_on, today);
        let daily_penalty = base_total.accrue_daily(daily_rate, 1).unwrap_or(Money::MAX);
        let penalty_total = base_total
            .accrue_daily(daily_rate, days_overdue)
            .unwrap_or(Money::MAX);

        PenaltyAssessment {
            days_overdue,
            daily_penalty,
            penalty_total,
            updated_total: base_total.checked_add(penalty_total).unwrap_or(Money::MAX),
            delinquent: days_overdue > 0,
        }
    }
}
