use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::types::InvestorId;

const SECONDS_PER_DAY: i64 = 86_400;

/// investor status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvestorStatus {
    /// capital is working in the loan pool
    Active,
    /// capital and yield returned; terminal
    Settled { settled_at: DateTime<Utc> },
}

/// an external investor funding the loan pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investor {
    pub id: InvestorId,
    pub name: String,
    pub invested: Money,
    /// yield per elapsed day (e.g. 0.01 for 1% a day)
    pub daily_rate: Rate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: InvestorStatus,
}

/// terms for a new investor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorRequest {
    pub name: String,
    pub invested: Money,
    pub daily_rate: Rate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// accrued return over a date range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestorReturn {
    pub elapsed_days: u32,
    pub yield_amount: Money,
    pub total_returnable: Money,
}

impl Investor {
    /// validate terms and open an active investor
    pub fn open(id: InvestorId, request: InvestorRequest) -> Result<Self> {
        if !request.invested.is_positive() {
            return Err(LedgerError::InvalidAmount {
                amount: request.invested,
            });
        }
        if !request.daily_rate.is_positive() {
            return Err(LedgerError::InvalidInterestRate {
                rate: request.daily_rate,
            });
        }
        if request.end < request.start {
            return Err(LedgerError::InvalidDateRange {
                start: request.start,
                end: request.end,
            });
        }
        let days = elapsed_days(request.start, request.end);
        request
            .invested
            .accrue_daily(request.daily_rate, days)
            .and_then(|yield_amount| request.invested.checked_add(yield_amount))
            .ok_or(LedgerError::InvalidAmount {
                amount: request.invested,
            })?;

        Ok(Self {
            id,
            name: request.name,
            invested: request.invested,
            daily_rate: request.daily_rate,
            start: request.start,
            end: request.end,
            status: InvestorStatus::Active,
        })
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, InvestorStatus::Active)
    }

    /// return over the recorded start/end range
    pub fn returns(&self) -> InvestorReturn {
        calculate_return(self.invested, self.daily_rate, self.start, self.end)
    }

    /// return accrued up to `as_of` while active; settled investors keep their recorded range
    pub fn returns_as_of(&self, as_of: DateTime<Utc>) -> InvestorReturn {
        match self.status {
            InvestorStatus::Active => {
                calculate_return(self.invested, self.daily_rate, self.start, as_of)
            }
            InvestorStatus::Settled { .. } => self.returns(),
        }
    }

    /// active -> settled
    pub fn settle(&mut self, settled_at: DateTime<Utc>) -> Result<()> {
        if !self.is_active() {
            return Err(LedgerError::InvestorAlreadySettled { id: self.id });
        }
        self.status = InvestorStatus::Settled { settled_at };
        Ok(())
    }
}

/// whole days between two instants, rounding any partial day up and clamping at zero
pub fn elapsed_days(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let delta = end - start;
    if delta <= Duration::zero() {
        return 0;
    }
    let seconds = delta.num_seconds();
    let mut days = seconds / SECONDS_PER_DAY;
    if seconds % SECONDS_PER_DAY != 0 || delta.subsec_nanos() != 0 {
        days += 1;
    }
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// simple daily yield: `invested * daily_rate * elapsed_days`, saturating at `Money::MAX`
pub fn calculate_return(
    invested: Money,
    daily_rate: Rate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> InvestorReturn {
    let elapsed = elapsed_days(start, end);
    let yield_amount = invested.accrue_daily(daily_rate, elapsed).unwrap_or(Money::MAX);

    InvestorReturn {
        elapsed_days: elapsed,
        yield_amount,
        total_returnable: invested.checked_add(yield_amount).unwrap_or(Money::MAX),
    }
}

/// totals across the investor book
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct InvestorSummary {
    /// capital of active investors
    pub capital_under_management: Money,
    pub active_count: usize,
    pub settled_count: usize,
}

impl InvestorSummary {
    pub fn from_investors<'a>(investors: impl IntoIterator<Item = &'a Investor>) -> Self {
        investors
            .into_iter()
            .fold(InvestorSummary::default(), |mut acc, investor| {
                if investor.is_active() {
                    acc.capital_under_management += investor.invested;
                    acc.active_count += 1;
                } else {
                    acc.settled_count += 1;
                }
                acc
            })
    }
}

/// serializable view of an investor with accrued figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorView {
    pub id: InvestorId,
    pub name: String,
    pub invested: Money,
    pub daily_rate: Rate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: InvestorStatus,
    pub elapsed_days: u32,
    pub yield_amount: Money,
    pub total_returnable: Money,
}

impl InvestorView {
    pub fn from_investor(investor: &Investor) -> Self {
        let returns = investor.returns();
        Self {
            id: investor.id,
            name: investor.name.clone(),
            invested: investor.invested,
            daily_rate: investor.daily_rate,
            start: investor.start,
            end: investor.end,
            status: investor.status,
            elapsed_days: returns.elapsed_days,
            yield_amount: returns.yield_amount,
            total_returnable: returns.total_returnable,
        }
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
