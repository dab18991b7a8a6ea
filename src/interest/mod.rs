pub mod penalty;

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};

pub use penalty::{PenaltyAssessment, PenaltyConfig, PenaltyEngine};

/// fixed term -> rate price list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermRateTable {
    rates: BTreeMap<u32, Rate>,
}

impl TermRateTable {
    pub fn new(rates: impl IntoIterator<Item = (u32, Rate)>) -> Self {
        Self {
            rates: rates.into_iter().collect(),
        }
    }

    /// 7 days at 20%, 14 days at 40%, 30 days at 100%
    pub fn standard() -> Self {
        Self::new([
            (7, Rate::from_percentage(20)),
            (14, Rate::from_percentage(40)),
            (30, Rate::from_percentage(100)),
        ])
    }

    /// look up the rate for a term; unknown terms are an error, never 0%
    pub fn rate_for(&self, term_days: u32) -> Result<Rate> {
        self.rates
            .get(&term_days)
            .copied()
            .ok_or(LedgerError::UnknownTerm { days: term_days })
    }

    pub fn terms(&self) -> impl Iterator<Item = u32> + '_ {
        self.rates.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, Rate)> + '_ {
        self.rates.iter().map(|(term, rate)| (*term, *rate))
    }
}

impl Default for TermRateTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// how the interest rate of a new loan is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pricing {
    /// look the term up in the configured price list
    Table,
    /// caller-supplied rate over the whole term (e.g. 0.20 for 20%)
    Explicit(Rate),
}

/// result of pricing a loan at issuance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestQuote {
    pub principal: Money,
    pub rate: Rate,
    pub term_days: u32,
    pub interest: Money,
    pub total_owed: Money,
    pub issued_on: NaiveDate,
    pub due_on: NaiveDate,
}

/// engine that prices loans: total owed and due date
#[derive(Debug, Clone)]
pub struct InterestEngine {
    pub table: TermRateTable,
    pub rate_ceiling: Option<Rate>,
}

impl InterestEngine {
    pub fn new(table: TermRateTable, rate_ceiling: Option<Rate>) -> Self {
        Self { table, rate_ceiling }
    }

    /// resolve and validate the rate for a term
    pub fn resolve_rate(&self, term_days: u32, pricing: Pricing) -> Result<Rate> {
        if term_days == 0 {
            return Err(LedgerError::InvalidTerm { days: term_days });
        }

        let rate = match pricing {
            Pricing::Table => self.table.rate_for(term_days)?,
            Pricing::Explicit(rate) => rate,
        };
        self.validate_rate(rate)?;

        Ok(rate)
    }

    /// rate must be positive and at most the ceiling, if one is set
    pub fn validate_rate(&self, rate: Rate) -> Result<()> {
        if !rate.is_positive() {
            return Err(LedgerError::InvalidInterestRate { rate });
        }
        if let Some(ceiling) = self.rate_ceiling {
            if rate > ceiling {
                return Err(LedgerError::InterestRateAboveCeiling { rate, ceiling });
            }
        }
        Ok(())
    }

    /// price a loan issued on `issued_on`
    pub fn quote(
        &self,
        principal: Money,
        term_days: u32,
        pricing: Pricing,
        issued_on: NaiveDate,
    ) -> Result<InterestQuote> {
        if !principal.is_positive() {
            return Err(LedgerError::InvalidAmount { amount: principal });
        }
        let rate = self.resolve_rate(term_days, pricing)?;
        let total_owed = total_owed(principal, rate)?;

        Ok(InterestQuote {
            principal,
            rate,
            term_days,
            interest: total_owed - principal,
            total_owed,
            issued_on,
            due_on: due_date(issued_on, term_days)?,
        })
    }
}

impl Default for InterestEngine {
    fn default() -> Self {
        Self::new(TermRateTable::standard(), Some(Rate::from_percentage(200)))
    }
}

/// amount owed at issuance: `principal * (1 + rate)`
pub fn total_owed(principal: Money, rate: Rate) -> Result<Money> {
    principal
        .grown_by(rate)
        .ok_or(LedgerError::InvalidAmount { amount: principal })
}

/// issuance date plus whole calendar days
pub fn due_date(issued_on: NaiveDate, term_days: u32) -> Result<NaiveDate> {
    issued_on
        .checked_add_days(Days::new(u64::from(term_days)))
        .ok_or_else(|| LedgerError::InvalidDate {
            message: format!("{} + {} days is out of range", issued_on, term_days),
        })
}
