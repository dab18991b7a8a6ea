use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::LedgerError;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for an investor
pub type InvestorId = Uuid;

/// unique identifier for a client
pub type ClientId = Uuid;

/// origination period, a calendar year-month (`YYYY-MM`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, LedgerError> {
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) {
            return Err(LedgerError::InvalidPeriod {
                value: format!("{}-{}", year, month),
            });
        }
        Ok(Self { year, month })
    }

    /// period containing the given date
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Period::of(date) == *self
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidPeriod {
            value: s.to_string(),
        };

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;

        Period::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Period {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

/// period selection for dashboard aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PeriodFilter {
    /// every loan regardless of origination period
    #[default]
    All,
    /// only loans originated in the given period
    Only(Period),
}

impl PeriodFilter {
    pub fn includes(&self, period: Period) -> bool {
        match self {
            PeriodFilter::All => true,
            PeriodFilter::Only(selected) => *selected == period,
        }
    }
}

impl FromStr for PeriodFilter {
    type Err = LedgerError;

    /// `"ALL"` (any case) selects everything, otherwise a `YYYY-MM` key
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(PeriodFilter::All)
        } else {
            Ok(PeriodFilter::Only(s.parse()?))
        }
    }
}

/// stored payment status of a loan, without the state payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    Pending,
    Paid,
    Renewed,
    Blocked,
}

/// display standing of a loan, derived from status and the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStanding {
    /// pending and not yet past its due date
    Pending,
    /// pending and past its due date
    Overdue,
    Paid,
    Renewed,
    Blocked,
}
