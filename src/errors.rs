use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::decimal::{Money, Rate};
use uuid::Uuid;

use crate::types::{ClientId, InvestorId, LoanId, LoanStatus};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    // validation
    #[error("invalid amount: {amount} (must be greater than zero)")]
    InvalidAmount {
        amount: Money,
    },

    #[error("invalid term: {days} days (must be greater than zero)")]
    InvalidTerm {
        days: u32,
    },

    #[error("no rate configured for a {days} day term")]
    UnknownTerm {
        days: u32,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidInterestRate {
        rate: Rate,
    },

    #[error("interest rate {rate} exceeds ceiling {ceiling}")]
    InterestRateAboveCeiling {
        rate: Rate,
        ceiling: Rate,
    },

    #[error("renewal amount {requested} exceeds outstanding receivable {receivable}")]
    RenewalExceedsReceivable {
        requested: Money,
        receivable: Money,
    },

    #[error("invalid date range: end {end} precedes start {start}")]
    InvalidDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid period: {value} (expected YYYY-MM)")]
    InvalidPeriod {
        value: String,
    },

    #[error("invalid client: {message}")]
    InvalidClient {
        message: String,
    },

    #[error("a client with national id {national_id} already exists")]
    DuplicateClient {
        national_id: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    // state conflicts
    #[error("loan {id} is not pending: current status is {status:?}")]
    LoanNotPending {
        id: LoanId,
        status: LoanStatus,
    },

    #[error("investor {id} already settled")]
    InvestorAlreadySettled {
        id: InvestorId,
    },

    #[error("client {client_id} has a blocked loan and cannot borrow")]
    ClientBlocked {
        client_id: ClientId,
    },

    #[error("a record with id {id} already exists")]
    DuplicateRecord {
        id: Uuid,
    },

    // lookups
    #[error("loan not found: {id}")]
    LoanNotFound {
        id: LoanId,
    },

    #[error("investor not found: {id}")]
    InvestorNotFound {
        id: InvestorId,
    },

    #[error("client not found: {id}")]
    ClientNotFound {
        id: ClientId,
    },

    // external store
    #[error("store unavailable: {message}")]
    StoreUnavailable {
        message: String,
    },
}

impl LedgerError {
    /// caller-supplied values violated a precondition
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidAmount { .. }
                | LedgerError::InvalidTerm { .. }
                | LedgerError::UnknownTerm { .. }
                | LedgerError::InvalidInterestRate { .. }
                | LedgerError::InterestRateAboveCeiling { .. }
                | LedgerError::RenewalExceedsReceivable { .. }
                | LedgerError::InvalidDateRange { .. }
                | LedgerError::InvalidDate { .. }
                | LedgerError::InvalidPeriod { .. }
                | LedgerError::InvalidClient { .. }
                | LedgerError::DuplicateClient { .. }
                | LedgerError::InvalidConfiguration { .. }
        )
    }

    /// the record is not in the state the operation requires
    pub fn is_state_conflict(&self) -> bool {
        matches!(
            self,
            LedgerError::LoanNotPending { .. }
                | LedgerError::InvestorAlreadySettled { .. }
                | LedgerError::ClientBlocked { .. }
                | LedgerError::DuplicateRecord { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LedgerError::LoanNotFound { .. }
                | LedgerError::InvestorNotFound { .. }
                | LedgerError::ClientNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
