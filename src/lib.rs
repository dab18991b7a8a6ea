pub mod client;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod investor;
pub mod ledger;
pub mod loans;
pub mod store;
pub mod summary;
pub mod types;

// re-export key types
pub use client::{Client, ClientDetails};
pub use config::{LedgerConfig, PricingConfig};
pub use decimal::{Money, Rate};
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use interest::{
    InterestEngine, InterestQuote, PenaltyAssessment, PenaltyConfig, PenaltyEngine, Pricing,
    TermRateTable,
};
pub use investor::{
    Investor, InvestorRequest, InvestorReturn, InvestorStatus, InvestorSummary, InvestorView,
};
pub use ledger::{Ledger, LoanRequest};
pub use loans::{Loan, LoanFilter, LoanState, LoanView, RenewalOutcome, RenewalRequest};
pub use store::{InMemoryStore, LedgerStore};
pub use summary::PeriodSummary;
pub use types::{
    ClientId, InvestorId, LoanId, LoanStanding, LoanStatus, Period, PeriodFilter,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
