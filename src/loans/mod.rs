pub mod renewal;
pub mod serialization;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::interest::{total_owed, InterestQuote, PenaltyAssessment, PenaltyEngine};
use crate::types::{ClientId, LoanId, LoanStanding, LoanStatus, Period};

pub use renewal::{RenewalOutcome, RenewalRequest};
pub use serialization::{LoanFilter, LoanView};

/// payment state of a loan; settlement data exists only once settled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoanState {
    /// issued and awaiting collection, possibly overdue
    Pending,
    /// collected in full; terminal
    Paid {
        collected: Money,
        collected_on: NaiveDate,
    },
    /// superseded by a successor loan; terminal
    Renewed {
        collected: Money,
        collected_on: NaiveDate,
        successor: LoanId,
    },
    /// frozen by the lender: no penalties, no collection, and the client
    /// cannot borrow again
    Blocked { blocked_on: NaiveDate },
}

impl LoanState {
    pub fn status(&self) -> LoanStatus {
        match self {
            LoanState::Pending => LoanStatus::Pending,
            LoanState::Paid { .. } => LoanStatus::Paid,
            LoanState::Renewed { .. } => LoanStatus::Renewed,
            LoanState::Blocked { .. } => LoanStatus::Blocked,
        }
    }

    /// amount collected at settlement, if settled
    pub fn collected(&self) -> Option<Money> {
        match self {
            LoanState::Pending | LoanState::Blocked { .. } => None,
            LoanState::Paid { collected, .. } | LoanState::Renewed { collected, .. } => {
                Some(*collected)
            }
        }
    }

    pub fn collected_on(&self) -> Option<NaiveDate> {
        match self {
            LoanState::Pending | LoanState::Blocked { .. } => None,
            LoanState::Paid { collected_on, .. } | LoanState::Renewed { collected_on, .. } => {
                Some(*collected_on)
            }
        }
    }
}

/// a short-term loan issued to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub client_id: ClientId,
    pub principal: Money,
    /// principal plus agreed interest, before penalties
    pub total_owed: Money,
    pub interest_rate: Rate,
    pub term_days: u32,
    pub penalty_rate: Rate,
    pub issued_on: NaiveDate,
    pub due_on: NaiveDate,
    pub period: Period,
    pub state: LoanState,
    /// the loan this one renews, if any
    pub renewed_from: Option<LoanId>,
}

impl Loan {
    /// build a pending loan from a priced quote
    pub fn originate(
        id: LoanId,
        client_id: ClientId,
        quote: &InterestQuote,
        penalty_rate: Rate,
    ) -> Self {
        Self {
            id,
            client_id,
            principal: quote.principal,
            total_owed: quote.total_owed,
            interest_rate: quote.rate,
            term_days: quote.term_days,
            penalty_rate,
            issued_on: quote.issued_on,
            due_on: quote.due_on,
            period: Period::of(quote.issued_on),
            state: LoanState::Pending,
            renewed_from: None,
        }
    }

    pub fn status(&self) -> LoanStatus {
        self.state.status()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, LoanState::Pending)
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self.state, LoanState::Blocked { .. })
    }

    /// agreed interest over the term
    pub fn interest(&self) -> Money {
        self.total_owed - self.principal
    }

    pub fn ensure_pending(&self) -> Result<()> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(LedgerError::LoanNotPending {
                id: self.id,
                status: self.status(),
            })
        }
    }

    /// derived late-payment figures as of `today`
    pub fn assess(&self, engine: &PenaltyEngine, today: NaiveDate) -> PenaltyAssessment {
        engine.assess(self, today)
    }

    /// standing for display, combining status and overdue days
    pub fn standing(&self, assessment: &PenaltyAssessment) -> LoanStanding {
        match self.state {
            LoanState::Paid { .. } => LoanStanding::Paid,
            LoanState::Renewed { .. } => LoanStanding::Renewed,
            LoanState::Blocked { .. } => LoanStanding::Blocked,
            LoanState::Pending if assessment.delinquent => LoanStanding::Overdue,
            LoanState::Pending => LoanStanding::Pending,
        }
    }

    /// pending -> paid, freezing the collected amount
    pub fn settle(&mut self, collected: Money, collected_on: NaiveDate) -> Result<()> {
        self.ensure_pending()?;
        if !collected.is_positive() {
            return Err(LedgerError::InvalidAmount { amount: collected });
        }

        self.state = LoanState::Paid {
            collected,
            collected_on,
        };
        Ok(())
    }

    /// pending -> blocked; blocking a blocked loan is a no-op
    pub fn block(&mut self, blocked_on: NaiveDate) -> Result<()> {
        if self.is_blocked() {
            return Ok(());
        }
        self.ensure_pending()?;

        self.state = LoanState::Blocked { blocked_on };
        Ok(())
    }

    /// lend more on a pending loan at its agreed rate; term and due date are unchanged
    pub fn add_principal(&mut self, extra: Money) -> Result<()> {
        self.ensure_pending()?;
        if !extra.is_positive() {
            return Err(LedgerError::InvalidAmount { amount: extra });
        }

        let principal = self
            .principal
            .checked_add(extra)
            .ok_or(LedgerError::InvalidAmount { amount: extra })?;
        self.total_owed = total_owed(principal, self.interest_rate)?;
        self.principal = principal;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn test_fixture(
        id: LoanId,
        principal: Money,
        total_owed: Money,
        due_on: NaiveDate,
    ) -> Self {
        let issued_on = due_on - chrono::Duration::days(7);
        Self {
            id,
            client_id: uuid::Uuid::nil(),
            principal,
            total_owed,
            interest_rate: Rate::from_decimal(
                (total_owed.as_decimal() - principal.as_decimal()) / principal.as_decimal(),
            ),
            term_days: 7,
            penalty_rate: Rate::from_percentage(5),
            issued_on,
            due_on,
            period: Period::of(issued_on),
            state: LoanState::Pending,
            renewed_from: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interest::{InterestEngine, Pricing};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn issued_loan() -> Loan {
        let quote = InterestEngine::default()
            .quote(Money::from_major(1_000), 7, Pricing::Table, date(2026, 1, 27))
            .unwrap();
        Loan::originate(Uuid::new_v4(), Uuid::new_v4(), &quote, Rate::from_percentage(5))
    }

    #[test]
    fn test_originate() {
        let loan = issued_loan();
        assert_eq!(loan.principal, Money::from_major(1_000));
        assert_eq!(loan.total_owed, Money::from_major(1_200));
        assert_eq!(loan.interest(), Money::from_major(200));
        assert_eq!(loan.due_on, date(2026, 2, 3));
        assert_eq!(loan.period.to_string(), "2026-01");
        assert_eq!(loan.status(), LoanStatus::Pending);
        assert_eq!(loan.state.collected(), None);
    }

    #[test]
    fn test_settle() {
        let mut loan = issued_loan();
        loan.settle(Money::from_major(1_380), date(2026, 2, 6)).unwrap();

        assert_eq!(loan.status(), LoanStatus::Paid);
        assert_eq!(loan.state.collected(), Some(Money::from_major(1_380)));
        assert_eq!(loan.state.collected_on(), Some(date(2026, 2, 6)));
    }

    #[test]
    fn test_settle_twice_is_a_state_conflict() {
        let mut loan = issued_loan();
        loan.settle(Money::from_major(1_200), date(2026, 2, 1)).unwrap();

        let err = loan.settle(Money::from_major(1_200), date(2026, 2, 2)).unwrap_err();
        assert!(err.is_state_conflict());
        assert_eq!(loan.state.collected(), Some(Money::from_major(1_200)));
        assert_eq!(loan.state.collected_on(), Some(date(2026, 2, 1)));
    }

    #[test]
    fn test_settle_rejects_non_positive_amount() {
        let mut loan = issued_loan();
        let err = loan.settle(Money::ZERO, date(2026, 2, 1)).unwrap_err();
        assert!(err.is_validation());
        assert!(loan.is_pending());
    }

    #[test]
    fn test_add_principal_keeps_rate_and_due_date() {
        let mut loan = issued_loan();
        loan.add_principal(Money::from_major(500)).unwrap();

        assert_eq!(loan.principal, Money::from_major(1_500));
        assert_eq!(loan.total_owed, Money::from_major(1_800));
        assert_eq!(loan.due_on, date(2026, 2, 3));
        assert_eq!(loan.term_days, 7);
        assert!(loan.is_pending());
    }

    #[test]
    fn test_add_principal_validation() {
        let mut loan = issued_loan();
        assert!(loan.add_principal(Money::from_major(-5)).unwrap_err().is_validation());

        loan.settle(Money::from_major(1_200), date(2026, 2, 1)).unwrap();
        assert!(loan.add_principal(Money::from_major(100)).unwrap_err().is_state_conflict());
        assert_eq!(loan.principal, Money::from_major(1_000));
    }

    #[test]
    fn test_add_principal_overflow_leaves_loan_unchanged() {
        let mut loan = issued_loan();
        let err = loan.add_principal(Money::MAX).unwrap_err();

        assert_eq!(err, LedgerError::InvalidAmount { amount: Money::MAX });
        assert_eq!(loan.principal, Money::from_major(1_000));
        assert_eq!(loan.total_owed, Money::from_major(1_200));
    }

    #[test]
    fn test_block() {
        let mut loan = issued_loan();
        loan.block(date(2026, 2, 1)).unwrap();
        assert_eq!(loan.status(), LoanStatus::Blocked);
        assert_eq!(loan.state.collected(), None);

        // idempotent
        loan.block(date(2026, 2, 9)).unwrap();
        assert_eq!(loan.state, LoanState::Blocked { blocked_on: date(2026, 2, 1) });

        assert!(loan.settle(Money::from_major(1_200), date(2026, 2, 2)).unwrap_err().is_state_conflict());
        assert!(loan.add_principal(Money::from_major(100)).unwrap_err().is_state_conflict());

        let engine = PenaltyEngine::new();
        let late = loan.assess(&engine, date(2026, 3, 1));
        assert_eq!(loan.standing(&late), LoanStanding::Blocked);
    }

    #[test]
    fn test_settled_loan_cannot_be_blocked() {
        let mut loan = issued_loan();
        loan.settle(Money::from_major(1_200), date(2026, 2, 1)).unwrap();

        let err = loan.block(date(2026, 2, 2)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::LoanNotPending {
                id: loan.id,
                status: LoanStatus::Paid,
            }
        );
    }

    #[test]
    fn test_standing() {
        let engine = PenaltyEngine::new();
        let mut loan = issued_loan();

        let on_time = loan.assess(&engine, date(2026, 2, 1));
        assert_eq!(loan.standing(&on_time), LoanStanding::Pending);

        let late = loan.assess(&engine, date(2026, 2, 6));
        assert_eq!(loan.standing(&late), LoanStanding::Overdue);

        loan.settle(Money::from_major(1_380), date(2026, 2, 6)).unwrap();
        let settled = loan.assess(&engine, date(2026, 2, 6));
        assert_eq!(loan.standing(&settled), LoanStanding::Paid);
    }

    #[test]
    fn test_state_serde_shape() {
        let state = LoanState::Paid {
            collected: Money::from_major(1_500),
            collected_on: date(2026, 2, 10),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "paid");
        assert_eq!(json["collected_on"], "2026-02-10");

        let back: LoanState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
