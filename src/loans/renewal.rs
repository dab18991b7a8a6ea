use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::interest::{InterestEngine, PenaltyEngine, Pricing};
use crate::loans::{Loan, LoanState};
use crate::types::LoanId;

/// terms for rolling a pending loan into a new one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenewalRequest {
    /// principal of the successor loan
    pub amount: Money,
    pub term_days: u32,
    pub pricing: Pricing,
}

/// both sides of a renewal: the closed source and its successor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenewalOutcome {
    pub closed: Loan,
    pub successor: Loan,
    /// receivable on the source at the moment of renewal
    pub receivable: Money,
}

/// close `source` as renewed and open a successor issued on `today`.
///
/// The source is not touched; on success the caller persists both records
/// of the outcome. The source records its agreed interest as collected and
/// the successor carries `penalty_rate`, the rate in force today.
pub fn renew(
    source: &Loan,
    request: &RenewalRequest,
    successor_id: LoanId,
    interest: &InterestEngine,
    penalties: &PenaltyEngine,
    penalty_rate: Rate,
    today: NaiveDate,
) -> Result<RenewalOutcome> {
    source.ensure_pending()?;

    if !request.amount.is_positive() {
        return Err(LedgerError::InvalidAmount {
            amount: request.amount,
        });
    }
    // term and rate are checked before the balance so each failure is reported distinctly
    interest.resolve_rate(request.term_days, request.pricing)?;

    let receivable = source.assess(penalties, today).updated_total;
    if request.amount > receivable {
        return Err(LedgerError::RenewalExceedsReceivable {
            requested: request.amount,
            receivable,
        });
    }

    let quote = interest.quote(request.amount, request.term_days, request.pricing, today)?;
    let mut successor = Loan::originate(successor_id, source.client_id, &quote, penalty_rate);
    successor.renewed_from = Some(source.id);

    let mut closed = source.clone();
    closed.state = LoanState::Renewed {
        collected: source.interest(),
        collected_on: today,
        successor: successor_id,
    };

    Ok(RenewalOutcome {
        closed,
        successor,
        receivable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LoanStatus;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 1000 lent, 1200 owed, due 2026-02-03
    fn source() -> Loan {
        Loan::test_fixture(
            Uuid::new_v4(),
            Money::from_major(1_000),
            Money::from_major(1_200),
            date(2026, 2, 3),
        )
    }

    fn request(amount: i64) -> RenewalRequest {
        RenewalRequest {
            amount: Money::from_major(amount),
            term_days: 14,
            pricing: Pricing::Explicit(Rate::from_percentage(40)),
        }
    }

    #[test]
    fn test_renewal_opens_successor() {
        let source = source();
        let successor_id = Uuid::new_v4();
        let today = date(2026, 3, 2);

        let outcome = renew(
            &source,
            &request(1_000),
            successor_id,
            &InterestEngine::default(),
            &PenaltyEngine::new(),
            Rate::from_percentage(5),
            today,
        )
        .unwrap();

        let successor = &outcome.successor;
        assert_eq!(successor.id, successor_id);
        assert_eq!(successor.client_id, source.client_id);
        assert_eq!(successor.principal, Money::from_major(1_000));
        assert_eq!(successor.total_owed, Money::from_major(1_400));
        assert_eq!(successor.issued_on, today);
        assert_eq!(successor.due_on, date(2026, 3, 16));
        assert_eq!(successor.period.to_string(), "2026-03");
        assert_eq!(successor.status(), LoanStatus::Pending);
        assert_eq!(successor.renewed_from, Some(source.id));

        let closed = &outcome.closed;
        assert_eq!(closed.status(), LoanStatus::Renewed);
        assert_eq!(closed.state.collected(), Some(Money::from_major(200)));
        assert_eq!(closed.period, source.period);
        assert!(matches!(
            closed.state,
            LoanState::Renewed { successor, .. } if successor == successor_id
        ));

        // the input record is untouched
        assert!(source.is_pending());
    }

    #[test]
    fn test_renewal_up_to_penalized_receivable() {
        let source = source();
        // 3 days late: 1200 * 1.15 = 1380
        let today = date(2026, 2, 6);

        let outcome = renew(
            &source,
            &request(1_380),
            Uuid::new_v4(),
            &InterestEngine::default(),
            &PenaltyEngine::new(),
            Rate::from_percentage(5),
            today,
        )
        .unwrap();
        assert_eq!(outcome.receivable, Money::from_major(1_380));
        assert_eq!(outcome.successor.principal, Money::from_major(1_380));
    }

    #[test]
    fn test_renewal_exceeding_receivable_fails() {
        let source = source();
        let err = renew(
            &source,
            &request(1_381),
            Uuid::new_v4(),
            &InterestEngine::default(),
            &PenaltyEngine::new(),
            Rate::from_percentage(5),
            date(2026, 2, 6),
        )
        .unwrap_err();

        assert_eq!(
            err,
            LedgerError::RenewalExceedsReceivable {
                requested: Money::from_major(1_381),
                receivable: Money::from_major(1_380),
            }
        );
        assert!(source.is_pending());
    }

    #[test]
    fn test_renewal_validation_is_distinct() {
        let source = source();
        let interest = InterestEngine::default();
        let penalties = PenaltyEngine::new();
        let penalty_rate = Rate::from_percentage(5);
        let today = date(2026, 2, 1);

        let zero_amount = renew(
            &source,
            &request(0),
            Uuid::new_v4(),
            &interest,
            &penalties,
            penalty_rate,
            today,
        );
        assert!(matches!(zero_amount, Err(LedgerError::InvalidAmount { .. })));

        let mut zero_term = request(500);
        zero_term.term_days = 0;
        let zero_term = renew(
            &source,
            &zero_term,
            Uuid::new_v4(),
            &interest,
            &penalties,
            penalty_rate,
            today,
        );
        assert_eq!(zero_term, Err(LedgerError::InvalidTerm { days: 0 }));

        let mut zero_rate = request(500);
        zero_rate.pricing = Pricing::Explicit(Rate::ZERO);
        let zero_rate = renew(
            &source,
            &zero_rate,
            Uuid::new_v4(),
            &interest,
            &penalties,
            penalty_rate,
            today,
        );
        assert_eq!(zero_rate, Err(LedgerError::InvalidInterestRate { rate: Rate::ZERO }));
    }

    #[test]
    fn test_renewing_settled_loan_is_a_conflict() {
        let mut source = source();
        source
            .settle(Money::from_major(1_200), date(2026, 2, 1))
            .unwrap();

        let err = renew(
            &source,
            &request(500),
            Uuid::new_v4(),
            &InterestEngine::default(),
            &PenaltyEngine::new(),
            Rate::from_percentage(5),
            date(2026, 2, 2),
        )
        .unwrap_err();
        assert_eq!(
            err,
            LedgerError::LoanNotPending {
                id: source.id,
                status: LoanStatus::Paid,
            }
        );
    }

    #[test]
    fn test_successor_takes_current_penalty_rate() {
        let source = source();
        let outcome = renew(
            &source,
            &request(1_000),
            Uuid::new_v4(),
            &InterestEngine::default(),
            &PenaltyEngine::new(),
            Rate::from_percentage(2),
            date(2026, 2, 1),
        )
        .unwrap();

        assert_eq!(outcome.successor.penalty_rate, Rate::from_percentage(2));
        assert_eq!(outcome.closed.penalty_rate, Rate::from_percentage(5));
    }

    #[test]
    fn test_renewing_blocked_loan_is_a_conflict() {
        let mut source = source();
        source.block(date(2026, 2, 1)).unwrap();

        let err = renew(
            &source,
            &request(500),
            Uuid::new_v4(),
            &InterestEngine::default(),
            &PenaltyEngine::new(),
            Rate::from_percentage(5),
            date(2026, 2, 2),
        )
        .unwrap_err();
        assert_eq!(
            err,
            LedgerError::LoanNotPending {
                id: source.id,
                status: LoanStatus::Blocked,
            }
        );
    }
}
