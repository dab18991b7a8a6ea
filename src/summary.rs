use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::interest::PenaltyEngine;
use crate::loans::{Loan, LoanState};
use crate::types::{Period, PeriodFilter};

/// dashboard totals for one period or for the whole book
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PeriodSummary {
    /// gross principal ever lent in scope, regardless of outcome
    pub total_lent: Money,
    /// penalty-inclusive balance of pending loans, plus the base total of blocked ones
    pub total_receivable: Money,
    /// collected amounts of paid and renewed loans
    pub total_recovered: Money,
    /// loans in scope, excluding renewed ones
    pub loan_count: usize,
    pub delinquent_count: usize,
}

impl PeriodSummary {
    /// aggregate `loans` originated within `filter`, assessed as of `today`
    pub fn aggregate<'a>(
        loans: impl IntoIterator<Item = &'a Loan>,
        filter: PeriodFilter,
        engine: &PenaltyEngine,
        today: NaiveDate,
    ) -> Self {
        loans
            .into_iter()
            .filter(|loan| filter.includes(loan.period))
            .fold(PeriodSummary::default(), |mut acc, loan| {
                acc.total_lent += loan.principal;

                match &loan.state {
                    LoanState::Pending => {
                        let assessment = engine.assess(loan, today);
                        acc.total_receivable += assessment.updated_total;
                        if assessment.delinquent {
                            acc.delinquent_count += 1;
                        }
                        acc.loan_count += 1;
                    }
                    LoanState::Paid { collected, .. } => {
                        acc.total_recovered += *collected;
                        acc.loan_count += 1;
                    }
                    LoanState::Renewed { collected, .. } => {
                        acc.total_recovered += *collected;
                    }
                    LoanState::Blocked { .. } => {
                        acc.total_receivable += loan.total_owed;
                        acc.loan_count += 1;
                    }
                }

                acc
            })
    }
}

/// distinct origination periods, newest first
pub fn available_periods<'a>(loans: impl IntoIterator<Item = &'a Loan>) -> Vec<Period> {
    let periods: BTreeSet<Period> = loans.into_iter().map(|loan| loan.period).collect();
    periods.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan(principal: i64, total: i64, due_on: NaiveDate) -> Loan {
        Loan::test_fixture(
            Uuid::new_v4(),
            Money::from_major(principal),
            Money::from_major(total),
            due_on,
        )
    }

    #[test]
    fn test_pending_and_paid() {
        let today = date(2026, 2, 6);
        let pending = loan(1_000, 1_200, date(2026, 2, 3));
        let mut paid = loan(1_250, 1_500, date(2026, 2, 3));
        paid.settle(Money::from_major(1_500), date(2026, 2, 3)).unwrap();

        let summary = PeriodSummary::aggregate(
            [&pending, &paid],
            PeriodFilter::All,
            &PenaltyEngine::new(),
            today,
        );

        assert_eq!(summary.total_receivable, Money::from_major(1_380));
        assert_eq!(summary.total_recovered, Money::from_major(1_500));
        assert_eq!(summary.total_lent, Money::from_major(2_250));
        assert_eq!(summary.loan_count, 2);
        assert_eq!(summary.delinquent_count, 1);
    }

    #[test]
    fn test_total_lent_ignores_state() {
        let today = date(2026, 3, 1);
        let pending = loan(1_000, 1_200, date(2026, 3, 10));
        let mut paid = loan(700, 840, date(2026, 2, 3));
        paid.settle(Money::from_major(840), date(2026, 2, 3)).unwrap();
        let mut renewed = loan(300, 360, date(2026, 2, 3));
        renewed.state = LoanState::Renewed {
            collected: Money::from_major(60),
            collected_on: date(2026, 2, 3),
            successor: Uuid::new_v4(),
        };

        let loans = vec![pending, paid, renewed];
        let summary =
            PeriodSummary::aggregate(&loans, PeriodFilter::All, &PenaltyEngine::new(), today);

        let principal_sum: Money = loans.iter().map(|l| l.principal).sum();
        assert_eq!(summary.total_lent, principal_sum);
        assert_eq!(summary.total_recovered, Money::from_major(900));
        assert_eq!(summary.total_receivable, Money::from_major(1_200));
        // renewed loans are not counted
        assert_eq!(summary.loan_count, 2);
        assert_eq!(summary.delinquent_count, 0);
    }

    #[test]
    fn test_blocked_loan_counts_at_base_total() {
        let today = date(2026, 3, 1);
        let mut blocked = loan(1_000, 1_200, date(2026, 2, 3));
        blocked.block(date(2026, 2, 4)).unwrap();

        let summary =
            PeriodSummary::aggregate([&blocked], PeriodFilter::All, &PenaltyEngine::new(), today);
        assert_eq!(summary.total_receivable, Money::from_major(1_200));
        assert_eq!(summary.total_lent, Money::from_major(1_000));
        assert_eq!(summary.loan_count, 1);
        assert_eq!(summary.delinquent_count, 0);
    }

    #[test]
    fn test_period_filter() {
        let today = date(2026, 3, 20);
        let january = loan(1_000, 1_200, date(2026, 1, 20));
        let march = loan(500, 600, date(2026, 3, 15));

        let only_march = PeriodSummary::aggregate(
            [&january, &march],
            PeriodFilter::Only("2026-03".parse().unwrap()),
            &PenaltyEngine::new(),
            today,
        );
        assert_eq!(only_march.total_lent, Money::from_major(500));
        assert_eq!(only_march.loan_count, 1);
        // 5 days late: 600 * 1.25
        assert_eq!(only_march.total_receivable, Money::from_major(750));

        let empty = PeriodSummary::aggregate(
            [&january, &march],
            PeriodFilter::Only("2025-12".parse().unwrap()),
            &PenaltyEngine::new(),
            today,
        );
        assert_eq!(empty, PeriodSummary::default());
    }

    #[test]
    fn test_available_periods_newest_first() {
        let a = loan(100, 120, date(2026, 1, 20));
        let b = loan(100, 120, date(2026, 3, 15));
        let c = loan(100, 120, date(2026, 1, 25));
        let d = loan(100, 120, date(2025, 12, 20));

        let periods: Vec<String> = available_periods([&a, &b, &c, &d])
            .into_iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(periods, vec!["2026-03", "2026-01", "2025-12"]);
    }
}
