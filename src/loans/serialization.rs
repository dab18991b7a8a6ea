/// serialization support for loans
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::interest::PenaltyEngine;
use crate::loans::Loan;
use crate::types::{ClientId, LoanId, LoanStanding, LoanStatus, Period};

/// serializable view of a loan with derived figures recomputed for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub client_id: ClientId,
    pub status: LoanStatus,
    pub standing: LoanStanding,
    pub period: Period,
    pub issued_on: NaiveDate,
    pub due_on: NaiveDate,
    pub financial: FinancialView,
    pub settlement: Option<SettlementView>,
    pub renewed_from: Option<LoanId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialView {
    pub principal: Money,
    pub total_owed: Money,
    pub interest_rate: Rate,
    pub term_days: u32,
    pub days_overdue: u32,
    pub daily_penalty: Money,
    pub penalty_total: Money,
    pub updated_total: Money,
    pub delinquent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementView {
    pub collected: Money,
    pub collected_on: NaiveDate,
}

impl LoanView {
    pub fn from_loan(loan: &Loan, engine: &PenaltyEngine, today: NaiveDate) -> Self {
        let assessment = loan.assess(engine, today);

        LoanView {
            id: loan.id,
            client_id: loan.client_id,
            status: loan.status(),
            standing: loan.standing(&assessment),
            period: loan.period,
            issued_on: loan.issued_on,
            due_on: loan.due_on,
            financial: FinancialView {
                principal: loan.principal,
                total_owed: loan.total_owed,
                interest_rate: loan.interest_rate,
                term_days: loan.term_days,
                days_overdue: assessment.days_overdue,
                daily_penalty: assessment.daily_penalty,
                penalty_total: assessment.penalty_total,
                updated_total: assessment.updated_total,
                delinquent: assessment.delinquent,
            },
            settlement: loan.state.collected().zip(loan.state.collected_on()).map(
                |(collected, collected_on)| SettlementView {
                    collected,
                    collected_on,
                },
            ),
            renewed_from: loan.renewed_from,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// table filter over loan views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoanFilter {
    #[default]
    All,
    /// pending and past due
    Delinquent,
    Paid,
}

impl LoanFilter {
    pub fn matches(&self, view: &LoanView) -> bool {
        match self {
            LoanFilter::All => true,
            LoanFilter::Delinquent => view.standing == LoanStanding::Overdue,
            LoanFilter::Paid => view.status == LoanStatus::Paid,
        }
    }

    pub fn apply(&self, views: Vec<LoanView>) -> Vec<LoanView> {
        views.into_iter().filter(|v| self.matches(v)).collect()
    }
}
