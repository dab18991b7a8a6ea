use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{ClientId, InvestorId, LoanId};

/// all events that can be emitted by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    ClientRegistered {
        client_id: ClientId,
        timestamp: DateTime<Utc>,
    },

    // loan lifecycle events
    LoanOriginated {
        loan_id: LoanId,
        client_id: ClientId,
        principal: Money,
        total_owed: Money,
        rate: Rate,
        due_on: NaiveDate,
        timestamp: DateTime<Utc>,
    },
    PrincipalAdded {
        loan_id: LoanId,
        amount: Money,
        new_principal: Money,
        new_total_owed: Money,
        timestamp: DateTime<Utc>,
    },
    LoanSettled {
        loan_id: LoanId,
        collected: Money,
        days_overdue: u32,
        timestamp: DateTime<Utc>,
    },
    LoanRenewed {
        loan_id: LoanId,
        successor_id: LoanId,
        interest_collected: Money,
        renewed_amount: Money,
        timestamp: DateTime<Utc>,
    },
    LoanBlocked {
        loan_id: LoanId,
        client_id: ClientId,
        timestamp: DateTime<Utc>,
    },

    // investor events
    InvestorRegistered {
        investor_id: InvestorId,
        invested: Money,
        daily_rate: Rate,
        timestamp: DateTime<Utc>,
    },
    InvestorSettled {
        investor_id: InvestorId,
        total_returnable: Money,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
