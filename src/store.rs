use std::collections::HashMap;

use crate::client::Client;
use crate::errors::{LedgerError, Result};
use crate::investor::Investor;
use crate::loans::Loan;
use crate::types::{ClientId, InvestorId, LoanId};

/// persistence boundary for raw ledger records
///
/// Implementations persist inputs only (amounts, dates, states); derived
/// figures are recomputed by the ledger on every read.
pub trait LedgerStore {
    fn loans(&self) -> Result<Vec<Loan>>;
    fn loan(&self, id: LoanId) -> Result<Loan>;
    fn insert_loan(&mut self, loan: Loan) -> Result<()>;
    fn update_loan(&mut self, loan: Loan) -> Result<()>;

    /// persist both sides of a renewal as one unit
    fn commit_renewal(&mut self, closed: Loan, successor: Loan) -> Result<()>;

    fn investors(&self) -> Result<Vec<Investor>>;
    fn investor(&self, id: InvestorId) -> Result<Investor>;
    fn insert_investor(&mut self, investor: Investor) -> Result<()>;
    fn update_investor(&mut self, investor: Investor) -> Result<()>;

    fn clients(&self) -> Result<Vec<Client>>;
    fn client(&self, id: ClientId) -> Result<Client>;
    fn insert_client(&mut self, client: Client) -> Result<()>;
}

/// in-memory store, used by tests and demos
///
/// Records keep insertion order. The store can be taken offline to exercise
/// the unreachable-store path.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    loans: Vec<Loan>,
    loan_index: HashMap<LoanId, usize>,
    investors: Vec<Investor>,
    investor_index: HashMap<InvestorId, usize>,
    clients: Vec<Client>,
    client_index: HashMap<ClientId, usize>,
    offline: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// simulate losing (or regaining) the connection to the store
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline {
            Err(LedgerError::StoreUnavailable {
                message: "in-memory store is offline".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl LedgerStore for InMemoryStore {
    fn loans(&self) -> Result<Vec<Loan>> {
        self.ensure_online()?;
        Ok(self.loans.clone())
    }

    fn loan(&self, id: LoanId) -> Result<Loan> {
        self.ensure_online()?;
        self.loan_index
            .get(&id)
            .map(|&i| self.loans[i].clone())
            .ok_or(LedgerError::LoanNotFound { id })
    }

    fn insert_loan(&mut self, loan: Loan) -> Result<()> {
        self.ensure_online()?;
        if self.loan_index.contains_key(&loan.id) {
            return Err(LedgerError::DuplicateRecord { id: loan.id });
        }
        self.loan_index.insert(loan.id, self.loans.len());
        self.loans.push(loan);
        Ok(())
    }

    fn update_loan(&mut self, loan: Loan) -> Result<()> {
        self.ensure_online()?;
        let i = *self
            .loan_index
            .get(&loan.id)
            .ok_or(LedgerError::LoanNotFound { id: loan.id })?;
        self.loans[i] = loan;
        Ok(())
    }

    fn commit_renewal(&mut self, closed: Loan, successor: Loan) -> Result<()> {
        self.ensure_online()?;
        if !self.loan_index.contains_key(&closed.id) {
            return Err(LedgerError::LoanNotFound { id: closed.id });
        }
        if self.loan_index.contains_key(&successor.id) {
            return Err(LedgerError::DuplicateRecord { id: successor.id });
        }
        self.update_loan(closed)?;
        self.insert_loan(successor)
    }

    fn investors(&self) -> Result<Vec<Investor>> {
        self.ensure_online()?;
        Ok(self.investors.clone())
    }

    fn investor(&self, id: InvestorId) -> Result<Investor> {
        self.ensure_online()?;
        self.investor_index
            .get(&id)
            .map(|&i| self.investors[i].clone())
            .ok_or(LedgerError::InvestorNotFound { id })
    }

    fn insert_investor(&mut self, investor: Investor) -> Result<()> {
        self.ensure_online()?;
        if self.investor_index.contains_key(&investor.id) {
            return Err(LedgerError::DuplicateRecord { id: investor.id });
        }
        self.investor_index.insert(investor.id, self.investors.len());
        self.investors.push(investor);
        Ok(())
    }

    fn update_investor(&mut self, investor: Investor) -> Result<()> {
        self.ensure_online()?;
        let i = *self
            .investor_index
            .get(&investor.id)
            .ok_or(LedgerError::InvestorNotFound { id: investor.id })?;
        self.investors[i] = investor;
        Ok(())
    }

    fn clients(&self) -> Result<Vec<Client>> {
        self.ensure_online()?;
        Ok(self.clients.clone())
    }

    fn client(&self, id: ClientId) -> Result<Client> {
        self.ensure_online()?;
        self.client_index
            .get(&id)
            .map(|&i| self.clients[i].clone())
            .ok_or(LedgerError::ClientNotFound { id })
    }

    fn insert_client(&mut self, client: Client) -> Result<()> {
        self.ensure_online()?;
        if self.client_index.contains_key(&client.id) {
            return Err(LedgerError::DuplicateRecord { id: client.id });
        }
        self.client_index.insert(client.id, self.clients.len());
        self.clients.push(client);
        Ok(())
    }
}
