use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::{normalize_national_id, Client, ClientDetails};
use crate::config::LedgerConfig;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::interest::{InterestEngine, PenaltyEngine, Pricing};
use crate::investor::{Investor, InvestorRequest, InvestorSummary, InvestorView};
use crate::loans::renewal::{self, RenewalOutcome, RenewalRequest};
use crate::loans::{Loan, LoanFilter, LoanView};
use crate::store::LedgerStore;
use crate::summary::{available_periods, PeriodSummary};
use crate::types::{ClientId, InvestorId, LoanId, Period, PeriodFilter};

/// terms for a new loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub client_id: ClientId,
    pub principal: Money,
    pub term_days: u32,
    pub pricing: Pricing,
    /// defaults to today
    pub issued_on: Option<NaiveDate>,
}

/// loan book service over an external store
///
/// Every read reloads raw records from the store and recomputes derived
/// figures for the current day of `time_provider`.
pub struct Ledger<S: LedgerStore> {
    config: LedgerConfig,
    interest: InterestEngine,
    penalties: PenaltyEngine,
    store: S,
    pub events: EventStore,
}

impl<S: LedgerStore> Ledger<S> {
    /// create a ledger, validating the configuration
    pub fn new(config: LedgerConfig, store: S) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            interest: config.interest_engine(),
            penalties: PenaltyEngine::new(),
            config,
            store,
            events: EventStore::new(),
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    // clients

    /// register a borrower; national ids are unique
    pub fn register_client(
        &mut self,
        details: ClientDetails,
        time_provider: &SafeTimeProvider,
    ) -> Result<Client> {
        let national_id = normalize_national_id(&details.national_id);
        if national_id.is_empty() {
            return Err(LedgerError::InvalidClient {
                message: "national id is empty".to_string(),
            });
        }
        if self
            .store
            .clients()?
            .iter()
            .any(|c| c.national_id == national_id)
        {
            return Err(LedgerError::DuplicateClient { national_id });
        }

        let client = Client::new(Uuid::new_v4(), details);
        self.store.insert_client(client.clone())?;

        info!("registered client {}", client.id);
        self.events.emit(Event::ClientRegistered {
            client_id: client.id,
            timestamp: time_provider.now(),
        });

        Ok(client)
    }

    pub fn clients(&self) -> Result<Vec<Client>> {
        self.store.clients()
    }

    pub fn client(&self, id: ClientId) -> Result<Client> {
        self.store.client(id)
    }

    // loans

    /// every loan with derived figures recomputed for today
    pub fn loans(&self, time_provider: &SafeTimeProvider) -> Result<Vec<LoanView>> {
        let today = time_provider.now().date_naive();
        let loans = self.store.loans().inspect_err(log_store_error)?;
        debug!("recomputing {} loans as of {}", loans.len(), today);

        Ok(loans
            .iter()
            .map(|loan| LoanView::from_loan(loan, &self.penalties, today))
            .collect())
    }

    /// loans matching a table filter
    pub fn loans_filtered(
        &self,
        filter: LoanFilter,
        time_provider: &SafeTimeProvider,
    ) -> Result<Vec<LoanView>> {
        Ok(filter.apply(self.loans(time_provider)?))
    }

    /// a client's loans, oldest first
    pub fn loans_for_client(
        &self,
        client_id: ClientId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Vec<LoanView>> {
        self.store.client(client_id)?;
        Ok(self
            .loans(time_provider)?
            .into_iter()
            .filter(|view| view.client_id == client_id)
            .collect())
    }

    pub fn loan(&self, id: LoanId, time_provider: &SafeTimeProvider) -> Result<LoanView> {
        let loan = self.store.loan(id)?;
        Ok(LoanView::from_loan(
            &loan,
            &self.penalties,
            time_provider.now().date_naive(),
        ))
    }

    /// issue a new pending loan to an existing client
    pub fn originate_loan(
        &mut self,
        request: LoanRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        let now = time_provider.now();
        let issued_on = request.issued_on.unwrap_or_else(|| now.date_naive());

        let quote = self
            .interest
            .quote(request.principal, request.term_days, request.pricing, issued_on)?;
        self.store.client(request.client_id)?;
        if self
            .store
            .loans()?
            .iter()
            .any(|loan| loan.client_id == request.client_id && loan.is_blocked())
        {
            warn!("client {} has a blocked loan, origination refused", request.client_id);
            return Err(LedgerError::ClientBlocked {
                client_id: request.client_id,
            });
        }

        let loan = Loan::originate(
            Uuid::new_v4(),
            request.client_id,
            &quote,
            self.config.penalty.daily_rate,
        );
        self.store.insert_loan(loan.clone()).inspect_err(log_store_error)?;

        info!(
            "originated loan {}: {} at {} for {} days, due {}",
            loan.id, loan.principal, loan.interest_rate, loan.term_days, loan.due_on
        );
        self.events.emit(Event::LoanOriginated {
            loan_id: loan.id,
            client_id: loan.client_id,
            principal: loan.principal,
            total_owed: loan.total_owed,
            rate: loan.interest_rate,
            due_on: loan.due_on,
            timestamp: now,
        });

        Ok(loan)
    }

    /// mark a pending loan paid, freezing the collected amount
    pub fn settle_loan(
        &mut self,
        id: LoanId,
        collected: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        let now = time_provider.now();
        let today = now.date_naive();

        let mut loan = self.store.loan(id)?;
        let days_overdue = loan.assess(&self.penalties, today).days_overdue;
        loan.settle(collected, today)?;
        self.store.update_loan(loan.clone()).inspect_err(log_store_error)?;

        info!("settled loan {} for {} ({} days overdue)", id, collected, days_overdue);
        self.events.emit(Event::LoanSettled {
            loan_id: id,
            collected,
            days_overdue,
            timestamp: now,
        });

        Ok(loan)
    }

    /// freeze a pending loan: penalties stop and its client cannot borrow again
    pub fn block_loan(&mut self, id: LoanId, time_provider: &SafeTimeProvider) -> Result<Loan> {
        let now = time_provider.now();
        let mut loan = self.store.loan(id)?;
        if loan.is_blocked() {
            return Ok(loan);
        }

        loan.block(now.date_naive())?;
        self.store.update_loan(loan.clone()).inspect_err(log_store_error)?;

        info!("blocked loan {} of client {}", id, loan.client_id);
        self.events.emit(Event::LoanBlocked {
            loan_id: id,
            client_id: loan.client_id,
            timestamp: now,
        });

        Ok(loan)
    }

    /// lend more on a pending loan at its agreed rate
    pub fn add_principal(
        &mut self,
        id: LoanId,
        extra: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        let mut loan = self.store.loan(id)?;
        loan.add_principal(extra)?;
        self.store.update_loan(loan.clone()).inspect_err(log_store_error)?;

        info!("added {} to loan {}, now owes {}", extra, id, loan.total_owed);
        self.events.emit(Event::PrincipalAdded {
            loan_id: id,
            amount: extra,
            new_principal: loan.principal,
            new_total_owed: loan.total_owed,
            timestamp: time_provider.now(),
        });

        Ok(loan)
    }

    /// close a pending loan as renewed and open its successor
    pub fn renew_loan(
        &mut self,
        id: LoanId,
        request: RenewalRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<RenewalOutcome> {
        let now = time_provider.now();
        let source = self.store.loan(id)?;

        let outcome = renewal::renew(
            &source,
            &request,
            Uuid::new_v4(),
            &self.interest,
            &self.penalties,
            self.config.penalty.daily_rate,
            now.date_naive(),
        )
        .inspect_err(|e| warn!("renewal of loan {} rejected: {}", id, e))?;

        self.store
            .commit_renewal(outcome.closed.clone(), outcome.successor.clone())
            .inspect_err(log_store_error)?;

        info!(
            "renewed loan {} into {} for {} (receivable was {})",
            id, outcome.successor.id, request.amount, outcome.receivable
        );
        self.events.emit(Event::LoanRenewed {
            loan_id: id,
            successor_id: outcome.successor.id,
            interest_collected: source.interest(),
            renewed_amount: request.amount,
            timestamp: now,
        });

        Ok(outcome)
    }

    /// dashboard totals for a period, or the whole book
    pub fn summary(
        &self,
        filter: PeriodFilter,
        time_provider: &SafeTimeProvider,
    ) -> Result<PeriodSummary> {
        let loans = self.store.loans().inspect_err(log_store_error)?;
        Ok(PeriodSummary::aggregate(
            &loans,
            filter,
            &self.penalties,
            time_provider.now().date_naive(),
        ))
    }

    /// origination periods present in the book, newest first
    pub fn periods(&self) -> Result<Vec<Period>> {
        Ok(available_periods(&self.store.loans()?))
    }

    // investors

    pub fn investors(&self) -> Result<Vec<InvestorView>> {
        Ok(self
            .store
            .investors()
            .inspect_err(log_store_error)?
            .iter()
            .map(InvestorView::from_investor)
            .collect())
    }

    pub fn investor_summary(&self) -> Result<InvestorSummary> {
        Ok(InvestorSummary::from_investors(&self.store.investors()?))
    }

    pub fn register_investor(
        &mut self,
        request: InvestorRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<Investor> {
        let investor = Investor::open(Uuid::new_v4(), request)?;
        self.store
            .insert_investor(investor.clone())
            .inspect_err(log_store_error)?;

        info!(
            "registered investor {}: {} at {} per day",
            investor.id, investor.invested, investor.daily_rate
        );
        self.events.emit(Event::InvestorRegistered {
            investor_id: investor.id,
            invested: investor.invested,
            daily_rate: investor.daily_rate,
            timestamp: time_provider.now(),
        });

        Ok(investor)
    }

    /// active -> settled; returns stay computed over the recorded range
    pub fn settle_investor(
        &mut self,
        id: InvestorId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Investor> {
        let now = time_provider.now();
        let mut investor = self.store.investor(id)?;
        investor.settle(now)?;
        self.store
            .update_investor(investor.clone())
            .inspect_err(log_store_error)?;

        let returns = investor.returns();
        info!("settled investor {}, returning {}", id, returns.total_returnable);
        self.events.emit(Event::InvestorSettled {
            investor_id: id,
            total_returnable: returns.total_returnable,
            timestamp: now,
        });

        Ok(investor)
    }

    /// drain emitted events
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}

fn log_store_error(err: &LedgerError) {
    if let LedgerError::StoreUnavailable { message } = err {
        warn!("store unavailable: {}", message);
    }
}
