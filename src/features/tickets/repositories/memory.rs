//! In-memory ticket store for tests.
//!
//! Mirrors the Postgres store closely enough for the resolver: the partial
//! unique index on open address changes is enforced on insert, and a unit of
//! work stages its writes until `commit`. Failures can be injected per
//! operation and every transaction outcome is recorded.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::tickets::error::TicketError;
use crate::features::tickets::models::{
    NewTicket, Ticket, TicketDetail, TicketStatus, TicketType,
};
use crate::features::tickets::repositories::{TicketStore, TicketUnitOfWork};
use crate::features::users::repositories::memory::InMemoryUserDirectory;

fn poison_err<T>(_: PoisonError<T>) -> AppError {
    AppError::Internal("ticket store lock poisoned".to_string())
}

fn injected(operation: &str) -> AppError {
    AppError::Database(sqlx::Error::Protocol(format!("injected {} failure", operation)))
}

/// How a unit of work ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxOutcome {
    Committed,
    RolledBack,
}

#[derive(Debug, Default)]
struct State {
    tickets: RwLock<Vec<Ticket>>,
    outcomes: Mutex<Vec<TxOutcome>>,
    begun: AtomicUsize,
    writes: AtomicUsize,
    fail_create: AtomicBool,
    fail_resolve: AtomicBool,
}

impl State {
    fn build(&self, ticket: &NewTicket) -> Result<Ticket> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(injected("create"));
        }

        let now = Utc::now();
        Ok(Ticket {
            id: Uuid::now_v7(),
            company_id: ticket.company_id,
            assignee_id: ticket.assignee_id,
            ticket_type: ticket.ticket_type,
            category: ticket.category,
            status: ticket.status,
            created_at: now,
            updated_at: now,
        })
    }

    fn check_unique(&self, tickets: &[Ticket], candidate: &Ticket) -> Result<()> {
        let clash = candidate.ticket_type.policy().unique_while_open
            && candidate.status == TicketStatus::Open
            && tickets.iter().any(|t| {
                t.company_id == candidate.company_id
                    && t.ticket_type == candidate.ticket_type
                    && t.status == TicketStatus::Open
            });

        if clash {
            return Err(AppError::Conflict(
                TicketError::DuplicateTicket(candidate.ticket_type).to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct InMemoryTicketStore {
    state: Arc<State>,
    directory: Arc<InMemoryUserDirectory>,
}

impl InMemoryTicketStore {
    /// `directory` supplies the company and assignee names for `list_all`.
    pub fn new(directory: Arc<InMemoryUserDirectory>) -> Self {
        Self {
            state: Arc::new(State::default()),
            directory,
        }
    }

    /// Makes every subsequent create fail with a database error.
    pub fn fail_creates(&self) {
        self.state.fail_create.store(true, Ordering::SeqCst);
    }

    /// Makes every subsequent bulk resolve fail with a database error.
    pub fn fail_bulk_resolves(&self) {
        self.state.fail_resolve.store(true, Ordering::SeqCst);
    }

    /// Committed tickets in insertion order.
    pub fn snapshot(&self) -> Vec<Ticket> {
        self.state
            .tickets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, id: Uuid) -> Option<Ticket> {
        self.snapshot().into_iter().find(|t| t.id == id)
    }

    /// Attempted writes, committed or not.
    pub fn write_count(&self) -> usize {
        self.state.writes.load(Ordering::SeqCst)
    }

    pub fn begin_count(&self) -> usize {
        self.state.begun.load(Ordering::SeqCst)
    }

    pub fn outcomes(&self) -> Vec<TxOutcome> {
        self.state
            .outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn list_all(&self) -> Result<Vec<TicketDetail>> {
        let tickets = self.state.tickets.read().map_err(poison_err)?;
        let mut details: Vec<TicketDetail> = tickets
            .iter()
            .map(|t| TicketDetail {
                id: t.id,
                company_id: t.company_id,
                company_name: self.directory.company_name(t.company_id).unwrap_or_default(),
                assignee_id: t.assignee_id,
                assignee_name: self.directory.user_name(t.assignee_id).unwrap_or_default(),
                ticket_type: t.ticket_type,
                category: t.category,
                status: t.status,
                created_at: t.created_at,
            })
            .collect();
        details.reverse();
        Ok(details)
    }

    async fn find_open_by_company_and_type(
        &self,
        company_id: Uuid,
        ticket_type: TicketType,
    ) -> Result<Option<Ticket>> {
        let tickets = self.state.tickets.read().map_err(poison_err)?;
        Ok(tickets
            .iter()
            .find(|t| {
                t.company_id == company_id
                    && t.ticket_type == ticket_type
                    && t.status == TicketStatus::Open
            })
            .cloned())
    }

    async fn create(&self, ticket: &NewTicket) -> Result<Ticket> {
        let created = self.state.build(ticket)?;
        let mut tickets = self.state.tickets.write().map_err(poison_err)?;
        self.state.check_unique(&tickets, &created)?;
        tickets.push(created.clone());
        Ok(created)
    }

    async fn begin(&self) -> Result<Box<dyn TicketUnitOfWork>> {
        self.state.begun.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemoryUnitOfWork {
            state: Arc::clone(&self.state),
            created: Vec::new(),
            resolutions: Vec::new(),
        }))
    }
}

/// Staged writes; applied on commit, discarded on rollback or drop
struct InMemoryUnitOfWork {
    state: Arc<State>,
    created: Vec<Ticket>,
    resolutions: Vec<(Uuid, Uuid)>,
}

impl InMemoryUnitOfWork {
    fn record(&self, outcome: TxOutcome) -> Result<()> {
        self.state.outcomes.lock().map_err(poison_err)?.push(outcome);
        Ok(())
    }
}

#[async_trait]
impl TicketUnitOfWork for InMemoryUnitOfWork {
    async fn create(&mut self, ticket: &NewTicket) -> Result<Ticket> {
        let created = self.state.build(ticket)?;
        {
            let tickets = self.state.tickets.read().map_err(poison_err)?;
            self.state.check_unique(&tickets, &created)?;
        }
        self.created.push(created.clone());
        Ok(created)
    }

    async fn resolve_open_except(&mut self, company_id: Uuid, exclude_id: Uuid) -> Result<u64> {
        self.state.writes.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_resolve.load(Ordering::SeqCst) {
            return Err(injected("bulk resolve"));
        }

        let affected = |t: &Ticket| {
            t.company_id == company_id && t.status == TicketStatus::Open && t.id != exclude_id
        };

        let committed = self
            .state
            .tickets
            .read()
            .map_err(poison_err)?
            .iter()
            .filter(|t| affected(t))
            .count();

        let mut staged = 0;
        for ticket in self.created.iter_mut().filter(|t| affected(t)) {
            ticket.status = TicketStatus::Resolved;
            staged += 1;
        }

        self.resolutions.push((company_id, exclude_id));
        Ok((committed + staged) as u64)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        {
            let mut tickets = self.state.tickets.write().map_err(poison_err)?;
            let now = Utc::now();
            for (company_id, exclude_id) in &self.resolutions {
                for ticket in tickets.iter_mut().filter(|t| {
                    t.company_id == *company_id
                        && t.status == TicketStatus::Open
                        && t.id != *exclude_id
                }) {
                    ticket.status = TicketStatus::Resolved;
                    ticket.updated_at = now;
                }
            }
            tickets.extend(self.created.iter().cloned());
        }
        self.record(TxOutcome::Committed)
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.record(TxOutcome::RolledBack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;

    fn store() -> (InMemoryTicketStore, Uuid, Uuid) {
        let directory = Arc::new(InMemoryUserDirectory::new());
        let company = directory.add_company("Acme");
        let user = directory.add_user(company, "Dana", UserRole::Director);
        (InMemoryTicketStore::new(directory), company, user.id)
    }

    #[tokio::test]
    async fn test_dropped_unit_of_work_leaves_no_trace() {
        let (store, company, user) = store();
        {
            let mut uow = store.begin().await.unwrap();
            uow.create(&NewTicket::open(company, user, TicketType::StrikeOff))
                .await
                .unwrap();
        }

        assert!(store.snapshot().is_empty());
        assert!(store.outcomes().is_empty());
    }

    #[tokio::test]
    async fn test_open_address_change_is_unique_per_company() {
        let (store, company, user) = store();
        let ticket = NewTicket::open(company, user, TicketType::RegistrationAddressChange);
        store.create(&ticket).await.unwrap();

        let err = store.create(&ticket).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_list_all_joins_names_newest_first() {
        let (store, company, user) = store();
        let first = store
            .create(&NewTicket::open(company, user, TicketType::ManagementReport))
            .await
            .unwrap();
        let second = store
            .create(&NewTicket::open(company, user, TicketType::StrikeOff))
            .await
            .unwrap();

        let listed = store.list_all().await.unwrap();
        assert_eq!(
            listed.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );
        assert_eq!(listed[0].company_name, "Acme");
        assert_eq!(listed[0].assignee_name, "Dana");
    }
}
