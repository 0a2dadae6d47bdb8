//! Persistence seam for tickets.
//!
//! The resolver only talks to [`TicketStore`]. Multi-write operations go
//! through a [`TicketUnitOfWork`] obtained from [`TicketStore::begin`]; a unit
//! of work that is dropped without `commit` leaves no trace.

#[cfg(test)]
pub mod memory;
mod pg_ticket_store;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::tickets::models::{NewTicket, Ticket, TicketDetail, TicketType};

pub use pg_ticket_store::PgTicketStore;

#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Every ticket with its company and assignee names, newest first.
    async fn list_all(&self) -> Result<Vec<TicketDetail>>;

    async fn find_open_by_company_and_type(
        &self,
        company_id: Uuid,
        ticket_type: TicketType,
    ) -> Result<Option<Ticket>>;

    /// Single insert outside of any transaction.
    async fn create(&self, ticket: &NewTicket) -> Result<Ticket>;

    async fn begin(&self) -> Result<Box<dyn TicketUnitOfWork>>;
}

/// Transaction handle grouping several ticket writes.
#[async_trait]
pub trait TicketUnitOfWork: Send {
    async fn create(&mut self, ticket: &NewTicket) -> Result<Ticket>;

    /// Resolves every open ticket of the company except `exclude_id`.
    /// Returns the number of tickets updated.
    async fn resolve_open_except(&mut self, company_id: Uuid, exclude_id: Uuid) -> Result<u64>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}
