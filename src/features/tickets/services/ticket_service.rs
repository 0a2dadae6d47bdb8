use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::Result;
use crate::features::tickets::error::TicketError;
use crate::features::tickets::models::{NewTicket, Ticket, TicketDetail, TicketPolicy, TicketType};
use crate::features::tickets::repositories::{TicketStore, TicketUnitOfWork};
use crate::features::users::models::{User, UserRole};
use crate::features::users::repositories::UserDirectory;

/// Decides who owns a new ticket and persists it.
///
/// Stateless: every call reads the current users and tickets of the company
/// through the two collaborators and either writes exactly one ticket or
/// nothing at all.
pub struct TicketService {
    tickets: Arc<dyn TicketStore>,
    users: Arc<dyn UserDirectory>,
}

impl TicketService {
    pub fn new(tickets: Arc<dyn TicketStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self { tickets, users }
    }

    /// List every ticket with company and assignee names
    pub async fn list_all(&self) -> Result<Vec<TicketDetail>> {
        self.tickets.list_all().await
    }

    /// Create a ticket of `ticket_type` for `company_id`.
    ///
    /// Rejections happen before any write. For `strikeOff` the new ticket and
    /// the resolution of the company's other open tickets commit together or
    /// not at all.
    pub async fn create(
        &self,
        ticket_type: &str,
        company_id: Uuid,
    ) -> std::result::Result<Ticket, TicketError> {
        let ticket_type: TicketType = ticket_type.parse()?;
        let policy = ticket_type.policy();

        if policy.unique_while_open {
            let existing = self
                .tickets
                .find_open_by_company_and_type(company_id, ticket_type)
                .await?;
            if let Some(existing) = existing {
                tracing::warn!(
                    "Duplicate ticket rejected: company={}, type={}, existing={}",
                    company_id,
                    ticket_type,
                    existing.id
                );
                return Err(TicketError::DuplicateTicket(ticket_type));
            }
        }

        let (category, required_role) = ticket_type.mapping();
        let (role, candidates) = self
            .find_candidates(company_id, required_role, &policy)
            .await?;
        let assignee = select_assignee(&policy, role, candidates).inspect_err(|e| {
            tracing::warn!(
                "Ticket rejected: company={}, type={}, reason={}",
                company_id,
                ticket_type,
                e
            );
        })?;

        let new_ticket = NewTicket {
            category,
            ..NewTicket::open(company_id, assignee.id, ticket_type)
        };

        let ticket = if policy.resolves_company_tickets {
            self.create_resolving_others(&new_ticket).await?
        } else {
            self.tickets.create(&new_ticket).await?
        };

        tracing::info!(
            "Ticket created: id={}, company={}, type={}, assignee={} ({})",
            ticket.id,
            ticket.company_id,
            ticket.ticket_type,
            ticket.assignee_id,
            role
        );

        Ok(ticket)
    }

    /// Candidates for the required role, or for the fallback role when nobody
    /// holds the required one. Returns the role the candidates belong to.
    async fn find_candidates(
        &self,
        company_id: Uuid,
        required_role: UserRole,
        policy: &TicketPolicy,
    ) -> Result<(UserRole, Vec<User>)> {
        let candidates = self
            .users
            .find_by_company_and_role(company_id, required_role)
            .await?;

        match policy.fallback_role {
            Some(fallback) if candidates.is_empty() => {
                tracing::debug!(
                    "No {} in company {}, falling back to {}",
                    required_role,
                    company_id,
                    fallback
                );
                let candidates = self
                    .users
                    .find_by_company_and_role(company_id, fallback)
                    .await?;
                Ok((fallback, candidates))
            }
            _ => Ok((required_role, candidates)),
        }
    }

    async fn create_resolving_others(&self, new_ticket: &NewTicket) -> Result<Ticket> {
        let mut uow = self.tickets.begin().await?;

        match create_and_resolve(uow.as_mut(), new_ticket).await {
            Ok((ticket, resolved)) => {
                uow.commit().await?;
                tracing::info!(
                    "Resolved {} open tickets of company {} after ticket {}",
                    resolved,
                    ticket.company_id,
                    ticket.id
                );
                Ok(ticket)
            }
            Err(e) => {
                if let Err(rollback_err) = uow.rollback().await {
                    tracing::error!("Failed to roll back ticket creation: {:?}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

async fn create_and_resolve(
    uow: &mut dyn TicketUnitOfWork,
    new_ticket: &NewTicket,
) -> Result<(Ticket, u64)> {
    let ticket = uow.create(new_ticket).await?;
    let resolved = uow
        .resolve_open_except(ticket.company_id, ticket.id)
        .await?;
    Ok((ticket, resolved))
}

/// Applies the empty and multiplicity gates; candidates are newest first.
fn select_assignee(
    policy: &TicketPolicy,
    role: UserRole,
    candidates: Vec<User>,
) -> std::result::Result<User, TicketError> {
    let count = candidates.len();
    let assignee = candidates
        .into_iter()
        .next()
        .ok_or(TicketError::NoEligibleAssignee(role))?;

    if count > 1 && !policy.allows_multiple_assignees {
        return Err(TicketError::AmbiguousAssignee(role));
    }

    Ok(assignee)
}
