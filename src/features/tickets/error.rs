use thiserror::Error;

use crate::core::error::AppError;
use crate::features::tickets::models::TicketType;
use crate::features::users::models::UserRole;

/// Reasons a ticket cannot be created.
///
/// Everything except [`TicketError::Store`] is a conflict with current company
/// state that the caller has to fix before retrying. Store failures are passed
/// through untouched so infrastructure problems stay distinguishable.
#[derive(Debug, Error)]
pub enum TicketError {
    #[error("Ticket with this type {0} is not supported")]
    UnsupportedTicketType(String),

    #[error("Duplicate type {0}, ticket already exists")]
    DuplicateTicket(TicketType),

    #[error("Cannot find user with role {0} to create a ticket")]
    NoEligibleAssignee(UserRole),

    #[error("Multiple users with role {0}. Cannot create a ticket")]
    AmbiguousAssignee(UserRole),

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<TicketError> for AppError {
    fn from(e: TicketError) -> Self {
        match e {
            TicketError::Store(inner) => inner,
            conflict => AppError::Conflict(conflict.to_string()),
        }
    }
}
