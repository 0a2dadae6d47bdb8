use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::tickets::models::{
    Ticket, TicketCategory, TicketDetail, TicketStatus, TicketType,
};

/// Request DTO for creating a ticket
///
/// `type` stays a plain string so unknown types reach the service and are
/// reported as unsupported instead of failing JSON decoding.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketDto {
    /// One of `managementReport`, `registrationAddressChange`, `strikeOff`
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 64, message = "Type must be 1-64 characters"))]
    pub ticket_type: String,

    pub company_id: Uuid,
}

/// Response DTO for ticket
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponseDto {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    pub company_id: Uuid,
    pub assignee_id: Uuid,
    pub status: TicketStatus,
    pub category: TicketCategory,
}

impl From<Ticket> for TicketResponseDto {
    fn from(t: Ticket) -> Self {
        Self {
            id: t.id,
            ticket_type: t.ticket_type,
            company_id: t.company_id,
            assignee_id: t.assignee_id,
            status: t.status,
            category: t.category,
        }
    }
}

/// Ticket listing entry with company and assignee names
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketDetailDto {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    pub company_id: Uuid,
    pub company_name: String,
    pub assignee_id: Uuid,
    pub assignee_name: String,
    pub status: TicketStatus,
    pub category: TicketCategory,
    pub created_at: DateTime<Utc>,
}

impl From<TicketDetail> for TicketDetailDto {
    fn from(t: TicketDetail) -> Self {
        Self {
            id: t.id,
            ticket_type: t.ticket_type,
            company_id: t.company_id,
            company_name: t.company_name,
            assignee_id: t.assignee_id,
            assignee_name: t.assignee_name,
            status: t.status,
            category: t.category,
            created_at: t.created_at,
        }
    }
}
