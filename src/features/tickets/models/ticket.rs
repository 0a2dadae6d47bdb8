use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::tickets::error::TicketError;

/// Kind of work item; decides category, owner role and side effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "ticket_type", rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum TicketType {
    ManagementReport,
    RegistrationAddressChange,
    StrikeOff,
}

impl TicketType {
    pub const ALL: [TicketType; 3] = [
        TicketType::ManagementReport,
        TicketType::RegistrationAddressChange,
        TicketType::StrikeOff,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::ManagementReport => "managementReport",
            TicketType::RegistrationAddressChange => "registrationAddressChange",
            TicketType::StrikeOff => "strikeOff",
        }
    }
}

impl std::fmt::Display for TicketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketType {
    type Err = TicketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| TicketError::UnsupportedTicketType(s.to_string()))
    }
}

/// Ticket category, derived from the ticket type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "ticket_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TicketCategory {
    Accounting,
    Corporate,
    Management,
}

/// Ticket status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "ticket_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Open,
    Resolved,
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketStatus::Open => write!(f, "open"),
            TicketStatus::Resolved => write!(f, "resolved"),
        }
    }
}

/// Database model for ticket
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct Ticket {
    pub id: Uuid,
    pub company_id: Uuid,
    pub assignee_id: Uuid,
    #[sqlx(rename = "type")]
    pub ticket_type: TicketType,
    pub category: TicketCategory,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ticket joined with its company and assignee names
#[derive(Debug, Clone, FromRow)]
pub struct TicketDetail {
    pub id: Uuid,
    pub company_id: Uuid,
    pub company_name: String,
    pub assignee_id: Uuid,
    pub assignee_name: String,
    #[sqlx(rename = "type")]
    pub ticket_type: TicketType,
    pub category: TicketCategory,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a ticket; id and timestamps come from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub company_id: Uuid,
    pub assignee_id: Uuid,
    pub ticket_type: TicketType,
    pub category: TicketCategory,
    pub status: TicketStatus,
}

impl NewTicket {
    pub fn open(company_id: Uuid, assignee_id: Uuid, ticket_type: TicketType) -> Self {
        Self {
            company_id,
            assignee_id,
            ticket_type,
            category: ticket_type.policy().category,
            status: TicketStatus::Open,
        }
    }
}
