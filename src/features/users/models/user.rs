use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Function a user holds within a company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum UserRole {
    Accountant,
    CorporateSecretary,
    Director,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Accountant => write!(f, "accountant"),
            UserRole::CorporateSecretary => write!(f, "corporateSecretary"),
            UserRole::Director => write!(f, "director"),
        }
    }
}

/// Database model for user
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct User {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}
