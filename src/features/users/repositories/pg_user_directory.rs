use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::users::models::{User, UserRole};
use crate::features::users::repositories::UserDirectory;

/// Postgres-backed user directory
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_company_and_role(
        &self,
        company_id: Uuid,
        role: UserRole,
    ) -> Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, company_id, name, role, created_at
            FROM users
            WHERE company_id = $1 AND role = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(company_id)
        .bind(role)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to find users by company and role: {:?}", e);
            AppError::Database(e)
        })
    }
}
