use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::tickets::error::TicketError;
use crate::features::tickets::models::{
    NewTicket, Ticket, TicketDetail, TicketStatus, TicketType,
};
use crate::features::tickets::repositories::{TicketStore, TicketUnitOfWork};

/// Postgres-backed ticket store
pub struct PgTicketStore {
    pool: PgPool,
}

impl PgTicketStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_ticket(conn: &mut PgConnection, ticket: &NewTicket) -> Result<Ticket> {
    sqlx::query_as::<_, Ticket>(
        r#"
        INSERT INTO tickets (company_id, assignee_id, type, category, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, company_id, assignee_id, type, category, status, created_at, updated_at
        "#,
    )
        .bind(ticket.company_id)
        .bind(ticket.assignee_id)
        .bind(ticket.ticket_type)
        .bind(ticket.category)
        .bind(ticket.status)
        .fetch_one(conn)
        .await
        .map_err(|e| match e {
            // uq_tickets_open_registration_address_change lost a concurrent race
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                tracing::warn!(
                    "Concurrent duplicate ticket rejected: company={}, type={}",
                    ticket.company_id,
                    ticket.ticket_type
                );
                AppError::Conflict(TicketError::DuplicateTicket(ticket.ticket_type).to_string())
            }
            e => {
                tracing::error!("Failed to create ticket: {:?}", e);
                AppError::Database(e)
            }
        })
}

#[async_trait]
impl TicketStore for PgTicketStore {
    async fn list_all(&self) -> Result<Vec<TicketDetail>> {
        sqlx::query_as::<_, TicketDetail>(
            r#"
            SELECT
                t.id, t.company_id, c.name AS company_name,
                t.assignee_id, u.name AS assignee_name,
                t.type, t.category, t.status, t.created_at
            FROM tickets t
            JOIN companies c ON c.id = t.company_id
            JOIN users u ON u.id = t.assignee_id
            ORDER BY t.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list tickets: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find_open_by_company_and_type(
        &self,
        company_id: Uuid,
        ticket_type: TicketType,
    ) -> Result<Option<Ticket>> {
        sqlx::query_as::<_, Ticket>(
            r#"
            SELECT id, company_id, assignee_id, type, category, status, created_at, updated_at
            FROM tickets
            WHERE company_id = $1 AND type = $2 AND status = $3
            LIMIT 1
            "#,
        )
            .bind(company_id)
            .bind(ticket_type)
            .bind(TicketStatus::Open)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find open ticket: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn create(&self, ticket: &NewTicket) -> Result<Ticket> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            tracing::error!("Failed to acquire connection: {:?}", e);
            AppError::Database(e)
        })?;
        insert_ticket(&mut conn, ticket).await
    }

    async fn begin(&self) -> Result<Box<dyn TicketUnitOfWork>> {
        let tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(Box::new(PgTicketUnitOfWork { tx }))
    }
}

/// Wraps an sqlx transaction; dropping it uncommitted rolls back
pub struct PgTicketUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl TicketUnitOfWork for PgTicketUnitOfWork {
    async fn create(&mut self, ticket: &NewTicket) -> Result<Ticket> {
        insert_ticket(&mut *self.tx, ticket).await
    }

    async fn resolve_open_except(&mut self, company_id: Uuid, exclude_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE tickets
            SET status = $1, updated_at = NOW()
            WHERE company_id = $2 AND status = $3 AND id <> $4
            "#,
        )
        .bind(TicketStatus::Resolved)
        .bind(company_id)
        .bind(TicketStatus::Open)
        .bind(exclude_id)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to resolve company tickets: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit transaction: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(|e| {
            tracing::error!("Failed to roll back transaction: {:?}", e);
            AppError::Database(e)
        })
    }
}
