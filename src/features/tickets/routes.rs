use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::tickets::handlers;
use crate::features::tickets::services::TicketService;

/// Create routes for the tickets feature
pub fn routes(service: Arc<TicketService>) -> Router {
    Router::new()
        .route(
            "/api/v1/tickets",
            get(handlers::list_tickets).post(handlers::create_ticket),
        )
        .with_state(service)
}
