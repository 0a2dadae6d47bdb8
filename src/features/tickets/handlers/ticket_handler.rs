use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::tickets::dtos::{CreateTicketDto, TicketDetailDto, TicketResponseDto};
use crate::features::tickets::services::TicketService;
use crate::shared::types::{ApiResponse, Meta};

/// List all tickets
#[utoipa::path(
    get,
    path = "/api/v1/tickets",
    responses(
        (status = 200, description = "All tickets with company and assignee names", body = ApiResponse<Vec<TicketDetailDto>>),
    ),
    tag = "tickets"
)]
pub async fn list_tickets(
    State(service): State<Arc<TicketService>>,
) -> Result<Json<ApiResponse<Vec<TicketDetailDto>>>> {
    let tickets: Vec<TicketDetailDto> = service
        .list_all()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = tickets.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(tickets),
        None,
        Some(Meta { total }),
    )))
}

/// Create a ticket
///
/// The assignee is picked from the company's users by the role the ticket
/// type requires. A `strikeOff` ticket also resolves all other open tickets
/// of the company.
#[utoipa::path(
    post,
    path = "/api/v1/tickets",
    request_body = CreateTicketDto,
    responses(
        (status = 201, description = "Ticket created", body = ApiResponse<TicketResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Unsupported type, duplicate ticket, or no single eligible assignee")
    ),
    tag = "tickets"
)]
pub async fn create_ticket(
    State(service): State<Arc<TicketService>>,
    AppJson(dto): AppJson<CreateTicketDto>,
) -> Result<(StatusCode, Json<ApiResponse<TicketResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let ticket = service.create(&dto.ticket_type, dto.company_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(ticket.into()),
            Some("Ticket created".to_string()),
            None,
        )),
    ))
}
