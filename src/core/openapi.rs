use utoipa::{Modify, OpenApi};

use crate::features::tickets::{
    dtos as tickets_dtos, handlers as tickets_handlers, models as tickets_models,
};
use crate::features::users::models as users_models;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        tickets_handlers::list_tickets,
        tickets_handlers::create_ticket,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Users
            users_models::UserRole,
            // Tickets
            tickets_models::TicketType,
            tickets_models::TicketCategory,
            tickets_models::TicketStatus,
            tickets_dtos::CreateTicketDto,
            tickets_dtos::TicketResponseDto,
            tickets_dtos::TicketDetailDto,
            ApiResponse<tickets_dtos::TicketResponseDto>,
            ApiResponse<Vec<tickets_dtos::TicketDetailDto>>,
        )
    ),
    tags(
        (name = "tickets", description = "Company tickets assigned by role"),
    ),
    info(
        title = "Ticket Assignment API",
        version = "0.1.0",
        description = "Role-based ticket assignment for companies",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
