//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: identity and ticket endpoints from the inbound layer
//! - **Schemas**: domain type wrappers ([`ErrorSchema`], [`TicketSchema`],
//!   [`UserSchema`], ...) that provide OpenAPI definitions without coupling
//!   domain types to the utoipa framework
//! - **Security**: session cookie scheme
//!
//! The generated document is served at `/api-docs/openapi.json`.

use crate::inbound::http::identity::{LoginRequest, SessionResponse};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, IssueTypeSchema, PrioritySchema, TicketSchema,
    TicketStatusSchema, UserSchema, WorkspaceSchema,
};
use crate::inbound::http::tickets::{CreateTicketRequest, StatusChangeRequest};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Helpdesk API",
        description = "Self-asserted login, ticket submission, the technician queue and ticket lifecycle.",
        license(name = "MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::identity::login,
        crate::inbound::http::identity::logout,
        crate::inbound::http::identity::current_session,
        crate::inbound::http::tickets::create_ticket,
        crate::inbound::http::tickets::list_queue,
        crate::inbound::http::tickets::list_mine,
        crate::inbound::http::tickets::list_department,
        crate::inbound::http::tickets::change_status,
    ),
    components(schemas(
        UserSchema,
        WorkspaceSchema,
        TicketSchema,
        TicketStatusSchema,
        PrioritySchema,
        IssueTypeSchema,
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        SessionResponse,
        CreateTicketRequest,
        StatusChangeRequest,
    )),
    tags(
        (name = "identity", description = "Login, logout and the current session"),
        (name = "tickets", description = "Ticket submission, listings and status changes")
    )
)]
pub struct ApiDoc;
