//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the serialised shape of their corresponding
//! domain types but live in the inbound adapter layer where framework
//! concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested status change is not a legal lifecycle edge.
    #[schema(rename = "invalid_transition")]
    InvalidTransition,
    /// No user is logged in.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The same action is already being processed.
    #[schema(rename = "conflict")]
    Conflict,
    /// The document store is unreachable or timed out.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "description is required")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "5b0f6e1c-8f0e-4a53-9d6c-2f8f6d2a1b3c")]
    trace_id: Option<String>,
    /// Supplementary error details such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    /// Store-assigned user identifier.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    /// Self-asserted name, kept verbatim.
    #[schema(example = "Ana Souza")]
    name: String,
    /// Self-asserted department, kept verbatim.
    #[schema(example = "Vendas")]
    department: String,
}

/// OpenAPI schema for [`crate::domain::Workspace`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Workspace)]
pub enum WorkspaceSchema {
    /// Ticket queue with status and priority filters.
    #[schema(rename = "technician")]
    Technician,
    /// Ticket form plus own and department listings.
    #[schema(rename = "requester")]
    Requester,
}

/// OpenAPI schema for [`crate::domain::TicketStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::TicketStatus)]
pub enum TicketStatusSchema {
    #[schema(rename = "open")]
    Open,
    #[schema(rename = "in_progress")]
    InProgress,
    #[schema(rename = "closed")]
    Closed,
}

/// OpenAPI schema for [`crate::domain::Priority`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Priority)]
pub enum PrioritySchema {
    #[schema(rename = "high")]
    High,
    #[schema(rename = "medium")]
    Medium,
    #[schema(rename = "low")]
    Low,
}

/// OpenAPI schema for [`crate::domain::IssueType`].
#[derive(ToSchema)]
#[schema(as = crate::domain::IssueType)]
pub enum IssueTypeSchema {
    Software,
    Hardware,
    Network,
    Other,
}

/// OpenAPI schema for [`crate::domain::Ticket`].
///
/// A support request as stored, including its lifecycle status.
#[derive(ToSchema)]
#[schema(as = crate::domain::Ticket, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct TicketSchema {
    /// Store-assigned ticket identifier.
    #[schema(example = "9b2c1d7e-44f1-4b0e-9a57-1d2f0c3e4a5b")]
    id: String,
    /// Name of the user who opened the ticket.
    #[schema(example = "Ana Souza")]
    requester_name: String,
    /// Department of the user who opened the ticket.
    #[schema(example = "Vendas")]
    department: String,
    issue_type: IssueTypeSchema,
    /// Free-text problem description.
    #[schema(example = "Excel freezes when opening the sales report")]
    description: String,
    priority: Option<PrioritySchema>,
    status: TicketStatusSchema,
    /// Creation instant (RFC 3339, UTC).
    #[schema(example = "2026-03-02T09:30:00Z")]
    date: String,
}
