//! Ticket API handlers.
//!
//! ```text
//! POST /api/v1/tickets {"issueType":"Software","description":"...","priority":"high"}
//! GET /api/v1/tickets?status=open&priority=all
//! GET /api/v1/tickets/mine
//! GET /api/v1/tickets/department
//! POST /api/v1/tickets/{ticket_id}/status {"status":"in_progress"}
//! ```

use actix_web::http::header::HeaderMap;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    Error, FilterValidationError, SubmissionToken, SubmissionTokenValidationError, Ticket,
    TicketFilter, TicketId, TicketStatus, TicketSubmission, TicketValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::in_flight::InFlightAction;
use crate::inbound::http::schemas::{ErrorSchema, TicketSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// HTTP header carrying the client's submission token.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Request payload for opening a ticket.
///
/// Missing text fields decode as empty so the domain reports which one is
/// required.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTicketRequest {
    #[schema(example = "Software")]
    pub issue_type: String,
    #[schema(example = "Excel freezes when opening the sales report")]
    pub description: String,
    #[schema(example = "high")]
    pub priority: Option<String>,
}

impl From<CreateTicketRequest> for TicketSubmission {
    fn from(value: CreateTicketRequest) -> Self {
        Self {
            issue_type: value.issue_type,
            description: value.description,
            priority: value.priority,
        }
    }
}

/// Request payload for moving a ticket along its lifecycle.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeRequest {
    #[schema(example = "in_progress")]
    pub status: String,
}

/// Queue filters; each defaults to `all`.
#[derive(Debug, Default, Deserialize)]
pub struct QueueQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TicketPath {
    ticket_id: String,
}

fn field_error(message: impl Into<String>, field: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field }))
}

fn map_token_error(err: SubmissionTokenValidationError) -> Error {
    let message = match err {
        SubmissionTokenValidationError::EmptyToken => "idempotency-key header must not be empty",
        SubmissionTokenValidationError::InvalidToken => "idempotency-key header must be a valid uuid",
    };
    field_error(message, IDEMPOTENCY_KEY_HEADER)
}

fn map_filter_error(err: &FilterValidationError) -> Error {
    field_error(err.to_string(), err.field())
}

fn map_ticket_field_error(err: &TicketValidationError) -> Error {
    field_error(err.to_string(), err.field())
}

/// Read the optional submission token from request headers.
pub fn extract_submission_token(headers: &HeaderMap) -> ApiResult<Option<SubmissionToken>> {
    let Some(value) = headers.get(IDEMPOTENCY_KEY_HEADER) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| map_token_error(SubmissionTokenValidationError::InvalidToken))?;
    SubmissionToken::new(raw).map(Some).map_err(map_token_error)
}

/// Open a ticket for the acting user.
///
/// A replayed `Idempotency-Key` returns the ticket created by the first
/// request with `200 OK` instead of `201 Created`.
#[utoipa::path(
    post,
    path = "/api/v1/tickets",
    request_body = CreateTicketRequest,
    params(
        ("Idempotency-Key" = Option<String>, Header, description = "UUID making the submission idempotent")
    ),
    responses(
        (status = 201, description = "Ticket opened", body = TicketSchema),
        (status = 200, description = "Replayed submission", body = TicketSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Submission already in progress", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "createTicket"
)]
#[post("/tickets")]
pub async fn create_ticket(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    payload: web::Json<CreateTicketRequest>,
) -> ApiResult<HttpResponse> {
    let session = session.session();
    let requester = session.require_user()?.id().clone();
    let token = extract_submission_token(request.headers())?;
    let _claim = state.in_flight.claim(InFlightAction::Submission(requester))?;

    let receipt = state
        .tickets
        .create(&session, payload.into_inner().into(), token)
        .await?;
    if receipt.replayed {
        info!(ticket_id = %receipt.ticket.id(), "ticket submission replayed");
        Ok(HttpResponse::Ok().json(receipt.ticket))
    } else {
        Ok(HttpResponse::Created().json(receipt.ticket))
    }
}

/// Technician queue: every ticket, filtered and ordered by priority.
#[utoipa::path(
    get,
    path = "/api/v1/tickets",
    params(
        ("status" = Option<String>, Query, description = "all, open, in_progress or closed"),
        ("priority" = Option<String>, Query, description = "all, high, medium or low")
    ),
    responses(
        (status = 200, description = "Filtered queue", body = [TicketSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "listTicketQueue"
)]
#[get("/tickets")]
pub async fn list_queue(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<QueueQuery>,
) -> ApiResult<web::Json<Vec<Ticket>>> {
    session.session().require_user()?;
    let QueueQuery { status, priority } = query.into_inner();
    let filter =
        TicketFilter::parse(status.as_deref(), priority.as_deref()).map_err(|err| map_filter_error(&err))?;
    let tickets = state.ticket_queries.queue(filter).await?;
    Ok(web::Json(tickets))
}

/// Tickets raised by the acting user.
#[utoipa::path(
    get,
    path = "/api/v1/tickets/mine",
    responses(
        (status = 200, description = "Own tickets in store order", body = [TicketSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "listMyTickets"
)]
#[get("/tickets/mine")]
pub async fn list_mine(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Ticket>>> {
    let tickets = state.ticket_queries.mine(&session.session()).await?;
    Ok(web::Json(tickets))
}

/// Tickets raised from the acting user's department.
#[utoipa::path(
    get,
    path = "/api/v1/tickets/department",
    responses(
        (status = 200, description = "Department tickets in store order", body = [TicketSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "listDepartmentTickets"
)]
#[get("/tickets/department")]
pub async fn list_department(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Ticket>>> {
    let tickets = state.ticket_queries.department(&session.session()).await?;
    Ok(web::Json(tickets))
}

/// Advance a ticket to its next status.
#[utoipa::path(
    post,
    path = "/api/v1/tickets/{ticket_id}/status",
    request_body = StatusChangeRequest,
    params(
        ("ticket_id" = String, Path, description = "Ticket identifier")
    ),
    responses(
        (status = 200, description = "Store-confirmed ticket", body = TicketSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Transition already in progress", body = ErrorSchema),
        (status = 422, description = "Illegal transition", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "changeTicketStatus"
)]
#[post("/tickets/{ticket_id}/status")]
pub async fn change_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<TicketPath>,
    payload: web::Json<StatusChangeRequest>,
) -> ApiResult<web::Json<Ticket>> {
    let session = session.session();
    let actor = session.require_user()?;
    let id = TicketId::new(path.into_inner().ticket_id).map_err(|err| map_ticket_field_error(&err))?;
    let next: TicketStatus = payload
        .status
        .parse()
        .map_err(|err: TicketValidationError| map_ticket_field_error(&err))?;
    let _claim = state.in_flight.claim(InFlightAction::Transition(id.clone()))?;

    let ticket = state.tickets.transition(&id, next).await?;
    info!(ticket_id = %id, status = %next, actor = %actor.id(), "ticket status changed");
    Ok(web::Json(ticket))
}
