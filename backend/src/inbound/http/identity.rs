//! Identity API handlers.
//!
//! ```text
//! POST /api/v1/login {"name":"Ana Souza","department":"Vendas"}
//! POST /api/v1/logout
//! GET /api/v1/session
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Session, User, Workspace};
use crate::inbound::http::ApiResult;
use crate::inbound::http::in_flight::InFlightAction;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema, WorkspaceSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
///
/// Example JSON:
/// `{"name":"Ana Souza","department":"Vendas"}`
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub name: String,
    pub department: String,
}

/// The acting user and the workspace their department lands on.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    #[schema(value_type = UserSchema)]
    pub user: User,
    #[schema(value_type = WorkspaceSchema)]
    pub workspace: Workspace,
}

impl From<User> for SessionResponse {
    fn from(user: User) -> Self {
        let workspace = user.workspace();
        Self { user, workspace }
    }
}

fn session_response(session: &Session) -> ApiResult<SessionResponse> {
    let user = session.require_user()?;
    Ok(SessionResponse::from(user.clone()))
}

/// Resolve the claimed identity and establish it as the acting user.
///
/// Identity is self-asserted: the first login for a (name, department) pair
/// creates the user; later logins reuse it.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Login already in progress", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["identity"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let LoginRequest { name, department } = payload.into_inner();
    let _claim = state.in_flight.claim(InFlightAction::Login {
        name: name.clone(),
        department: department.clone(),
    })?;
    let user = state.identity.resolve(&name, &department).await?;
    let established = session.establish(&user)?;
    info!(user_id = %user.id(), workspace = ?user.workspace(), "session established");
    session_response(&established).map(web::Json)
}

/// Clear the acting user.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Session cleared")
    ),
    tags = ["identity"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    if let Some(user) = session.clear() {
        info!(user_id = %user.id(), "session cleared");
    }
    HttpResponse::NoContent().finish()
}

/// Return the acting user and their workspace.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["identity"],
    operation_id = "currentSession"
)]
#[get("/session")]
pub async fn current_session(session: SessionContext) -> ApiResult<web::Json<SessionResponse>> {
    session_response(&session.session()).map(web::Json)
}
