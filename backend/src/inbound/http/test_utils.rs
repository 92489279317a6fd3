//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, post, test as actix_test, web};

use crate::domain::ports::{MockIdentityResolution, MockTicketCommand, MockTicketQuery};
use crate::domain::{Error, User};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Mocked driving ports; each defaults to a mock with no expectations.
#[derive(Default)]
pub struct MockPorts {
    pub identity: MockIdentityResolution,
    pub tickets: MockTicketCommand,
    pub ticket_queries: MockTicketQuery,
}

impl MockPorts {
    /// Wrap the mocks into handler state.
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            identity: Arc::new(self.identity),
            tickets: Arc::new(self.tickets),
            ticket_queries: Arc::new(self.ticket_queries),
        }))
    }
}

pub fn user(id: &str, name: &str, department: &str) -> User {
    User::try_from_strings(id, name, department).expect("fixture user")
}

/// Test-only route that writes the posted user into the session cookie.
#[post("/test/session")]
pub async fn seed_session(
    session: SessionContext,
    payload: web::Json<User>,
) -> Result<HttpResponse, Error> {
    session.establish(&payload.into_inner())?;
    Ok(HttpResponse::Ok().finish())
}

/// Extract the `session` cookie set by a response.
pub fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Establish `user` through [`seed_session`] and return the cookie.
pub async fn cookie_for<S>(app: &S, user: &User) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri("/test/session")
        .set_json(user)
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "seeding the session failed");
    session_cookie(&response)
}
