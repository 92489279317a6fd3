//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{HelpdeskSettings, ServerConfig};
pub use state_builders::{build_http_state, with_deadline};

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
use crate::doc::ApiDoc;
use crate::domain::ports::DocumentStore;
use crate::inbound::http::identity::{current_session, login, logout};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tickets::{
    change_status, create_ticket, list_department, list_mine, list_queue,
};

/// Everything one application instance needs.
#[derive(Clone)]
pub struct AppDependencies {
    pub http_state: web::Data<HttpState>,
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Assemble the Actix application: trace middleware, the session-wrapped
/// `/api/v1` scope and the OpenAPI document.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(8)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(login)
        .service(logout)
        .service(current_session)
        .service(create_ticket)
        .service(list_queue)
        .service(list_mine)
        .service(list_department)
        .service(change_status);

    App::new()
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Construct an Actix HTTP server over `store`.
///
/// Every store call is bounded by the configured deadline.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig, store: Arc<dyn DocumentStore>) -> std::io::Result<Server> {
    let http_state = build_http_state(
        with_deadline(store, config.store_timeout),
        Arc::new(DefaultClock),
    );
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        store_timeout,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    let store_timeout_ms = u64::try_from(store_timeout.as_millis()).unwrap_or(u64::MAX);
    info!(%bind_addr, store_timeout_ms, "helpdesk listening");
    Ok(server)
}
