//! Helpdesk ticket core.
//!
//! Self-asserted identity, ticket submission and lifecycle, and the
//! technician queue, exposed over a session-cookie JSON API.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
