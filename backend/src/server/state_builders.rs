//! Builders wiring the document store into repositories, services and
//! HTTP state.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::Clock;

use crate::domain::ports::DocumentStore;
use crate::domain::{IdentityService, TicketCommandService, TicketQueryService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::document::{
    DeadlineDocumentStore, DocumentTicketRepository, DocumentUserRepository,
};

/// Bound every call on `store` by `timeout`.
pub fn with_deadline(store: Arc<dyn DocumentStore>, timeout: Duration) -> Arc<dyn DocumentStore> {
    Arc::new(DeadlineDocumentStore::new(store, timeout))
}

/// Build handler state over a (deadline-wrapped) document store.
pub fn build_http_state(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> web::Data<HttpState> {
    let users = Arc::new(DocumentUserRepository::new(Arc::clone(&store)));
    let tickets = Arc::new(DocumentTicketRepository::new(store));
    web::Data::new(HttpState::new(HttpStatePorts {
        identity: Arc::new(IdentityService::new(users)),
        tickets: Arc::new(TicketCommandService::new(Arc::clone(&tickets), clock)),
        ticket_queries: Arc::new(TicketQueryService::new(tickets)),
    }))
}
