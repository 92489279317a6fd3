//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{IdentityResolution, TicketCommand, TicketQuery};
use crate::inbound::http::in_flight::InFlightRequests;

/// Parameter object bundling the driving ports used by HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub identity: Arc<dyn IdentityResolution>,
    pub tickets: Arc<dyn TicketCommand>,
    pub ticket_queries: Arc<dyn TicketQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn IdentityResolution>,
    pub tickets: Arc<dyn TicketCommand>,
    pub ticket_queries: Arc<dyn TicketQuery>,
    pub in_flight: InFlightRequests,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from the driving ports with an empty in-flight registry.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use helpdesk::domain::{IdentityService, TicketCommandService, TicketQueryService};
    /// use helpdesk::inbound::http::state::{HttpState, HttpStatePorts};
    /// use helpdesk::outbound::document::{
    ///     DocumentTicketRepository, DocumentUserRepository, InMemoryDocumentStore,
    /// };
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryDocumentStore::new());
    /// let users = Arc::new(DocumentUserRepository::new(Arc::clone(&store)));
    /// let tickets = Arc::new(DocumentTicketRepository::new(store));
    /// let state = HttpState::new(HttpStatePorts {
    ///     identity: Arc::new(IdentityService::new(users)),
    ///     tickets: Arc::new(TicketCommandService::new(
    ///         Arc::clone(&tickets),
    ///         Arc::new(DefaultClock),
    ///     )),
    ///     ticket_queries: Arc::new(TicketQueryService::new(tickets)),
    /// });
    /// let _identity = state.identity.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            identity,
            tickets,
            ticket_queries,
        } = ports;
        Self {
            identity,
            tickets,
            ticket_queries,
            in_flight: InFlightRequests::new(),
        }
    }
}
