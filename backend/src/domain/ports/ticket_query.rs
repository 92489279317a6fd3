//! Driving port for reading tickets.

use async_trait::async_trait;

use crate::domain::{Error, Session, Ticket, TicketFilter};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketQuery: Send + Sync {
    /// Technician queue: every ticket, filtered then sorted by priority.
    async fn queue(&self, filter: TicketFilter) -> Result<Vec<Ticket>, Error>;

    /// Tickets raised by the session user, in store order.
    async fn mine(&self, session: &Session) -> Result<Vec<Ticket>, Error>;

    /// Tickets raised from the session user's department, in store order.
    async fn department(&self, session: &Session) -> Result<Vec<Ticket>, Error>;
}
