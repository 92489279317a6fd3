//! Port for ticket persistence.
//!
//! Status changes go through [`TicketRepository::update_status_if`], a
//! compare-and-set on the stored status, so two concurrent transitions can
//! never reverse or skip a lifecycle step.

use async_trait::async_trait;

use crate::domain::{Department, NewTicket, PersonName, Ticket, TicketId, TicketStatus};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by ticket repository adapters.
    pub enum TicketPersistenceError {
        /// Repository connection could not be established or timed out.
        Connection { message: String } => "ticket repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ticket repository query failed: {message}",
        /// A stored record could not be read back as a ticket.
        Decode { message: String } => "ticket record could not be decoded: {message}",
    }
}

/// Result of [`TicketRepository::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketInsertion {
    /// A new ticket was written.
    Created(Ticket),
    /// The submission token was already used; this is the ticket it created.
    Replayed(Ticket),
}

/// Result of [`TicketRepository::update_status_if`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The status matched and was replaced; carries the stored ticket.
    Applied(Ticket),
    /// The stored status no longer matched; carries the current ticket.
    Stale(Ticket),
    /// No ticket with that id.
    Missing,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Store a freshly opened ticket.
    ///
    /// When the ticket carries a submission token, a second insert with the
    /// same token returns [`TicketInsertion::Replayed`] and writes nothing.
    async fn insert(&self, ticket: &NewTicket) -> Result<TicketInsertion, TicketPersistenceError>;

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, TicketPersistenceError>;

    /// Every ticket in store order.
    async fn list_all(&self) -> Result<Vec<Ticket>, TicketPersistenceError>;

    /// Tickets whose requester name literally equals `name`, in store order.
    async fn list_by_requester(
        &self,
        name: &PersonName,
    ) -> Result<Vec<Ticket>, TicketPersistenceError>;

    /// Tickets whose department literally equals `department`, in store order.
    async fn list_by_department(
        &self,
        department: &Department,
    ) -> Result<Vec<Ticket>, TicketPersistenceError>;

    /// Set the status of `id` to `next` only while it is still `expected`.
    async fn update_status_if(
        &self,
        id: &TicketId,
        expected: TicketStatus,
        next: TicketStatus,
    ) -> Result<StatusUpdate, TicketPersistenceError>;
}
