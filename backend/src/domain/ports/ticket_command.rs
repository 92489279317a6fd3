//! Driving port for ticket mutations: opening tickets and moving them through
//! the lifecycle.

use async_trait::async_trait;

use crate::domain::{
    Error, Session, SubmissionToken, Ticket, TicketId, TicketStatus, TicketSubmission,
};

/// Ticket returned by [`TicketCommand::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketReceipt {
    pub ticket: Ticket,
    /// `true` when the submission token had already been used and nothing
    /// new was written.
    pub replayed: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketCommand: Send + Sync {
    /// Open a ticket on behalf of the session user.
    async fn create(
        &self,
        session: &Session,
        submission: TicketSubmission,
        token: Option<SubmissionToken>,
    ) -> Result<TicketReceipt, Error>;

    /// Move ticket `id` to `next`, returning the stored ticket.
    async fn transition(&self, id: &TicketId, next: TicketStatus) -> Result<Ticket, Error>;
}
