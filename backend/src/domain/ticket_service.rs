//! Ticket domain services.
//!
//! [`TicketCommandService`] opens tickets and advances their status;
//! [`TicketQueryService`] serves the technician queue and the requester's
//! scoped views.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    StatusUpdate, TicketCommand, TicketInsertion, TicketPersistenceError, TicketQuery,
    TicketReceipt, TicketRepository,
};
use crate::domain::ticket_query::{self, TicketFilter};
use crate::domain::{
    Error, InvalidTransition, NewTicket, Session, SubmissionToken, Ticket, TicketDraft, TicketId,
    TicketStatus, TicketSubmission, TicketValidationError,
};

fn map_repository_error(error: TicketPersistenceError) -> Error {
    match error {
        TicketPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("ticket repository unavailable: {message}"))
        }
        TicketPersistenceError::Query { message } => {
            Error::internal(format!("ticket repository error: {message}"))
        }
        TicketPersistenceError::Decode { message } => {
            Error::internal(format!("stored ticket is unreadable: {message}"))
        }
    }
}

fn map_validation_error(error: &TicketValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": error.field() }))
}

fn map_transition_error(error: InvalidTransition) -> Error {
    Error::invalid_transition(error.to_string()).with_details(json!({
        "from": error.from.as_str(),
        "to": error.to.as_str(),
    }))
}

fn ticket_not_found(id: &TicketId) -> Error {
    Error::not_found(format!("ticket {id} not found"))
}

/// Ticket service implementing [`TicketCommand`].
#[derive(Clone)]
pub struct TicketCommandService<R> {
    ticket_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> TicketCommandService<R> {
    pub fn new(ticket_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { ticket_repo, clock }
    }
}

#[async_trait]
impl<R> TicketCommand for TicketCommandService<R>
where
    R: TicketRepository,
{
    async fn create(
        &self,
        session: &Session,
        submission: TicketSubmission,
        token: Option<SubmissionToken>,
    ) -> Result<TicketReceipt, Error> {
        let requester = session.require_user()?;
        let draft = TicketDraft::from_submission(requester, &submission)
            .map_err(|err| map_validation_error(&err))?;
        let new_ticket = NewTicket {
            draft,
            created_at: self.clock.utc(),
            submission_token: token,
        };

        let insertion = self
            .ticket_repo
            .insert(&new_ticket)
            .await
            .map_err(map_repository_error)?;
        let receipt = match insertion {
            TicketInsertion::Created(ticket) => {
                info!(ticket_id = %ticket.id(), requester = %requester.id(), "ticket opened");
                TicketReceipt {
                    ticket,
                    replayed: false,
                }
            }
            TicketInsertion::Replayed(ticket) => {
                info!(ticket_id = %ticket.id(), "submission token replayed");
                TicketReceipt {
                    ticket,
                    replayed: true,
                }
            }
        };
        Ok(receipt)
    }

    async fn transition(&self, id: &TicketId, next: TicketStatus) -> Result<Ticket, Error> {
        let current = self
            .ticket_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| ticket_not_found(id))?;
        let from = current.status();
        let next = from.transition_to(next).map_err(map_transition_error)?;

        match self
            .ticket_repo
            .update_status_if(id, from, next)
            .await
            .map_err(map_repository_error)?
        {
            StatusUpdate::Applied(ticket) => {
                info!(ticket_id = %id, %from, to = %next, "ticket status changed");
                Ok(ticket)
            }
            StatusUpdate::Stale(ticket) => {
                info!(ticket_id = %id, expected = %from, found = %ticket.status(), "lost status race");
                Err(map_transition_error(InvalidTransition {
                    from: ticket.status(),
                    to: next,
                }))
            }
            StatusUpdate::Missing => Err(ticket_not_found(id)),
        }
    }
}

/// Ticket service implementing [`TicketQuery`].
#[derive(Clone)]
pub struct TicketQueryService<R> {
    ticket_repo: Arc<R>,
}

impl<R> TicketQueryService<R> {
    pub fn new(ticket_repo: Arc<R>) -> Self {
        Self { ticket_repo }
    }
}

#[async_trait]
impl<R> TicketQuery for TicketQueryService<R>
where
    R: TicketRepository,
{
    async fn queue(&self, filter: TicketFilter) -> Result<Vec<Ticket>, Error> {
        let tickets = self
            .ticket_repo
            .list_all()
            .await
            .map_err(map_repository_error)?;
        Ok(ticket_query::list(&tickets, &filter))
    }

    async fn mine(&self, session: &Session) -> Result<Vec<Ticket>, Error> {
        let user = session.require_user()?;
        self.ticket_repo
            .list_by_requester(user.name())
            .await
            .map_err(map_repository_error)
    }

    async fn department(&self, session: &Session) -> Result<Vec<Ticket>, Error> {
        let user = session.require_user()?;
        self.ticket_repo
            .list_by_department(user.department())
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "ticket_service_tests.rs"]
mod tests;
