//! `TicketRepository` backed by the `tickets` collection of a document store.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{
    Collection, ConditionalUpdate, DocumentId, DocumentStore, DocumentStoreError, Precondition,
    StatusUpdate, StoredDocument, TicketInsertion, TicketPersistenceError, TicketRepository,
    UniqueInsert,
};
use crate::domain::{Department, NewTicket, PersonName, Ticket, TicketId, TicketStatus};

use super::records::{self, DEPARTMENT, REQUESTER_NAME, STATUS, TICKET_TOKEN_KEY};

fn map_store_error(error: DocumentStoreError) -> TicketPersistenceError {
    debug!(%error, "ticket store operation failed");
    match error {
        DocumentStoreError::Connection { message } => TicketPersistenceError::connection(message),
        timeout @ DocumentStoreError::Timeout { .. } => {
            TicketPersistenceError::connection(timeout.to_string())
        }
        DocumentStoreError::Query { message } => TicketPersistenceError::query(message),
    }
}

fn decode(document: &StoredDocument) -> Result<Ticket, TicketPersistenceError> {
    records::record_to_ticket(document).map_err(TicketPersistenceError::decode)
}

fn decode_all(documents: &[StoredDocument]) -> Result<Vec<Ticket>, TicketPersistenceError> {
    documents.iter().map(decode).collect()
}

fn document_id(id: &TicketId) -> DocumentId {
    DocumentId::new(id.as_ref())
}

fn ticket_id(id: &DocumentId) -> Result<TicketId, TicketPersistenceError> {
    TicketId::new(id.as_ref())
        .map_err(|err| TicketPersistenceError::decode(format!("store returned id {id:?}: {err}")))
}

/// Ticket repository adapter over any [`DocumentStore`].
pub struct DocumentTicketRepository<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> DocumentTicketRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: ?Sized> Clone for DocumentTicketRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> DocumentTicketRepository<S>
where
    S: DocumentStore + ?Sized,
{
    async fn list_where(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Vec<Ticket>, TicketPersistenceError> {
        let documents = self
            .store
            .query_equals(Collection::Tickets, field, &Value::from(value))
            .await
            .map_err(map_store_error)?;
        decode_all(&documents)
    }
}

#[async_trait]
impl<S> TicketRepository for DocumentTicketRepository<S>
where
    S: DocumentStore + ?Sized,
{
    async fn insert(&self, ticket: &NewTicket) -> Result<TicketInsertion, TicketPersistenceError> {
        let record = records::new_ticket_to_record(ticket);
        if ticket.submission_token.is_none() {
            let id = self
                .store
                .insert(Collection::Tickets, record)
                .await
                .map_err(map_store_error)?;
            return Ok(TicketInsertion::Created(
                ticket.clone().into_ticket(ticket_id(&id)?),
            ));
        }

        let outcome = self
            .store
            .insert_if_absent(Collection::Tickets, TICKET_TOKEN_KEY, record)
            .await
            .map_err(map_store_error)?;
        match outcome {
            UniqueInsert::Inserted(id) => Ok(TicketInsertion::Created(
                ticket.clone().into_ticket(ticket_id(&id)?),
            )),
            UniqueInsert::Existing(document) => decode(&document).map(TicketInsertion::Replayed),
        }
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, TicketPersistenceError> {
        self.store
            .find_by_id(Collection::Tickets, &document_id(id))
            .await
            .map_err(map_store_error)?
            .as_ref()
            .map(decode)
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<Ticket>, TicketPersistenceError> {
        let documents = self
            .store
            .list_all(Collection::Tickets)
            .await
            .map_err(map_store_error)?;
        decode_all(&documents)
    }

    async fn list_by_requester(
        &self,
        name: &PersonName,
    ) -> Result<Vec<Ticket>, TicketPersistenceError> {
        self.list_where(REQUESTER_NAME, name.as_ref()).await
    }

    async fn list_by_department(
        &self,
        department: &Department,
    ) -> Result<Vec<Ticket>, TicketPersistenceError> {
        self.list_where(DEPARTMENT, department.as_ref()).await
    }

    async fn update_status_if(
        &self,
        id: &TicketId,
        expected: TicketStatus,
        next: TicketStatus,
    ) -> Result<StatusUpdate, TicketPersistenceError> {
        let outcome = self
            .store
            .update_if(
                Collection::Tickets,
                &document_id(id),
                Precondition::new(STATUS, expected.as_str()),
                records::status_patch(next),
            )
            .await
            .map_err(map_store_error)?;
        match outcome {
            ConditionalUpdate::Applied(document) => decode(&document).map(StatusUpdate::Applied),
            ConditionalUpdate::PreconditionFailed(document) => {
                decode(&document).map(StatusUpdate::Stale)
            }
            ConditionalUpdate::Missing => Ok(StatusUpdate::Missing),
        }
    }
}
