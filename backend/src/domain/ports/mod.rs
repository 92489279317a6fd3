//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`DocumentStore`], [`UserRepository`], [`TicketRepository`])
//! are implemented by outbound adapters. Driving ports
//! ([`IdentityResolution`], [`TicketCommand`], [`TicketQuery`]) are
//! implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod document_store;
mod identity_resolution;
mod ticket_command;
mod ticket_query;
mod ticket_repository;
mod user_repository;

#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{
    Collection, ConditionalUpdate, Document, DocumentId, DocumentStore, DocumentStoreError,
    Precondition, StoredDocument, UniqueInsert,
};
#[cfg(test)]
pub use identity_resolution::MockIdentityResolution;
pub use identity_resolution::IdentityResolution;
#[cfg(test)]
pub use ticket_command::MockTicketCommand;
pub use ticket_command::{TicketCommand, TicketReceipt};
#[cfg(test)]
pub use ticket_query::MockTicketQuery;
pub use ticket_query::TicketQuery;
#[cfg(test)]
pub use ticket_repository::MockTicketRepository;
pub use ticket_repository::{
    StatusUpdate, TicketInsertion, TicketPersistenceError, TicketRepository,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserCreation, UserPersistenceError, UserRepository};
