//! Document store adapters.
//!
//! - [`DocumentUserRepository`] and [`DocumentTicketRepository`] implement the
//!   typed repository ports over any [`DocumentStore`](crate::domain::ports::DocumentStore).
//! - [`DeadlineDocumentStore`] bounds every store call with a timeout.
//! - [`InMemoryDocumentStore`] keeps collections in process memory.
//!
//! Record layout and label decoding live in `records`, shared by both
//! repositories.

mod deadline;
mod memory;
mod records;
mod ticket_repository;
mod user_repository;

pub use deadline::DeadlineDocumentStore;
pub use memory::InMemoryDocumentStore;
pub use ticket_repository::DocumentTicketRepository;
pub use user_repository::DocumentUserRepository;
