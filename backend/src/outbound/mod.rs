//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Adapters are thin translators between domain types and the storage
//! representation. They contain no business logic.
//!
//! - **document**: repositories over the document store, the store deadline
//!   and the in-memory store used for local runs and tests.

pub mod document;
