//! Port for the schemaless document store that holds users and tickets.
//!
//! Records are JSON objects addressed by a store-assigned [`DocumentId`].
//! Listings preserve insertion order. The two conditional operations,
//! [`DocumentStore::insert_if_absent`] and [`DocumentStore::update_if`], must
//! be atomic with respect to other calls on the same collection.

use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::define_port_error;

/// A record body: a JSON object without its identifier.
pub type Document = Map<String, Value>;

/// Named collections held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Tickets,
}

impl Collection {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Tickets => "tickets",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Store-assigned record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// A record as read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub fields: Document,
}

impl StoredDocument {
    /// Value of `field`, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// Guard for [`DocumentStore::update_if`]: `field` must currently equal
/// `equals`.
#[derive(Debug, Clone, PartialEq)]
pub struct Precondition {
    pub field: String,
    pub equals: Value,
}

impl Precondition {
    #[must_use]
    pub fn new(field: impl Into<String>, equals: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            equals: equals.into(),
        }
    }

    /// Whether `document` satisfies the guard. A missing field never does.
    #[must_use]
    pub fn holds_for(&self, document: &Document) -> bool {
        document.get(&self.field) == Some(&self.equals)
    }
}

/// Outcome of [`DocumentStore::insert_if_absent`].
#[derive(Debug, Clone, PartialEq)]
pub enum UniqueInsert {
    /// No record shared the key; the new one was stored under this id.
    Inserted(DocumentId),
    /// A record with the same key values already existed and was kept.
    Existing(StoredDocument),
}

/// Outcome of [`DocumentStore::update_if`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionalUpdate {
    /// The guard held; carries the record after the update.
    Applied(StoredDocument),
    /// The guard did not hold; carries the untouched record.
    PreconditionFailed(StoredDocument),
    /// No record with that id exists.
    Missing,
}

define_port_error! {
    /// Errors raised by document store adapters.
    pub enum DocumentStoreError {
        /// The store could not be reached.
        Connection { message: String } => "document store connection failed: {message}",
        /// The store did not answer before the deadline.
        Timeout { operation: String, timeout_ms: u64 } =>
            "document store {operation} timed out after {timeout_ms} ms",
        /// The store rejected or failed the operation.
        Query { message: String } => "document store query failed: {message}",
    }
}

/// Document store contract used by the user and ticket repositories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store `record` and return its new id.
    async fn insert(
        &self,
        collection: Collection,
        record: Document,
    ) -> Result<DocumentId, DocumentStoreError>;

    /// Fetch one record by id.
    async fn find_by_id(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>, DocumentStoreError>;

    /// Records whose `field` equals `value`, in insertion order.
    async fn query_equals(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredDocument>, DocumentStoreError>;

    /// Every record of `collection`, in insertion order.
    async fn list_all(
        &self,
        collection: Collection,
    ) -> Result<Vec<StoredDocument>, DocumentStoreError>;

    /// Merge `partial` into the record `id`.
    ///
    /// Updating an unknown id is a [`DocumentStoreError::Query`].
    async fn update(
        &self,
        collection: Collection,
        id: &DocumentId,
        partial: Document,
    ) -> Result<(), DocumentStoreError>;

    /// Store `record` unless a record with equal values for every field in
    /// `key_fields` already exists.
    async fn insert_if_absent(
        &self,
        collection: Collection,
        key_fields: &[&'static str],
        record: Document,
    ) -> Result<UniqueInsert, DocumentStoreError>;

    /// Merge `partial` into record `id` only while `precondition` holds.
    async fn update_if(
        &self,
        collection: Collection,
        id: &DocumentId,
        precondition: Precondition,
        partial: Document,
    ) -> Result<ConditionalUpdate, DocumentStoreError>;
}
