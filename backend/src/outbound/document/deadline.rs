//! Deadline wrapper bounding every document store call.
//!
//! An expired call resolves to [`DocumentStoreError::Timeout`]. The inner
//! future is dropped; no retry is attempted.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::domain::ports::{
    Collection, ConditionalUpdate, Document, DocumentId, DocumentStore, DocumentStoreError,
    Precondition, StoredDocument, UniqueInsert,
};

/// [`DocumentStore`] decorator applying one timeout to every operation.
pub struct DeadlineDocumentStore<S: ?Sized> {
    inner: Arc<S>,
    timeout: Duration,
}

impl<S: ?Sized> DeadlineDocumentStore<S> {
    pub fn new(inner: Arc<S>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T, F>(
        &self,
        operation: &'static str,
        collection: Collection,
        call: F,
    ) -> Result<T, DocumentStoreError>
    where
        F: Future<Output = Result<T, DocumentStoreError>>,
    {
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        if let Ok(result) = tokio::time::timeout(self.timeout, call).await {
            result
        } else {
            warn!(operation, %collection, timeout_ms, "document store deadline expired");
            Err(DocumentStoreError::timeout(operation, timeout_ms))
        }
    }
}

#[async_trait]
impl<S> DocumentStore for DeadlineDocumentStore<S>
where
    S: DocumentStore + ?Sized,
{
    async fn insert(
        &self,
        collection: Collection,
        record: Document,
    ) -> Result<DocumentId, DocumentStoreError> {
        self.bounded("insert", collection, self.inner.insert(collection, record))
            .await
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        self.bounded("find_by_id", collection, self.inner.find_by_id(collection, id))
            .await
    }

    async fn query_equals(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        self.bounded(
            "query_equals",
            collection,
            self.inner.query_equals(collection, field, value),
        )
        .await
    }

    async fn list_all(
        &self,
        collection: Collection,
    ) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        self.bounded("list_all", collection, self.inner.list_all(collection))
            .await
    }

    async fn update(
        &self,
        collection: Collection,
        id: &DocumentId,
        partial: Document,
    ) -> Result<(), DocumentStoreError> {
        self.bounded("update", collection, self.inner.update(collection, id, partial))
            .await
    }

    async fn insert_if_absent(
        &self,
        collection: Collection,
        key_fields: &[&'static str],
        record: Document,
    ) -> Result<UniqueInsert, DocumentStoreError> {
        self.bounded(
            "insert_if_absent",
            collection,
            self.inner.insert_if_absent(collection, key_fields, record),
        )
        .await
    }

    async fn update_if(
        &self,
        collection: Collection,
        id: &DocumentId,
        precondition: Precondition,
        partial: Document,
    ) -> Result<ConditionalUpdate, DocumentStoreError> {
        self.bounded(
            "update_if",
            collection,
            self.inner.update_if(collection, id, precondition, partial),
        )
        .await
    }
}
