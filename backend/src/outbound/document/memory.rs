//! Process-local document store.
//!
//! Keeps every collection in insertion order behind one mutex, which makes
//! the conditional operations atomic. Contents are lost on restart.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::ports::{
    Collection, ConditionalUpdate, Document, DocumentId, DocumentStore, DocumentStoreError,
    Precondition, StoredDocument, UniqueInsert,
};

type Collections = HashMap<Collection, Vec<StoredDocument>>;

fn merge(target: &mut Document, partial: Document) {
    for (field, value) in partial {
        target.insert(field, value);
    }
}

fn shares_key(document: &Document, record: &Document, key_fields: &[&str]) -> bool {
    key_fields
        .iter()
        .all(|field| document.get(*field) == record.get(*field))
}

/// In-memory [`DocumentStore`].
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: Mutex<Collections>,
}

impl InMemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_collections<T>(
        &self,
        operation: impl FnOnce(&mut Collections) -> T,
    ) -> Result<T, DocumentStoreError> {
        let mut guard = self
            .collections
            .lock()
            .map_err(|_: PoisonError<_>| DocumentStoreError::connection("in-memory store poisoned"))?;
        Ok(operation(&mut guard))
    }

    fn store_new(collections: &mut Collections, collection: Collection, record: Document) -> DocumentId {
        let id = DocumentId::new(Uuid::new_v4().to_string());
        collections.entry(collection).or_default().push(StoredDocument {
            id: id.clone(),
            fields: record,
        });
        id
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(
        &self,
        collection: Collection,
        record: Document,
    ) -> Result<DocumentId, DocumentStoreError> {
        self.with_collections(|collections| Self::store_new(collections, collection, record))
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        self.with_collections(|collections| {
            collections
                .get(&collection)
                .and_then(|documents| documents.iter().find(|document| &document.id == id))
                .cloned()
        })
    }

    async fn query_equals(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        self.with_collections(|collections| {
            collections
                .get(&collection)
                .map(|documents| {
                    documents
                        .iter()
                        .filter(|document| document.get(field) == Some(value))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        })
    }

    async fn list_all(
        &self,
        collection: Collection,
    ) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        self.with_collections(|collections| {
            collections.get(&collection).cloned().unwrap_or_default()
        })
    }

    async fn update(
        &self,
        collection: Collection,
        id: &DocumentId,
        partial: Document,
    ) -> Result<(), DocumentStoreError> {
        self.with_collections(|collections| {
            let document = collections
                .get_mut(&collection)
                .and_then(|documents| documents.iter_mut().find(|document| &document.id == id));
            match document {
                Some(document) => {
                    merge(&mut document.fields, partial);
                    Ok(())
                }
                None => Err(DocumentStoreError::query(format!(
                    "no document {id} in {collection}"
                ))),
            }
        })?
    }

    async fn insert_if_absent(
        &self,
        collection: Collection,
        key_fields: &[&'static str],
        record: Document,
    ) -> Result<UniqueInsert, DocumentStoreError> {
        if let Some(field) = key_fields.iter().find(|field| !record.contains_key(**field)) {
            return Err(DocumentStoreError::query(format!(
                "record lacks unique key field {field}"
            )));
        }
        self.with_collections(|collections| {
            let existing = collections.get(&collection).and_then(|documents| {
                documents
                    .iter()
                    .find(|document| shares_key(&document.fields, &record, key_fields))
                    .cloned()
            });
            match existing {
                Some(document) => UniqueInsert::Existing(document),
                None => UniqueInsert::Inserted(Self::store_new(collections, collection, record)),
            }
        })
    }

    async fn update_if(
        &self,
        collection: Collection,
        id: &DocumentId,
        precondition: Precondition,
        partial: Document,
    ) -> Result<ConditionalUpdate, DocumentStoreError> {
        self.with_collections(|collections| {
            let Some(document) = collections
                .get_mut(&collection)
                .and_then(|documents| documents.iter_mut().find(|document| &document.id == id))
            else {
                return ConditionalUpdate::Missing;
            };
            if !precondition.holds_for(&document.fields) {
                return ConditionalUpdate::PreconditionFailed(document.clone());
            }
            merge(&mut document.fields, partial);
            ConditionalUpdate::Applied(document.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Document {
        let Value::Object(fields) = value else {
            panic!("fixture must be an object");
        };
        fields
    }

    #[fixture]
    fn store() -> InMemoryDocumentStore {
        InMemoryDocumentStore::new()
    }

    #[rstest]
    #[tokio::test]
    async fn listings_preserve_insertion_order(store: InMemoryDocumentStore) {
        for name in ["c", "a", "b"] {
            store
                .insert(Collection::Users, record(json!({ "name": name })))
                .await
                .expect("insert");
        }

        let names: Vec<Value> = store
            .list_all(Collection::Users)
            .await
            .expect("list")
            .into_iter()
            .filter_map(|document| document.get("name").cloned())
            .collect();
        assert_eq!(names, vec![json!("c"), json!("a"), json!("b")]);
        assert!(store.list_all(Collection::Tickets).await.expect("list").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn query_equals_compares_exactly(store: InMemoryDocumentStore) {
        store
            .insert(Collection::Users, record(json!({"name": "Ana", "department": "TI"})))
            .await
            .expect("insert");
        store
            .insert(Collection::Users, record(json!({"name": "Ana", "department": "ti"})))
            .await
            .expect("insert");

        let matches = store
            .query_equals(Collection::Users, "department", &json!("TI"))
            .await
            .expect("query");
        assert_eq!(matches.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn insert_if_absent_keeps_first_record(store: InMemoryDocumentStore) {
        let key = &["name", "department"];
        let first = store
            .insert_if_absent(Collection::Users, key, record(json!({"name": "Ana", "department": "Vendas"})))
            .await
            .expect("first");
        let UniqueInsert::Inserted(first_id) = first else {
            panic!("first insert must store the record");
        };

        let second = store
            .insert_if_absent(Collection::Users, key, record(json!({"name": "Ana", "department": "Vendas"})))
            .await
            .expect("second");
        assert!(matches!(second, UniqueInsert::Existing(ref document) if document.id == first_id));
        assert_eq!(store.list_all(Collection::Users).await.expect("list").len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn insert_if_absent_requires_key_fields(store: InMemoryDocumentStore) {
        let err = store
            .insert_if_absent(Collection::Tickets, &["submissionToken"], record(json!({})))
            .await
            .expect_err("missing key");
        assert!(matches!(err, DocumentStoreError::Query { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_unique_inserts_store_one_record() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .insert_if_absent(
                            Collection::Users,
                            &["name", "department"],
                            record(json!({"name": "Ana", "department": "Vendas"})),
                        )
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.expect("join").expect("insert");
        }

        assert_eq!(store.list_all(Collection::Users).await.expect("list").len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn update_if_applies_only_while_guard_holds(store: InMemoryDocumentStore) {
        let id = store
            .insert(Collection::Tickets, record(json!({"status": "open"})))
            .await
            .expect("insert");
        let guard = Precondition::new("status", "open");
        let patch = record(json!({"status": "in_progress"}));

        let applied = store
            .update_if(Collection::Tickets, &id, guard.clone(), patch.clone())
            .await
            .expect("first update");
        assert!(matches!(applied, ConditionalUpdate::Applied(ref d) if d.get("status") == Some(&json!("in_progress"))));

        let stale = store
            .update_if(Collection::Tickets, &id, guard, patch)
            .await
            .expect("second update");
        assert!(matches!(stale, ConditionalUpdate::PreconditionFailed(_)));

        let missing = store
            .update_if(
                Collection::Tickets,
                &DocumentId::new("nope"),
                Precondition::new("status", "open"),
                Document::new(),
            )
            .await
            .expect("missing");
        assert_eq!(missing, ConditionalUpdate::Missing);
    }

    #[rstest]
    #[tokio::test]
    async fn update_merges_fields_and_rejects_unknown_ids(store: InMemoryDocumentStore) {
        let id = store
            .insert(Collection::Tickets, record(json!({"status": "open", "priority": null})))
            .await
            .expect("insert");
        store
            .update(Collection::Tickets, &id, record(json!({"priority": "low"})))
            .await
            .expect("update");

        let document = store
            .find_by_id(Collection::Tickets, &id)
            .await
            .expect("find")
            .expect("present");
        assert_eq!(document.get("priority"), Some(&json!("low")));
        assert_eq!(document.get("status"), Some(&json!("open")));

        let err = store
            .update(Collection::Tickets, &DocumentId::new("nope"), Document::new())
            .await
            .expect_err("unknown id");
        assert!(matches!(err, DocumentStoreError::Query { .. }));
    }
}
