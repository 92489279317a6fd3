//! `UserRepository` backed by the `users` collection of a document store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    Collection, DocumentStore, DocumentStoreError, StoredDocument, UniqueInsert, UserCreation,
    UserPersistenceError, UserRepository,
};
use crate::domain::{User, UserIdentity};

use super::records::{self, DEPARTMENT, NAME, USER_KEY};

fn map_store_error(error: DocumentStoreError) -> UserPersistenceError {
    debug!(%error, "user store operation failed");
    match error {
        DocumentStoreError::Connection { message } => UserPersistenceError::connection(message),
        timeout @ DocumentStoreError::Timeout { .. } => {
            UserPersistenceError::connection(timeout.to_string())
        }
        DocumentStoreError::Query { message } => UserPersistenceError::query(message),
    }
}

fn decode(document: &StoredDocument) -> Result<User, UserPersistenceError> {
    records::record_to_user(document).map_err(UserPersistenceError::decode)
}

/// User repository adapter over any [`DocumentStore`].
pub struct DocumentUserRepository<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> DocumentUserRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: ?Sized> Clone for DocumentUserRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

#[async_trait]
impl<S> UserRepository for DocumentUserRepository<S>
where
    S: DocumentStore + ?Sized,
{
    async fn find_by_identity(
        &self,
        identity: &UserIdentity,
    ) -> Result<Option<User>, UserPersistenceError> {
        let name = serde_json::Value::from(identity.name().as_ref());
        let candidates = self
            .store
            .query_equals(Collection::Users, NAME, &name)
            .await
            .map_err(map_store_error)?;

        let department = identity.department().as_ref();
        candidates
            .iter()
            .find(|document| {
                document.get(DEPARTMENT).and_then(|value| value.as_str()) == Some(department)
            })
            .map(decode)
            .transpose()
    }

    async fn create_if_absent(
        &self,
        identity: &UserIdentity,
    ) -> Result<UserCreation, UserPersistenceError> {
        let record = records::identity_to_record(identity);
        let outcome = self
            .store
            .insert_if_absent(Collection::Users, USER_KEY, record.clone())
            .await
            .map_err(map_store_error)?;

        match outcome {
            UniqueInsert::Inserted(id) => decode(&StoredDocument { id, fields: record })
                .map(UserCreation::Created),
            UniqueInsert::Existing(document) => decode(&document).map(UserCreation::Existing),
        }
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        self.store
            .list_all(Collection::Users)
            .await
            .map_err(map_store_error)?
            .iter()
            .map(decode)
            .collect()
    }
}
