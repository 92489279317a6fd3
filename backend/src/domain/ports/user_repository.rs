//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{User, UserIdentity};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established or timed out.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A stored record could not be read back as a user.
        Decode { message: String } => "user record could not be decoded: {message}",
    }
}

/// Result of [`UserRepository::create_if_absent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCreation {
    /// This call wrote the record.
    Created(User),
    /// Another writer stored the same identity first.
    Existing(User),
}

impl UserCreation {
    #[must_use]
    pub fn into_user(self) -> User {
        match self {
            Self::Created(user) | Self::Existing(user) => user,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch the user whose name and department literally equal `identity`.
    async fn find_by_identity(
        &self,
        identity: &UserIdentity,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Atomically store `identity` unless it is already present.
    async fn create_if_absent(
        &self,
        identity: &UserIdentity,
    ) -> Result<UserCreation, UserPersistenceError>;

    /// Every stored user in insertion order.
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError>;
}
