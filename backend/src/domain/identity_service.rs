//! Identity resolution service.
//!
//! Reconciles a claimed (name, department) pair with stored users. A pair is
//! written once, on first sight; afterwards the stored record is reused.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    IdentityResolution, UserCreation, UserPersistenceError, UserRepository,
};
use crate::domain::{Error, User, UserIdentity, UserValidationError};

pub(crate) fn map_user_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Decode { message } => {
            Error::internal(format!("stored user is unreadable: {message}"))
        }
    }
}

fn map_validation_error(error: &UserValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": error.field() }))
}

/// Service implementing [`IdentityResolution`] over a [`UserRepository`].
#[derive(Clone)]
pub struct IdentityService<R> {
    user_repo: Arc<R>,
}

impl<R> IdentityService<R> {
    pub fn new(user_repo: Arc<R>) -> Self {
        Self { user_repo }
    }
}

#[async_trait]
impl<R> IdentityResolution for IdentityService<R>
where
    R: UserRepository,
{
    async fn resolve(&self, name: &str, department: &str) -> Result<User, Error> {
        let identity = UserIdentity::try_from_parts(name, department)
            .map_err(|err| map_validation_error(&err))?;

        if let Some(user) = self
            .user_repo
            .find_by_identity(&identity)
            .await
            .map_err(map_user_repository_error)?
        {
            info!(user_id = %user.id(), "reusing stored identity");
            return Ok(user);
        }

        let creation = self
            .user_repo
            .create_if_absent(&identity)
            .await
            .map_err(map_user_repository_error)?;
        match &creation {
            UserCreation::Created(user) => info!(user_id = %user.id(), "created identity"),
            UserCreation::Existing(user) => {
                info!(user_id = %user.id(), "identity stored concurrently; reusing it");
            }
        }
        Ok(creation.into_user())
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
