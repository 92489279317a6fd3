//! Driving port for turning a claimed name and department into a user.
//!
//! Inbound adapters call this port on login. Identity is self-asserted: no
//! credential is checked, the pair is only reconciled with stored users.

use async_trait::async_trait;

use crate::domain::{Error, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolution: Send + Sync {
    /// Return the stored user for (`name`, `department`), creating it on
    /// first sight.
    async fn resolve(&self, name: &str, department: &str) -> Result<User, Error>;
}
