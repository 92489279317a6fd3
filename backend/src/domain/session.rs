//! Acting-user session.
//!
//! A [`Session`] holds at most one resolved [`User`]. It is an explicit value
//! handed to the ticket operations rather than ambient state; the HTTP layer
//! rebuilds it from the session cookie on every request.

use crate::domain::{Error, User, Workspace};

/// At most one established user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    /// Session already established for `user`.
    #[must_use]
    pub const fn for_user(user: User) -> Self {
        Self { user: Some(user) }
    }

    /// Make `user` the acting user, replacing any previous one.
    pub fn establish(&mut self, user: User) {
        self.user = Some(user);
    }

    /// Log out, returning the user that was acting.
    pub fn clear(&mut self) -> Option<User> {
        self.user.take()
    }

    /// The acting user, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The acting user or an `unauthorized` error.
    ///
    /// # Examples
    /// ```
    /// use helpdesk::domain::{ErrorCode, Session};
    ///
    /// let session = Session::default();
    /// let err = session.require_user().unwrap_err();
    /// assert_eq!(err.code(), ErrorCode::Unauthorized);
    /// ```
    pub fn require_user(&self) -> Result<&User, Error> {
        self.current()
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Landing workspace of the acting user.
    #[must_use]
    pub fn workspace(&self) -> Option<Workspace> {
        self.current().map(User::workspace)
    }
}
