//! Duplicate-action guard for mutating endpoints.
//!
//! A handler claims a key for the action it is about to perform and holds the
//! returned [`InFlightGuard`] until the domain call settles. A second request
//! claiming the same key meanwhile is rejected with `409 Conflict`.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::domain::{Error, TicketId, UserId};

/// An action that must not run twice at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InFlightAction {
    /// Login for a claimed (name, department) pair.
    Login { name: String, department: String },
    /// Ticket submission by one user.
    Submission(UserId),
    /// Status change of one ticket.
    Transition(TicketId),
}

impl fmt::Display for InFlightAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login { name, department } => write!(f, "login {name}@{department}"),
            Self::Submission(user) => write!(f, "submission by {user}"),
            Self::Transition(ticket) => write!(f, "transition of {ticket}"),
        }
    }
}

type Claims = HashSet<InFlightAction>;

fn lock(claims: &Mutex<Claims>) -> MutexGuard<'_, Claims> {
    // The set holds plain keys; a panic mid-update cannot leave it torn.
    claims.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registry of actions currently being processed.
#[derive(Debug, Clone, Default)]
pub struct InFlightRequests {
    claims: Arc<Mutex<Claims>>,
}

impl InFlightRequests {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `action`, failing with a conflict when it is already running.
    ///
    /// # Examples
    /// ```
    /// use helpdesk::inbound::http::in_flight::{InFlightAction, InFlightRequests};
    /// use helpdesk::domain::TicketId;
    ///
    /// let registry = InFlightRequests::new();
    /// let action = InFlightAction::Transition(TicketId::new("t-1").expect("id"));
    /// let guard = registry.claim(action.clone()).expect("first claim");
    /// assert!(registry.claim(action.clone()).is_err());
    /// drop(guard);
    /// assert!(registry.claim(action).is_ok());
    /// ```
    pub fn claim(&self, action: InFlightAction) -> Result<InFlightGuard, Error> {
        if !lock(&self.claims).insert(action.clone()) {
            warn!(%action, "rejecting duplicate in-flight action");
            return Err(Error::conflict(format!("{action} is already in progress")));
        }
        debug!(%action, "action claimed");
        Ok(InFlightGuard {
            claims: Arc::clone(&self.claims),
            action,
        })
    }

    /// Whether `action` is currently claimed.
    #[must_use]
    pub fn is_claimed(&self, action: &InFlightAction) -> bool {
        lock(&self.claims).contains(action)
    }
}

/// Releases its claim when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    claims: Arc<Mutex<Claims>>,
    action: InFlightAction,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock(&self.claims).remove(&self.action);
    }
}
