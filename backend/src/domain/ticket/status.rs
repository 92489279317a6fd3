//! Ticket status state machine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TicketValidationError;

/// Lifecycle status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TicketStatus {
    Open,
    InProgress,
    Closed,
}

impl TicketStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Open, Self::InProgress, Self::Closed];

    /// Stored wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
        }
    }

    /// The only status reachable from `self`, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Open => Some(Self::InProgress),
            Self::InProgress => Some(Self::Closed),
            Self::Closed => None,
        }
    }

    /// Validate a move from `self` to `to`.
    ///
    /// Legal edges are `open -> in_progress` and `in_progress -> closed`.
    /// Self-transitions, reversals and skips are rejected.
    ///
    /// # Examples
    /// ```
    /// use helpdesk::domain::TicketStatus;
    ///
    /// assert!(TicketStatus::Open.transition_to(TicketStatus::InProgress).is_ok());
    /// assert!(TicketStatus::Open.transition_to(TicketStatus::Closed).is_err());
    /// ```
    pub fn transition_to(self, to: Self) -> Result<Self, InvalidTransition> {
        if self.next() == Some(to) {
            Ok(to)
        } else {
            Err(InvalidTransition { from: self, to })
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = TicketValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "closed" => Ok(Self::Closed),
            other => Err(TicketValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

impl From<TicketStatus> for String {
    fn from(value: TicketStatus) -> Self {
        value.as_str().to_owned()
    }
}

impl TryFrom<String> for TicketStatus {
    type Error = TicketValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A requested status change that is not a legal lifecycle edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: TicketStatus,
    pub to: TicketStatus,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.from.next() {
            Some(next) => write!(
                f,
                "ticket in status {} can only move to {next}, not {}",
                self.from, self.to
            ),
            None => write!(f, "ticket in status {} cannot change status", self.from),
        }
    }
}

impl std::error::Error for InvalidTransition {}
