//! Support ticket domain types.
//!
//! A ticket is raised by a requester on behalf of their department, starts in
//! [`TicketStatus::Open`] and only ever moves forward through
//! `open -> in_progress -> closed`.

use std::fmt;

mod entity;
mod fields;
mod status;

pub use entity::{NewTicket, Ticket, TicketDraft, TicketId, TicketSubmission};
pub use fields::{Description, IssueType, Priority};
pub use status::{InvalidTransition, TicketStatus};

/// Validation errors raised while building tickets from raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketValidationError {
    EmptyId,
    EmptyIssueType,
    UnknownIssueType { value: String },
    EmptyDescription,
    UnknownPriority { value: String },
    UnknownStatus { value: String },
    MalformedDate { value: String },
}

impl TicketValidationError {
    /// Name of the ticket field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyId => "id",
            Self::EmptyIssueType | Self::UnknownIssueType { .. } => "issueType",
            Self::EmptyDescription => "description",
            Self::UnknownPriority { .. } => "priority",
            Self::UnknownStatus { .. } => "status",
            Self::MalformedDate { .. } => "date",
        }
    }
}

impl fmt::Display for TicketValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "ticket id must not be empty"),
            Self::EmptyIssueType => write!(f, "issue type is required"),
            Self::UnknownIssueType { value } => write!(
                f,
                "issue type must be one of Software, Hardware, Network or Other (got {value:?})"
            ),
            Self::EmptyDescription => write!(f, "description is required"),
            Self::UnknownPriority { value } => {
                write!(f, "priority must be high, medium or low (got {value:?})")
            }
            Self::UnknownStatus { value } => {
                write!(f, "status must be open, in_progress or closed (got {value:?})")
            }
            Self::MalformedDate { value } => {
                write!(f, "ticket date must be an RFC 3339 timestamp (got {value:?})")
            }
        }
    }
}

impl std::error::Error for TicketValidationError {}
