//! Ticket entity, creation draft and raw submission payload.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Department, PersonName, SubmissionToken, User};

use super::{Description, IssueType, Priority, TicketStatus, TicketValidationError};

/// Opaque ticket identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TicketId(String);

impl TicketId {
    /// Validate and construct a [`TicketId`].
    pub fn new(id: impl Into<String>) -> Result<Self, TicketValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(TicketValidationError::EmptyId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for TicketId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<TicketId> for String {
    fn from(value: TicketId) -> Self {
        value.0
    }
}

impl TryFrom<String> for TicketId {
    type Error = TicketValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Raw ticket fields as typed by the requester.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketSubmission {
    pub issue_type: String,
    pub description: String,
    pub priority: Option<String>,
}

/// Validated ticket content, not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    requester_name: PersonName,
    department: Department,
    issue_type: IssueType,
    description: Description,
    priority: Option<Priority>,
}

impl TicketDraft {
    /// Build a draft from validated components.
    #[must_use]
    pub const fn new(
        requester_name: PersonName,
        department: Department,
        issue_type: IssueType,
        description: Description,
        priority: Option<Priority>,
    ) -> Self {
        Self {
            requester_name,
            department,
            issue_type,
            description,
            priority,
        }
    }

    /// Validate a raw submission for `requester`.
    ///
    /// Requester name and department are copied from the user; they are not
    /// re-resolved later. Fields are checked in the order issue type,
    /// description, priority.
    pub fn from_submission(
        requester: &User,
        submission: &TicketSubmission,
    ) -> Result<Self, TicketValidationError> {
        let issue_type: IssueType = submission.issue_type.parse()?;
        let description = Description::new(submission.description.as_str())?;
        let priority = Priority::parse_optional(submission.priority.as_deref())?;
        Ok(Self::new(
            requester.name().clone(),
            requester.department().clone(),
            issue_type,
            description,
            priority,
        ))
    }

    /// Requester name copied from the session user.
    #[must_use]
    pub const fn requester_name(&self) -> &PersonName {
        &self.requester_name
    }

    /// Department copied from the session user.
    #[must_use]
    pub const fn department(&self) -> &Department {
        &self.department
    }

    /// Issue category.
    #[must_use]
    pub const fn issue_type(&self) -> IssueType {
        self.issue_type
    }

    /// Problem description.
    #[must_use]
    pub const fn description(&self) -> &Description {
        &self.description
    }

    /// Optional priority.
    #[must_use]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }
}

/// Everything a repository needs to store a freshly opened ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub draft: TicketDraft,
    pub created_at: DateTime<Utc>,
    pub submission_token: Option<SubmissionToken>,
}

impl NewTicket {
    /// Materialize the stored ticket once the store assigned `id`.
    #[must_use]
    pub fn into_ticket(self, id: TicketId) -> Ticket {
        Ticket::restore(id, self.draft, TicketStatus::Open, self.created_at)
    }
}

/// A stored support ticket.
///
/// ## Invariants
/// - `created_at` never changes after creation.
/// - `status` only advances along `open -> in_progress -> closed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    id: TicketId,
    requester_name: PersonName,
    department: Department,
    issue_type: IssueType,
    description: Description,
    priority: Option<Priority>,
    status: TicketStatus,
    #[serde(rename = "date")]
    created_at: DateTime<Utc>,
}

impl Ticket {
    /// Rebuild a ticket from its stored parts.
    #[must_use]
    pub fn restore(
        id: TicketId,
        draft: TicketDraft,
        status: TicketStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        let TicketDraft {
            requester_name,
            department,
            issue_type,
            description,
            priority,
        } = draft;
        Self {
            id,
            requester_name,
            department,
            issue_type,
            description,
            priority,
            status,
            created_at,
        }
    }

    /// Store-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> &TicketId {
        &self.id
    }

    /// Name of the user who opened the ticket.
    #[must_use]
    pub const fn requester_name(&self) -> &PersonName {
        &self.requester_name
    }

    /// Department of the user who opened the ticket.
    #[must_use]
    pub const fn department(&self) -> &Department {
        &self.department
    }

    /// Issue category.
    #[must_use]
    pub const fn issue_type(&self) -> IssueType {
        self.issue_type
    }

    /// Problem description.
    #[must_use]
    pub const fn description(&self) -> &Description {
        &self.description
    }

    /// Optional priority.
    #[must_use]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TicketStatus {
        self.status
    }

    /// Creation instant.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[cfg(test)]
    pub(crate) fn with_status(&self, status: TicketStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}
