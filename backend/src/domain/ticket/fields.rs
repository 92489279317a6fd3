//! Ticket field vocabularies: issue type, priority and description.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TicketValidationError;

/// Category of the reported problem.
///
/// Stored as plain text. The canonical labels are the English ones; the
/// localized labels written by earlier front ends (`Rede`, `Outro`) are
/// accepted when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IssueType {
    Software,
    Hardware,
    Network,
    Other,
}

impl IssueType {
    /// Every issue type in display order.
    pub const ALL: [Self; 4] = [Self::Software, Self::Hardware, Self::Network, Self::Other];

    /// Canonical stored label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Software => "Software",
            Self::Hardware => "Hardware",
            Self::Network => "Network",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = TicketValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Software" => Ok(Self::Software),
            "Hardware" => Ok(Self::Hardware),
            "Network" | "Rede" => Ok(Self::Network),
            "Other" | "Outro" => Ok(Self::Other),
            blank if blank.trim().is_empty() => Err(TicketValidationError::EmptyIssueType),
            other => Err(TicketValidationError::UnknownIssueType {
                value: other.to_owned(),
            }),
        }
    }
}

impl From<IssueType> for String {
    fn from(value: IssueType) -> Self {
        value.as_str().to_owned()
    }
}

impl TryFrom<String> for IssueType {
    type Error = TicketValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Ticket urgency.
///
/// Priorities order by [`Priority::rank`]: `High < Medium < Low`. A ticket
/// without a priority ranks after all three (see [`Priority::rank_of`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Rank assigned to tickets that carry no priority.
pub const ABSENT_PRIORITY_RANK: u8 = 4;

impl Priority {
    /// Canonical stored label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Sort rank: high(1), medium(2), low(3).
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// Sort rank of an optional priority; absence ranks last.
    ///
    /// # Examples
    /// ```
    /// use helpdesk::domain::Priority;
    ///
    /// assert!(Priority::rank_of(Some(Priority::Low)) < Priority::rank_of(None));
    /// ```
    #[must_use]
    pub const fn rank_of(priority: Option<Self>) -> u8 {
        match priority {
            Some(priority) => priority.rank(),
            None => ABSENT_PRIORITY_RANK,
        }
    }

    /// Parse an optional priority label; a missing or blank label is absence.
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<Self>, TicketValidationError> {
        match raw {
            None => Ok(None),
            Some(label) if label.trim().is_empty() => Ok(None),
            Some(label) => label.parse().map(Some),
        }
    }

    /// Compare two optional priorities under the queue order.
    #[must_use]
    pub fn cmp_optional(left: Option<Self>, right: Option<Self>) -> Ordering {
        Self::rank_of(left).cmp(&Self::rank_of(right))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TicketValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" | "Alta" => Ok(Self::High),
            "medium" | "Média" | "Media" => Ok(Self::Medium),
            "low" | "Baixa" => Ok(Self::Low),
            other => Err(TicketValidationError::UnknownPriority {
                value: other.to_owned(),
            }),
        }
    }
}

impl From<Priority> for String {
    fn from(value: Priority) -> Self {
        value.as_str().to_owned()
    }
}

impl TryFrom<String> for Priority {
    type Error = TicketValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Free-text problem description, non-blank, stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Description(String);

impl Description {
    /// Validate and construct a [`Description`].
    pub fn new(description: impl Into<String>) -> Result<Self, TicketValidationError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(TicketValidationError::EmptyDescription);
        }
        Ok(Self(description))
    }
}

impl AsRef<str> for Description {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Description> for String {
    fn from(value: Description) -> Self {
        value.0
    }
}

impl TryFrom<String> for Description {
    type Error = TicketValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
