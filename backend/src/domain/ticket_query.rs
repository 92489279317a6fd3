//! Pure filtering and ordering over fetched tickets.
//!
//! Nothing here touches the store. The technician queue applies
//! [`list`] to every stored ticket; the requester views use the scoped
//! predicates and keep store order.

use std::fmt;
use std::str::FromStr;

use crate::domain::{Department, PersonName, Priority, Ticket, TicketStatus};

/// Wire value meaning "no filter".
pub const ALL_FILTER: &str = "all";

/// Errors raised when a filter value is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValidationError {
    UnknownStatus { value: String },
    UnknownPriority { value: String },
}

impl FilterValidationError {
    /// Query parameter the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::UnknownStatus { .. } => "status",
            Self::UnknownPriority { .. } => "priority",
        }
    }
}

impl fmt::Display for FilterValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownStatus { value } => write!(
                f,
                "status filter must be all, open, in_progress or closed (got {value:?})"
            ),
            Self::UnknownPriority { value } => write!(
                f,
                "priority filter must be all, high, medium or low (got {value:?})"
            ),
        }
    }
}

impl std::error::Error for FilterValidationError {}

/// Status filter: everything or exactly one status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TicketStatus),
}

impl StatusFilter {
    #[must_use]
    pub fn accepts(self, status: TicketStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = FilterValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_FILTER {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only).map_err(|_| {
            FilterValidationError::UnknownStatus {
                value: s.to_owned(),
            }
        })
    }
}

/// Priority filter: everything or exactly one priority.
///
/// A concrete filter never accepts a ticket without a priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    #[must_use]
    pub fn accepts(self, priority: Option<Priority>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => priority == Some(wanted),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = FilterValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || FilterValidationError::UnknownPriority {
            value: s.to_owned(),
        };
        match s {
            ALL_FILTER => Ok(Self::All),
            "high" => Ok(Self::Only(Priority::High)),
            "medium" => Ok(Self::Only(Priority::Medium)),
            "low" => Ok(Self::Only(Priority::Low)),
            _ => Err(unknown()),
        }
    }
}

/// Both queue filters, combined with AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicketFilter {
    pub status: StatusFilter,
    pub priority: PriorityFilter,
}

impl TicketFilter {
    /// Parse optional query values; a missing value means `all`.
    ///
    /// # Examples
    /// ```
    /// use helpdesk::domain::{PriorityFilter, StatusFilter, TicketFilter, TicketStatus};
    ///
    /// let filter = TicketFilter::parse(Some("open"), None).expect("known values");
    /// assert_eq!(filter.status, StatusFilter::Only(TicketStatus::Open));
    /// assert_eq!(filter.priority, PriorityFilter::All);
    /// ```
    pub fn parse(
        status: Option<&str>,
        priority: Option<&str>,
    ) -> Result<Self, FilterValidationError> {
        let status = status.map_or(Ok(StatusFilter::All), str::parse)?;
        let priority = priority.map_or(Ok(PriorityFilter::All), str::parse)?;
        Ok(Self { status, priority })
    }

    #[must_use]
    pub fn accepts(&self, ticket: &Ticket) -> bool {
        self.status.accepts(ticket.status()) && self.priority.accepts(ticket.priority())
    }
}

/// Filter `tickets` and order them by priority rank.
///
/// The sort is stable: tickets of equal rank keep their input order, and
/// tickets without a priority come last.
#[must_use]
pub fn list(tickets: &[Ticket], filter: &TicketFilter) -> Vec<Ticket> {
    let mut selected: Vec<Ticket> = tickets
        .iter()
        .filter(|ticket| filter.accepts(ticket))
        .cloned()
        .collect();
    selected.sort_by(|left, right| Priority::cmp_optional(left.priority(), right.priority()));
    selected
}

/// "My tickets": raised under `name`, literal comparison.
#[must_use]
pub fn raised_by(ticket: &Ticket, name: &PersonName) -> bool {
    ticket.requester_name() == name
}

/// "My department's tickets": raised from `department`, literal comparison.
#[must_use]
pub fn raised_in(ticket: &Ticket, department: &Department) -> bool {
    ticket.department() == department
}
