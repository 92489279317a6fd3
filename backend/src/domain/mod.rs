//! Domain primitives, aggregates and services.
//!
//! Purpose: define the helpdesk model (users, tickets, the session) together
//! with the lifecycle, query and deduplication rules that act on it. Nothing
//! in here knows about HTTP or about how records are stored; the
//! [`ports`] module declares those boundaries.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: error payload shared by every layer.
//! - [`User`], [`UserIdentity`], [`Workspace`]: self-asserted identity.
//! - [`Ticket`], [`TicketStatus`], [`Priority`], [`IssueType`]: tickets.
//! - [`Session`]: at most one acting user.
//! - [`TicketFilter`] and [`ticket_query::list`]: queue filtering/ordering.
//! - [`IdentityService`], [`TicketCommandService`], [`TicketQueryService`]:
//!   driving port implementations.

pub mod error;
mod identity_service;
pub mod ports;
mod session;
mod submission_token;
pub mod ticket;
pub mod ticket_query;
mod ticket_service;
mod trace_id;
pub mod user;

pub use self::error::{Error, ErrorCode};
pub use self::identity_service::IdentityService;
pub use self::session::Session;
pub use self::submission_token::{SubmissionToken, SubmissionTokenValidationError};
pub use self::ticket::{
    Description, InvalidTransition, IssueType, NewTicket, Priority, Ticket, TicketDraft, TicketId,
    TicketStatus, TicketSubmission, TicketValidationError,
};
pub use self::ticket_query::{FilterValidationError, PriorityFilter, StatusFilter, TicketFilter};
pub use self::ticket_service::{TicketCommandService, TicketQueryService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Department, PersonName, TECHNICIAN_DEPARTMENT, User, UserId, UserIdentity,
    UserValidationError, Workspace,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use helpdesk::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::unauthorized("login required"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
