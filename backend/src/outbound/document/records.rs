//! JSON record codec for the `users` and `tickets` collections.
//!
//! Encoding always writes canonical labels. Decoding validates through the
//! domain constructors, so legacy labels are accepted and anything else
//! surfaces as a decode error instead of a half-built entity. Tickets written
//! without a `date` decode with the Unix epoch as their creation instant.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::domain::ports::{Document, StoredDocument};
use crate::domain::{
    Department, Description, IssueType, NewTicket, PersonName, Priority, Ticket, TicketDraft,
    TicketId, TicketStatus, TicketValidationError, User, UserId, UserIdentity, UserValidationError,
};

pub(super) const NAME: &str = "name";
pub(super) const DEPARTMENT: &str = "department";
pub(super) const REQUESTER_NAME: &str = "requesterName";
pub(super) const ISSUE_TYPE: &str = "issueType";
pub(super) const DESCRIPTION: &str = "description";
pub(super) const PRIORITY: &str = "priority";
pub(super) const STATUS: &str = "status";
pub(super) const DATE: &str = "date";
pub(super) const SUBMISSION_TOKEN: &str = "submissionToken";

/// Unique key of a user record.
pub(super) const USER_KEY: &[&str] = &[NAME, DEPARTMENT];
/// Unique key used for idempotent ticket creation; a token only replays for
/// the requester that first used it.
pub(super) const TICKET_TOKEN_KEY: &[&str] = &[SUBMISSION_TOKEN, REQUESTER_NAME, DEPARTMENT];

fn text(value: impl AsRef<str>) -> Value {
    Value::String(value.as_ref().to_owned())
}

fn required_text<'a>(
    document: &'a StoredDocument,
    field: &'static str,
) -> Result<&'a str, RecordShapeError> {
    match document.get(field) {
        Some(Value::String(value)) => Ok(value.as_str()),
        Some(other) => Err(RecordShapeError::NotText {
            field,
            found: other.clone(),
        }),
        None => Err(RecordShapeError::Missing { field }),
    }
}

fn optional_text<'a>(
    document: &'a StoredDocument,
    field: &'static str,
) -> Result<Option<&'a str>, RecordShapeError> {
    match document.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => required_text(document, field).map(Some),
    }
}

fn invalid(document: &StoredDocument, error: impl std::fmt::Display) -> String {
    format!("record {}: {error}", document.id)
}

pub(super) fn identity_to_record(identity: &UserIdentity) -> Document {
    Document::from_iter([
        (NAME.to_owned(), text(identity.name())),
        (DEPARTMENT.to_owned(), text(identity.department())),
    ])
}

pub(super) fn record_to_user(document: &StoredDocument) -> Result<User, String> {
    decode_user(document).map_err(|err| invalid(document, err))
}

fn decode_user(document: &StoredDocument) -> Result<User, DecodeFailure> {
    let id = UserId::new(document.id.as_ref())?;
    let identity = UserIdentity::try_from_parts(
        required_text(document, NAME)?,
        required_text(document, DEPARTMENT)?,
    )?;
    Ok(User::new(id, identity))
}

pub(super) fn new_ticket_to_record(ticket: &NewTicket) -> Document {
    let draft = &ticket.draft;
    let mut record = Document::from_iter([
        (REQUESTER_NAME.to_owned(), text(draft.requester_name())),
        (DEPARTMENT.to_owned(), text(draft.department())),
        (ISSUE_TYPE.to_owned(), text(draft.issue_type().as_str())),
        (DESCRIPTION.to_owned(), text(draft.description())),
        (
            PRIORITY.to_owned(),
            draft.priority().map_or(Value::Null, |p| text(p.as_str())),
        ),
        (STATUS.to_owned(), text(TicketStatus::Open.as_str())),
        (DATE.to_owned(), text(format_date(ticket.created_at))),
    ]);
    if let Some(token) = &ticket.submission_token {
        record.insert(SUBMISSION_TOKEN.to_owned(), text(token));
    }
    record
}

pub(super) fn status_patch(status: TicketStatus) -> Document {
    Document::from_iter([(STATUS.to_owned(), text(status.as_str()))])
}

pub(super) fn record_to_ticket(document: &StoredDocument) -> Result<Ticket, String> {
    decode_ticket(document).map_err(|err| invalid(document, err))
}

fn decode_ticket(document: &StoredDocument) -> Result<Ticket, DecodeFailure> {
    let id = TicketId::new(document.id.as_ref())?;
    let requester_name = PersonName::new(required_text(document, REQUESTER_NAME)?)?;
    let department = Department::new(required_text(document, DEPARTMENT)?)?;
    let issue_type: IssueType = required_text(document, ISSUE_TYPE)?.parse()?;
    let description = Description::new(required_text(document, DESCRIPTION)?)?;
    let priority = Priority::parse_optional(optional_text(document, PRIORITY)?)?;
    let status: TicketStatus = required_text(document, STATUS)?.parse()?;
    let created_at = optional_text(document, DATE)?
        .map(parse_date)
        .transpose()?
        .unwrap_or(DateTime::UNIX_EPOCH);

    let draft = TicketDraft::new(requester_name, department, issue_type, description, priority);
    Ok(Ticket::restore(id, draft, status, created_at))
}

fn format_date(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, TicketValidationError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|_| TicketValidationError::MalformedDate {
            value: raw.to_owned(),
        })
}

/// Field-level problems with the raw JSON record.
#[derive(Debug, thiserror::Error)]
enum RecordShapeError {
    #[error("missing field {field}")]
    Missing { field: &'static str },
    #[error("field {field} is not text ({found})")]
    NotText { field: &'static str, found: Value },
}

/// Any reason a stored record cannot be rebuilt.
#[derive(Debug, thiserror::Error)]
enum DecodeFailure {
    #[error(transparent)]
    Shape(#[from] RecordShapeError),
    #[error("{field}: {0}", field = .0.field())]
    Ticket(#[from] TicketValidationError),
    #[error("{field}: {0}", field = .0.field())]
    User(#[from] UserValidationError),
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::ports::DocumentId;
    use crate::domain::{SubmissionToken, TicketSubmission};

    fn stored(id: &str, fields: Value) -> StoredDocument {
        let Value::Object(fields) = fields else {
            panic!("fixture must be an object");
        };
        StoredDocument {
            id: DocumentId::new(id),
            fields,
        }
    }

    fn legacy_ticket(priority: Value, issue_type: &str) -> StoredDocument {
        stored(
            "t-legacy",
            json!({
                "requesterName": "Ana",
                "department": "Vendas",
                "issueType": issue_type,
                "description": "Sem internet",
                "priority": priority,
                "status": "open",
                "date": "2025-11-03T12:00:00.000Z",
            }),
        )
    }

    #[rstest]
    #[case(json!("Alta"), "Rede", Some(Priority::High), IssueType::Network)]
    #[case(json!("Média"), "Outro", Some(Priority::Medium), IssueType::Other)]
    #[case(json!("Baixa"), "Software", Some(Priority::Low), IssueType::Software)]
    #[case(json!(""), "Hardware", None, IssueType::Hardware)]
    #[case(Value::Null, "Network", None, IssueType::Network)]
    fn decodes_legacy_labels(
        #[case] priority: Value,
        #[case] issue_type: &str,
        #[case] expected_priority: Option<Priority>,
        #[case] expected_issue: IssueType,
    ) {
        let ticket = record_to_ticket(&legacy_ticket(priority, issue_type)).expect("decodes");
        assert_eq!(ticket.priority(), expected_priority);
        assert_eq!(ticket.issue_type(), expected_issue);
        assert_eq!(
            ticket.created_at(),
            Utc.with_ymd_and_hms(2025, 11, 3, 12, 0, 0).single().expect("instant")
        );
    }

    #[rstest]
    fn missing_priority_field_is_absence() {
        let mut document = legacy_ticket(Value::Null, "Software");
        document.fields.remove(PRIORITY);
        assert_eq!(record_to_ticket(&document).expect("decodes").priority(), None);
    }

    #[rstest]
    fn tickets_written_without_a_date_decode_at_the_epoch() {
        let mut document = legacy_ticket(json!("Alta"), "Rede");
        document.fields.remove(DATE);

        let ticket = record_to_ticket(&document).expect("decodes");
        assert_eq!(ticket.created_at(), DateTime::UNIX_EPOCH);
        assert_eq!(ticket.priority(), Some(Priority::High));
    }

    #[rstest]
    fn non_text_fields_are_reported_with_their_value() {
        let mut document = legacy_ticket(json!("Alta"), "Rede");
        document.fields.insert(REQUESTER_NAME.to_owned(), json!(7));
        let err = record_to_ticket(&document).expect_err("undecodable");
        assert!(err.contains("field requesterName is not text (7)"), "{err}");
    }

    #[rstest]
    #[case(STATUS, json!("reopened"), "status")]
    #[case(DATE, json!("yesterday"), "date")]
    #[case(ISSUE_TYPE, json!("Printer"), "issueType")]
    #[case(DESCRIPTION, json!(42), "description")]
    fn undecodable_tickets_name_the_field(
        #[case] field: &str,
        #[case] value: Value,
        #[case] mentioned: &str,
    ) {
        let mut document = legacy_ticket(json!("Alta"), "Rede");
        document.fields.insert(field.to_owned(), value);
        let err = record_to_ticket(&document).expect_err("undecodable");
        assert!(err.contains("t-legacy"), "{err}");
        assert!(err.contains(mentioned), "{err}");
    }

    #[rstest]
    fn new_ticket_record_uses_canonical_labels() {
        let user = User::try_from_strings("u-1", "Ana", "Vendas").expect("user");
        let draft = TicketDraft::from_submission(
            &user,
            &TicketSubmission {
                issue_type: "Rede".to_owned(),
                description: "Sem internet".to_owned(),
                priority: Some("Alta".to_owned()),
            },
        )
        .expect("draft");
        let token = SubmissionToken::random();
        let new_ticket = NewTicket {
            draft,
            created_at: Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).single().expect("instant"),
            submission_token: Some(token.clone()),
        };

        let record = Value::Object(new_ticket_to_record(&new_ticket));
        assert_eq!(
            record,
            json!({
                "requesterName": "Ana",
                "department": "Vendas",
                "issueType": "Network",
                "description": "Sem internet",
                "priority": "high",
                "status": "open",
                "date": "2026-02-01T09:00:00Z",
                "submissionToken": token.to_string(),
            })
        );
    }

    #[rstest]
    fn user_records_keep_fields_verbatim() {
        let identity = UserIdentity::try_from_parts(" Ana ", "TI").expect("identity");
        let record = identity_to_record(&identity);
        let user = record_to_user(&StoredDocument {
            id: DocumentId::new("u-9"),
            fields: record,
        })
        .expect("decodes");
        assert_eq!(user.name().as_ref(), " Ana ");
        assert_eq!(user.department().as_ref(), "TI");
    }

    #[rstest]
    fn user_records_require_both_fields() {
        let err = record_to_user(&stored("u-1", json!({ "name": "Ana" }))).expect_err("missing");
        assert!(err.contains("department"), "{err}");
    }
}
