//! Tests for the ticket command and query services.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockTicketRepository;
use crate::domain::{ErrorCode, Priority, User};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 11, 14, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn command_service(repo: MockTicketRepository) -> TicketCommandService<MockTicketRepository> {
    TicketCommandService::new(
        Arc::new(repo),
        Arc::new(FixtureClock {
            utc_now: fixture_timestamp(),
        }),
    )
}

fn stored_ticket(id: &str, status: TicketStatus, priority: Option<Priority>) -> Ticket {
    let user = User::try_from_strings("u-1", "Ana", "Vendas").expect("user");
    let draft = TicketDraft::from_submission(
        &user,
        &TicketSubmission {
            issue_type: "Software".to_owned(),
            description: "Excel trava".to_owned(),
            priority: priority.map(|p| p.as_str().to_owned()),
        },
    )
    .expect("draft");
    Ticket::restore(
        TicketId::new(id).expect("ticket id"),
        draft,
        status,
        fixture_timestamp(),
    )
}

#[fixture]
fn session() -> Session {
    Session::for_user(User::try_from_strings("u-1", "Ana", "Vendas").expect("user"))
}

fn submission() -> TicketSubmission {
    TicketSubmission {
        issue_type: "Hardware".to_owned(),
        description: "PC não liga".to_owned(),
        priority: None,
    }
}

#[rstest]
#[tokio::test]
async fn create_opens_ticket_with_clock_time(session: Session) {
    let mut repo = MockTicketRepository::new();
    repo.expect_insert()
        .withf(|new_ticket| {
            new_ticket.created_at == fixture_timestamp()
                && new_ticket.draft.requester_name().as_ref() == "Ana"
                && new_ticket.draft.department().as_ref() == "Vendas"
                && new_ticket.submission_token.is_none()
        })
        .times(1)
        .return_once(|new_ticket| {
            Ok(TicketInsertion::Created(
                new_ticket.clone().into_ticket(TicketId::new("t-1").expect("id")),
            ))
        });

    let receipt = command_service(repo)
        .create(&session, submission(), None)
        .await
        .expect("ticket created");

    assert!(!receipt.replayed);
    assert_eq!(receipt.ticket.status(), TicketStatus::Open);
    assert_eq!(receipt.ticket.priority(), None);
    assert_eq!(receipt.ticket.created_at(), fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn create_reports_token_replay(session: Session) {
    let token = SubmissionToken::random();
    let expected_token = token.clone();
    let original = stored_ticket("t-7", TicketStatus::InProgress, None);
    let returned = original.clone();
    let mut repo = MockTicketRepository::new();
    repo.expect_insert()
        .withf(move |new_ticket| new_ticket.submission_token.as_ref() == Some(&expected_token))
        .times(1)
        .return_once(move |_| Ok(TicketInsertion::Replayed(returned)));

    let receipt = command_service(repo)
        .create(&session, submission(), Some(token))
        .await
        .expect("replayed");

    assert!(receipt.replayed);
    assert_eq!(receipt.ticket, original);
}

#[rstest]
#[case(TicketSubmission { issue_type: String::new(), ..submission() }, "issueType")]
#[case(TicketSubmission { description: "  ".to_owned(), ..submission() }, "description")]
#[case(TicketSubmission { priority: Some("urgent".to_owned()), ..submission() }, "priority")]
#[tokio::test]
async fn create_rejects_invalid_submission_without_writing(
    session: Session,
    #[case] raw: TicketSubmission,
    #[case] field: &str,
) {
    let mut repo = MockTicketRepository::new();
    repo.expect_insert().never();

    let err = command_service(repo)
        .create(&session, raw, None)
        .await
        .expect_err("invalid");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details().and_then(|d| d.get("field")).and_then(|v| v.as_str()),
        Some(field)
    );
}

#[tokio::test]
async fn create_requires_a_session() {
    let mut repo = MockTicketRepository::new();
    repo.expect_insert().never();

    let err = command_service(repo)
        .create(&Session::default(), submission(), None)
        .await
        .expect_err("no session");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[case(TicketStatus::Open, TicketStatus::InProgress)]
#[case(TicketStatus::InProgress, TicketStatus::Closed)]
#[tokio::test]
async fn transition_applies_legal_edges(#[case] from: TicketStatus, #[case] to: TicketStatus) {
    let current = stored_ticket("t-1", from, None);
    let updated = current.with_status(to);
    let mut repo = MockTicketRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(current)));
    repo.expect_update_status_if()
        .withf(move |id, expected, next| id.as_ref() == "t-1" && *expected == from && *next == to)
        .times(1)
        .return_once(move |_, _, _| Ok(StatusUpdate::Applied(updated)));

    let ticket = command_service(repo)
        .transition(&TicketId::new("t-1").expect("id"), to)
        .await
        .expect("transition applied");
    assert_eq!(ticket.status(), to);
}

#[rstest]
#[case(TicketStatus::Open, TicketStatus::Open)]
#[case(TicketStatus::Open, TicketStatus::Closed)]
#[case(TicketStatus::InProgress, TicketStatus::Open)]
#[case(TicketStatus::Closed, TicketStatus::InProgress)]
#[case(TicketStatus::Closed, TicketStatus::Closed)]
#[tokio::test]
async fn transition_rejects_illegal_edges_without_writing(
    #[case] from: TicketStatus,
    #[case] to: TicketStatus,
) {
    let current = stored_ticket("t-1", from, None);
    let mut repo = MockTicketRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(current)));
    repo.expect_update_status_if().never();

    let err = command_service(repo)
        .transition(&TicketId::new("t-1").expect("id"), to)
        .await
        .expect_err("illegal");

    assert_eq!(err.code(), ErrorCode::InvalidTransition);
    let details = err.details().expect("details");
    assert_eq!(details["from"], from.as_str());
    assert_eq!(details["to"], to.as_str());
}

#[tokio::test]
async fn transition_reports_lost_race_as_invalid_transition() {
    let current = stored_ticket("t-1", TicketStatus::Open, None);
    let raced = current.with_status(TicketStatus::InProgress);
    let mut repo = MockTicketRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(current)));
    repo.expect_update_status_if()
        .return_once(move |_, _, _| Ok(StatusUpdate::Stale(raced)));

    let err = command_service(repo)
        .transition(&TicketId::new("t-1").expect("id"), TicketStatus::InProgress)
        .await
        .expect_err("lost race");

    assert_eq!(err.code(), ErrorCode::InvalidTransition);
    assert_eq!(err.details().expect("details")["from"], "in_progress");
}

#[rstest]
#[case(None, false)]
#[case(Some(()), true)]
#[tokio::test]
async fn transition_reports_missing_tickets(#[case] found: Option<()>, #[case] vanished: bool) {
    let current = found.map(|()| stored_ticket("t-1", TicketStatus::Open, None));
    let mut repo = MockTicketRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(current));
    if vanished {
        repo.expect_update_status_if()
            .return_once(|_, _, _| Ok(StatusUpdate::Missing));
    } else {
        repo.expect_update_status_if().never();
    }

    let err = command_service(repo)
        .transition(&TicketId::new("t-1").expect("id"), TicketStatus::InProgress)
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn transition_surfaces_unavailable_store() {
    let mut repo = MockTicketRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Err(TicketPersistenceError::connection("timed out")));

    let err = command_service(repo)
        .transition(&TicketId::new("t-1").expect("id"), TicketStatus::InProgress)
        .await
        .expect_err("unavailable");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn queue_filters_and_sorts_fetched_tickets() {
    let mut repo = MockTicketRepository::new();
    repo.expect_list_all().times(1).return_once(|| {
        Ok(vec![
            stored_ticket("low", TicketStatus::Open, Some(Priority::Low)),
            stored_ticket("none", TicketStatus::Open, None),
            stored_ticket("high", TicketStatus::Open, Some(Priority::High)),
            stored_ticket("done", TicketStatus::Closed, Some(Priority::High)),
        ])
    });
    let service = TicketQueryService::new(Arc::new(repo));
    let filter = TicketFilter::parse(Some("open"), None).expect("filter");

    let queue = service.queue(filter).await.expect("queue");
    let ids: Vec<&str> = queue.iter().map(|t| t.id().as_ref()).collect();
    assert_eq!(ids, vec!["high", "low", "none"]);
}

#[rstest]
#[tokio::test]
async fn scoped_queries_use_session_user(session: Session) {
    let mut repo = MockTicketRepository::new();
    repo.expect_list_by_requester()
        .withf(|name| name.as_ref() == "Ana")
        .times(1)
        .return_once(|_| Ok(vec![stored_ticket("mine", TicketStatus::Open, None)]));
    repo.expect_list_by_department()
        .withf(|department| department.as_ref() == "Vendas")
        .times(1)
        .return_once(|_| Ok(Vec::new()));
    let service = TicketQueryService::new(Arc::new(repo));

    assert_eq!(service.mine(&session).await.expect("mine").len(), 1);
    assert!(service.department(&session).await.expect("department").is_empty());
}

#[tokio::test]
async fn scoped_queries_require_a_session() {
    let mut repo = MockTicketRepository::new();
    repo.expect_list_by_requester().never();
    repo.expect_list_by_department().never();
    let service = TicketQueryService::new(Arc::new(repo));

    let mine = service.mine(&Session::default()).await.expect_err("no session");
    let department = service
        .department(&Session::default())
        .await
        .expect_err("no session");
    assert_eq!(mine.code(), ErrorCode::Unauthorized);
    assert_eq!(department.code(), ErrorCode::Unauthorized);
}
