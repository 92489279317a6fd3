//! Tests for the identity resolution service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockUserRepository;

fn make_service(repo: MockUserRepository) -> IdentityService<MockUserRepository> {
    IdentityService::new(Arc::new(repo))
}

fn stored(id: &str, name: &str, department: &str) -> User {
    User::try_from_strings(id, name, department).expect("valid user")
}

#[tokio::test]
async fn resolve_reuses_existing_record() {
    let existing = stored("u-1", "Ana", "Vendas");
    let returned = existing.clone();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_identity()
        .withf(|identity| identity.name().as_ref() == "Ana" && identity.department().as_ref() == "Vendas")
        .times(1)
        .return_once(move |_| Ok(Some(returned)));
    repo.expect_create_if_absent().never();

    let user = make_service(repo)
        .resolve("Ana", "Vendas")
        .await
        .expect("resolved");
    assert_eq!(user, existing);
}

#[tokio::test]
async fn resolve_creates_on_first_sight() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_identity()
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_create_if_absent()
        .times(1)
        .return_once(|identity| Ok(UserCreation::Created(User::new(
            crate::domain::UserId::new("u-new").expect("id"),
            identity.clone(),
        ))));

    let user = make_service(repo)
        .resolve("Carlos", "TI")
        .await
        .expect("resolved");
    assert_eq!(user.id().as_ref(), "u-new");
    assert_eq!(user.department().as_ref(), "TI");
}

#[tokio::test]
async fn resolve_returns_winner_of_concurrent_creation() {
    let winner = stored("u-first", "Ana", "Vendas");
    let returned = winner.clone();
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_identity().return_once(|_| Ok(None));
    repo.expect_create_if_absent()
        .times(1)
        .return_once(move |_| Ok(UserCreation::Existing(returned)));

    let user = make_service(repo)
        .resolve("Ana", "Vendas")
        .await
        .expect("resolved");
    assert_eq!(user, winner);
}

#[rstest]
#[case("", "Vendas", "name")]
#[case("   ", "Vendas", "name")]
#[case("Ana", "", "department")]
#[case("", "", "name")]
#[tokio::test]
async fn resolve_rejects_blank_fields_without_store_access(
    #[case] name: &str,
    #[case] department: &str,
    #[case] field: &str,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_identity().never();
    repo.expect_create_if_absent().never();

    let err = make_service(repo)
        .resolve(name, department)
        .await
        .expect_err("validation error");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details().and_then(|details| details.get("field")),
        Some(&serde_json::Value::from(field))
    );
}

#[rstest]
#[case(UserPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(UserPersistenceError::query("bad filter"), ErrorCode::InternalError)]
#[case(UserPersistenceError::decode("missing name"), ErrorCode::InternalError)]
#[tokio::test]
async fn resolve_surfaces_repository_failures(
    #[case] failure: UserPersistenceError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_identity()
        .return_once(move |_| Err(failure));
    repo.expect_create_if_absent().never();

    let err = make_service(repo)
        .resolve("Ana", "Vendas")
        .await
        .expect_err("repository failure");
    assert_eq!(err.code(), expected);
}
