//! Integration tests for `DieselUserRepository` against PostgreSQL.
//!
//! Set `FOOD_TEST_DATABASE_URL` to run them; otherwise each test prints a
//! `SKIP-TEST-CLUSTER` marker and returns. Tests share one database, so
//! every test works on uniquely named users.

mod support;

use food_api::domain::ports::{UserPersistenceError, UserRepository};
use food_api::domain::{NewUser, PageRequest, UserName};
use food_api::outbound::persistence::DieselUserRepository;
use rstest::rstest;

use support::{database_url_or_skip, migrated_pool, unique_name};

async fn repository() -> Option<DieselUserRepository> {
    let url = database_url_or_skip()?;
    Some(DieselUserRepository::new(migrated_pool(&url).await))
}

fn new_user(name: &str, enabled: bool) -> NewUser {
    NewUser::new(UserName::new(name).expect("valid name"), enabled, "secret-pass")
        .expect("valid password")
}

#[rstest]
#[tokio::test]
async fn created_users_round_trip() {
    let Some(repo) = repository().await else {
        return;
    };
    let name = unique_name("cook");

    let created = repo.create(&new_user(&name, true)).await.expect("create");

    let by_id = repo
        .find_by_id(created.id())
        .await
        .expect("find by id")
        .expect("present");
    let by_name = repo
        .find_by_name(created.name())
        .await
        .expect("find by name")
        .expect("present");
    assert_eq!(by_id, created);
    assert_eq!(by_name.id(), created.id());
    assert!(by_id.check_password("secret-pass"));
    assert!(!by_id.check_password("other-pass"));
    assert!(repo.count().await.expect("count") >= 1);
}

#[rstest]
#[tokio::test]
async fn duplicate_names_are_distinct_errors() {
    let Some(repo) = repository().await else {
        return;
    };
    let name = unique_name("dup");
    repo.create(&new_user(&name, true)).await.expect("first");

    let err = repo
        .create(&new_user(&name, false))
        .await
        .expect_err("duplicate");

    assert_eq!(err, UserPersistenceError::duplicate_name(name.as_str()));
}

#[rstest]
#[tokio::test]
async fn updates_persist_name_flag_and_password() {
    let Some(repo) = repository().await else {
        return;
    };
    let mut user = repo
        .create(&new_user(&unique_name("before"), true))
        .await
        .expect("create");
    let renamed = unique_name("after");
    user.rename(UserName::new(&renamed).expect("name"));
    user.set_enabled(false);
    user.set_password("changed-pass").expect("hash");

    assert!(repo.update(&user).await.expect("update"));

    let stored = repo
        .find_by_id(user.id())
        .await
        .expect("find")
        .expect("present");
    assert_eq!(stored.name().as_ref(), renamed);
    assert!(!stored.enabled());
    assert!(stored.check_password("changed-pass"));
}

#[rstest]
#[tokio::test]
async fn renaming_onto_a_taken_name_fails() {
    let Some(repo) = repository().await else {
        return;
    };
    let taken = unique_name("taken");
    repo.create(&new_user(&taken, true)).await.expect("create");
    let mut other = repo
        .create(&new_user(&unique_name("other"), true))
        .await
        .expect("create");
    other.rename(UserName::new(&taken).expect("name"));

    let err = repo.update(&other).await.expect_err("duplicate");

    assert!(matches!(err, UserPersistenceError::DuplicateName { .. }));
}

#[rstest]
#[tokio::test]
async fn deleted_users_are_gone() {
    let Some(repo) = repository().await else {
        return;
    };
    let user = repo
        .create(&new_user(&unique_name("gone"), true))
        .await
        .expect("create");

    assert!(repo.delete(user.id()).await.expect("delete"));
    assert!(!repo.delete(user.id()).await.expect("second delete"));
    assert!(repo.find_by_id(user.id()).await.expect("find").is_none());
    assert!(!repo.update(&user).await.expect("update missing"));
}

#[rstest]
#[tokio::test]
async fn pages_are_ordered_by_id() {
    let Some(repo) = repository().await else {
        return;
    };
    for _ in 0..3 {
        repo.create(&new_user(&unique_name("page"), true))
            .await
            .expect("create");
    }

    let page = repo
        .list_page(PageRequest::new(Some(1), Some(3)))
        .await
        .expect("list");

    assert_eq!(page.len(), 3);
    let ids: Vec<i64> = page.iter().map(|user| user.id().get()).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}
