use chrono::{Duration, Utc};
use courier_demo::contact::{ALICE, ALL_MESSAGES, BOB};
use courier_models::contact::ContactMessageRecord;
use courier_persistence_contracts::{
    contact::{ContactRepoError, ContactRepository},
    Database, Transaction,
};
use courier_persistence_postgres::contact::PostgresContactRepository;
use courier_utils::assert_matches;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::common::setup;

mod common;

const REPO: PostgresContactRepository = PostgresContactRepository;

#[tokio::test]
#[ignore = "requires a running postgres database"]
async fn list() {
    let db = setup().await;
    let mut txn = db.begin_transaction().await.unwrap();

    let result = REPO.list(&mut txn).await.unwrap();

    let mut expected = ALL_MESSAGES
        .iter()
        .map(|&m| m.clone())
        .collect::<Vec<_>>();
    expected.sort_by_key(|m| std::cmp::Reverse(m.created_at));
    assert_eq!(result, expected);
}

#[tokio::test]
#[ignore = "requires a running postgres database"]
async fn create() {
    let db = setup().await;

    let expected = ContactMessageRecord {
        id: Uuid::new_v4().into(),
        message: ALICE.message.clone(),
        created_at: BOB.created_at + Duration::hours(1),
    };

    let mut txn = db.begin_transaction().await.unwrap();
    REPO.create(&mut txn, &expected).await.unwrap();
    txn.commit().await.unwrap();

    let mut txn = db.begin_transaction().await.unwrap();
    let result = REPO.list(&mut txn).await.unwrap();
    assert_eq!(result.len(), ALL_MESSAGES.len() + 1);
    assert_eq!(result[0], expected);
}

#[tokio::test]
#[ignore = "requires a running postgres database"]
async fn create_duplicate_content() {
    let db = setup().await;

    let duplicate = ContactMessageRecord {
        id: Uuid::new_v4().into(),
        created_at: Utc::now(),
        ..ALICE.clone()
    };

    let mut txn = db.begin_transaction().await.unwrap();
    REPO.create(&mut txn, &duplicate).await.unwrap();

    let result = REPO.list(&mut txn).await.unwrap();
    assert_eq!(
        result
            .iter()
            .filter(|m| m.message == ALICE.message)
            .count(),
        2
    );
}

#[tokio::test]
#[ignore = "requires a running postgres database"]
async fn create_conflict() {
    let db = setup().await;
    let mut txn = db.begin_transaction().await.unwrap();

    let result = REPO.create(&mut txn, &ALICE).await;
    assert_matches!(result, Err(ContactRepoError::Conflict));
}

#[tokio::test]
#[ignore = "requires a running postgres database"]
async fn rollback_discards_created_message() {
    let db = setup().await;

    let record = ContactMessageRecord {
        id: Uuid::new_v4().into(),
        ..BOB.clone()
    };

    let mut txn = db.begin_transaction().await.unwrap();
    REPO.create(&mut txn, &record).await.unwrap();
    txn.rollback().await.unwrap();

    let mut txn = db.begin_transaction().await.unwrap();
    let result = REPO.list(&mut txn).await.unwrap();
    assert_eq!(result.len(), ALL_MESSAGES.len());
}
