use common::setup_clean;
use courier_persistence_postgres::MIGRATIONS;
use pretty_assertions::assert_eq;

mod common;

#[tokio::test]
#[ignore = "requires a running postgres database"]
async fn migrate_clean() {
    let db = setup_clean().await;
    let names = MIGRATIONS.iter().map(|m| m.name).collect::<Vec<_>>();

    let status = db.migration_status().await.unwrap();
    assert_eq!(status.len(), MIGRATIONS.len());
    assert!(status.iter().all(|s| s.applied_at.is_none()));

    let applied = db.migrate().await.unwrap();
    assert_eq!(applied, names);

    let status = db.migration_status().await.unwrap();
    assert!(status.iter().all(|s| s.applied_at.is_some()));

    assert_eq!(db.migrate().await.unwrap(), Vec::<&str>::new());
}

#[tokio::test]
#[ignore = "requires a running postgres database"]
async fn migrate_concurrently() {
    let db = setup_clean().await;

    let (a, b) = tokio::join!(db.migrate(), db.migrate());
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.len() + b.len(), MIGRATIONS.len());
}
