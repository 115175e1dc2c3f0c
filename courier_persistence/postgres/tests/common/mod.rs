use bb8_postgres::tokio_postgres::{self, NoTls};
use courier_persistence_contracts::{Database, Transaction};
use courier_persistence_postgres::{
    contact::PostgresContactRepository, PostgresDatabase, PostgresDatabaseConfig,
};

pub type Db = PostgresDatabase;

/// Migrated database filled with the demo messages.
pub async fn setup() -> Db {
    let db = setup_clean().await;

    db.migrate().await.unwrap();

    let mut txn = db.begin_transaction().await.unwrap();
    courier_demo::create(&mut txn, PostgresContactRepository)
        .await
        .unwrap();
    txn.commit().await.unwrap();

    db
}

/// Empty database without any tables.
pub async fn setup_clean() -> Db {
    let config = courier_config::load().unwrap();

    let (client, connection) = tokio_postgres::connect(&config.database.url, NoTls)
        .await
        .unwrap();
    let connection = tokio::spawn(connection);
    client
        .batch_execute("drop schema public cascade; create schema public;")
        .await
        .unwrap();
    drop(client);
    connection.await.unwrap().unwrap();

    Db::connect(&PostgresDatabaseConfig {
        url: config.database.url,
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        acquire_timeout: config.database.acquire_timeout.into(),
        idle_timeout: config.database.idle_timeout.map(Into::into),
        max_lifetime: config.database.max_lifetime.map(Into::into),
    })
    .await
    .unwrap()
}
