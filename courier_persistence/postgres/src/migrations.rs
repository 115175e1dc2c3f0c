use std::collections::HashMap;

use anyhow::Context;
use bb8_postgres::tokio_postgres::GenericClient;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::PostgresDatabase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub name: &'static str,
    pub sql: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct MigrationStatus {
    pub migration: Migration,
    pub applied_at: Option<DateTime<Utc>>,
}

// generated by `build.rs` script
pub const MIGRATIONS: &[Migration] = include!(env!("MIGRATIONS"));

/// Key of the advisory lock held while migrating.
const MIGRATION_LOCK: i64 = 0x636f_7572_6965_72;

impl PostgresDatabase {
    pub async fn migration_status(&self) -> anyhow::Result<Vec<MigrationStatus>> {
        let conn = self
            .pool
            .get()
            .await
            .context("Failed to acquire database connection")?;
        create_migrations_table(&*conn).await?;
        let applied = applied_migrations(&*conn).await?;

        Ok(MIGRATIONS
            .iter()
            .map(|&migration| MigrationStatus {
                migration,
                applied_at: applied.get(migration.name).copied(),
            })
            .collect())
    }

    /// Applies all pending migrations in one transaction and returns their
    /// names.
    ///
    /// An advisory lock serializes concurrent callers, so several instances
    /// starting at the same time apply every migration exactly once.
    pub async fn migrate(&self) -> anyhow::Result<Vec<&'static str>> {
        let mut conn = self
            .pool
            .get()
            .await
            .context("Failed to acquire database connection")?;
        let txn = conn
            .transaction()
            .await
            .context("Failed to begin transaction")?;

        txn.execute("select pg_advisory_xact_lock($1)", &[&MIGRATION_LOCK])
            .await
            .context("Failed to acquire migration lock")?;
        create_migrations_table(&txn).await?;
        let applied = applied_migrations(&txn).await?;

        let pending = MIGRATIONS
            .iter()
            .filter(|migration| !applied.contains_key(migration.name))
            .collect::<Vec<_>>();
        for migration in &pending {
            txn.batch_execute(migration.sql)
                .await
                .with_context(|| format!("Failed to run migration {}", migration.name))?;
            txn.execute(
                "insert into _migrations (name) values ($1)",
                &[&migration.name],
            )
            .await
            .with_context(|| format!("Failed to record migration {}", migration.name))?;
            info!(name = migration.name, "applied migration");
        }

        txn.commit().await.context("Failed to commit migrations")?;

        Ok(pending.into_iter().map(|migration| migration.name).collect())
    }
}

async fn create_migrations_table(client: &(impl GenericClient + Sync)) -> anyhow::Result<()> {
    client
        .execute(
            "create table if not exists _migrations (
                name text primary key,
                applied_at timestamp with time zone not null default now()
            )",
            &[],
        )
        .await
        .context("Failed to create migrations table")?;
    Ok(())
}

async fn applied_migrations(
    client: &(impl GenericClient + Sync),
) -> anyhow::Result<HashMap<String, DateTime<Utc>>> {
    Ok(client
        .query("select name, applied_at from _migrations", &[])
        .await
        .context("Failed to list applied migrations")?
        .into_iter()
        .map(|row| (row.get(0), row.get(1)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_sorted_and_unique() {
        assert!(!MIGRATIONS.is_empty());
        assert!(MIGRATIONS.windows(2).all(|w| w[0].name < w[1].name));
    }

    #[test]
    fn migrations_are_embedded() {
        let first = MIGRATIONS[0];
        assert_eq!(first.name, "2024-11-20-120000_contact_messages");
        assert!(first.sql.contains("create table contact_messages"));
    }
}
