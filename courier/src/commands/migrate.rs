use clap::Subcommand;
use courier_config::Config;
use courier_persistence_postgres::{MigrationStatus, PostgresDatabase};

use crate::database;

/// Schema migrations are forward only. `serve` applies pending migrations on
/// startup, so `up` is only needed to migrate ahead of a deployment.
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Show which migrations have been applied and when
    #[command(aliases(["status", "s", "l"]))]
    List,
    /// Apply all pending migrations
    #[command(aliases(["u"]))]
    Up,
}

impl MigrateCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        let db = database::connect(&config.database).await?;
        match self {
            Self::List => list(&db).await,
            Self::Up => up(&db).await,
        }
    }
}

async fn list(db: &PostgresDatabase) -> anyhow::Result<()> {
    for status in db.migration_status().await? {
        println!("{}", status_line(&status));
    }

    Ok(())
}

async fn up(db: &PostgresDatabase) -> anyhow::Result<()> {
    let applied = db.migrate().await?;
    match applied.len() {
        0 => println!("Database schema is up to date"),
        n => println!("Applied {n} migration(s)"),
    }

    Ok(())
}

fn status_line(status: &MigrationStatus) -> String {
    match status.applied_at {
        Some(applied_at) => format!(
            "{}  applied {}",
            status.migration.name,
            applied_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => format!("{}  pending", status.migration.name),
    }
}
