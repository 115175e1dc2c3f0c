use courier_config::Config;
use courier_di::Provide;
use courier_email_contracts::EmailService;
use courier_persistence_contracts::Database;
use tracing::{info, warn};

use crate::{
    database, email,
    environment::{types::RestServer, ConfigProvider, Provider},
};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Connecting to database");
    let database = database::connect(&config.database).await?;
    database.ping().await?;

    let applied = database.migrate().await?;
    info!(count = applied.len(), "database schema is up to date");

    info!("Connecting to smtp server");
    let email = email::connect(&config.email).await?;
    email.ping().await?;

    if config.contact.recipient.is_none() {
        warn!(
            "contact.recipient is not set, contact messages will be sent to the address given \
             in the submission"
        );
    }

    let config_provider = ConfigProvider::new(&config)?;
    let mut provider = Provider::new(config_provider, database, email);
    let server: RestServer = provider.provide();
    server.serve().await
}
