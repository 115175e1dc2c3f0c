use clap::Subcommand;
use courier_config::Config;
use courier_core_contact_contracts::ContactFeatureService;
use courier_di::Provide;
use courier_models::contact::ContactMessageRecord;

use crate::{
    database, email,
    environment::{types::ContactFeature, ConfigProvider, Provider},
};

#[derive(Debug, Subcommand)]
pub enum MessagesCommand {
    /// List all stored contact messages, newest first
    #[command(aliases(["ls", "l"]))]
    List {
        /// Also print the message bodies
        #[arg(short, long)]
        verbose: bool,
    },
}

impl MessagesCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        let database = database::connect(&config.database).await?;
        let email = email::connect(&config.email).await?;
        let mut provider = Provider::new(ConfigProvider::new(&config)?, database, email);
        let contact: ContactFeature = provider.provide();

        match self {
            Self::List { verbose } => list(contact, verbose).await,
        }
    }
}

async fn list(contact: impl ContactFeatureService, verbose: bool) -> anyhow::Result<()> {
    let messages = contact.list().await?;
    if messages.is_empty() {
        println!("No contact messages have been stored.");
        return Ok(());
    }

    for record in &messages {
        println!("{}", summary(record));
        if verbose {
            for line in record.message.message.lines() {
                println!("    {line}");
            }
            println!();
        }
    }

    Ok(())
}

fn summary(record: &ContactMessageRecord) -> String {
    let ContactMessageRecord {
        id,
        message,
        created_at,
    } = record;

    format!(
        "[{}] {} {} <{}>: {}",
        created_at.format("%Y-%m-%d %H:%M:%S"),
        **id,
        *message.name,
        message.email,
        *message.subject,
    )
}
