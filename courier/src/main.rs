use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use courier::{
    commands::{
        email::EmailCommand, messages::MessagesCommand, migrate::MigrateCommand, serve::serve,
    },
    environment::ConfigProvider,
};
use courier_config::Config;
use courier_utils::courier_version;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Command::Completion { shell } => {
            let bin_name = env!("CARGO_BIN_NAME");
            clap_complete::generate(shell, &mut Cli::command(), bin_name, &mut std::io::stdout());
            return Ok(());
        }
        command => command,
    };

    init_tracing(&cli.log)?;

    let config = courier_config::load_with(&cli.config).context("Failed to load config")?;

    match command {
        Command::Serve => serve(config).await,
        Command::Migrate { command } => command.invoke(config).await,
        Command::Email { command } => command.invoke(config).await,
        Command::Messages { command } => command.invoke(config).await,
        Command::CheckConfig { verbose } => check_config(&config, verbose),
        Command::Completion { .. } => unreachable!("handled before loading the config"),
    }
}

#[derive(Debug, Parser)]
#[command(version = courier_version())]
struct Cli {
    /// Additional config file, read after the default config and the files
    /// listed in COURIER_CONFIG
    #[arg(short, long = "config", global = true, value_name = "PATH")]
    config: Vec<PathBuf>,
    /// Log filter directives, e.g. `info` or `courier=debug,tower_http=trace`
    #[arg(long, global = true, env = "RUST_LOG", default_value = "info")]
    log: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Accept contact form submissions over HTTP
    #[command(aliases(["run", "start", "r", "s"]))]
    Serve,
    /// Inspect and apply database migrations
    #[command(aliases(["mig", "m"]))]
    Migrate {
        #[command(subcommand)]
        command: MigrateCommand,
    },
    /// Test email deliverability
    #[command(aliases(["e"]))]
    Email {
        #[command(subcommand)]
        command: EmailCommand,
    },
    /// Inspect stored contact messages
    #[command(aliases(["msg"]))]
    Messages {
        #[command(subcommand)]
        command: MessagesCommand,
    },
    /// Validate configuration
    CheckConfig {
        /// Print a debug representation of the config
        #[arg(short, long)]
        verbose: bool,
    },
    /// Generate shell completions
    Completion {
        #[clap(value_enum)]
        shell: Shell,
    },
}

fn check_config(config: &Config, verbose: bool) -> anyhow::Result<()> {
    ConfigProvider::new(config).context("Invalid config")?;

    if verbose {
        println!("{config:#?}");
    }
    match &config.contact.recipient {
        Some(recipient) => println!("Contact messages are forwarded to {recipient}"),
        None => println!("Contact messages are sent back to the submitter"),
    }

    Ok(())
}

fn init_tracing(filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter).context("Invalid log filter")?;
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    #[cfg(tracing_pretty)]
    let fmt_layer = fmt_layer.pretty();

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "courier",
            "migrate",
            "list",
            "--config",
            "a.toml",
            "-c",
            "b.toml",
            "--log",
            "debug",
        ])
        .unwrap();

        assert_eq!(
            cli.config,
            [PathBuf::from("a.toml"), PathBuf::from("b.toml")]
        );
        assert_eq!(cli.log, "debug");
        assert!(matches!(
            cli.command,
            Command::Migrate {
                command: MigrateCommand::List
            }
        ));
    }

    #[test]
    fn invalid_log_filter() {
        assert!(init_tracing("courier=notalevel").is_err());
    }
}
