use std::{
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
};

use anyhow::Context;
use config::{Environment, File, FileFormat};
use courier_models::email_address::{EmailAddress, EmailAddressWithName};
pub use duration::Duration;
use serde::Deserialize;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Environment variable holding additional config files, separated by `:`.
pub const CONFIG_PATH_ENV: &str = "COURIER_CONFIG";

/// Prefix of environment variables overriding single config values, e.g.
/// `COURIER__DATABASE__URL`.
pub const ENV_PREFIX: &str = "COURIER";

/// Loads the default config, the files listed in [`CONFIG_PATH_ENV`] and
/// the environment overrides, in that order.
pub fn load() -> anyhow::Result<Config> {
    load_with(&[])
}

/// Like [`load`], but reads `extra_paths` after the files listed in
/// [`CONFIG_PATH_ENV`].
pub fn load_with(extra_paths: &[PathBuf]) -> anyhow::Result<Config> {
    let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_PATH)];
    if let Ok(extra) = std::env::var(CONFIG_PATH_ENV) {
        paths.extend(
            extra
                .split(':')
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        );
    }
    paths.extend_from_slice(extra_paths);

    load_with_env(&paths, Some(ENV_PREFIX))
}

pub fn load_paths(paths: &[impl AsRef<Path>]) -> anyhow::Result<Config> {
    load_with_env(paths, None)
}

fn load_with_env(paths: &[impl AsRef<Path>], env_prefix: Option<&str>) -> anyhow::Result<Config> {
    let builder = paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?;

    let builder = match env_prefix {
        Some(prefix) => builder.add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("http.allowed_origins")
                .try_parsing(true),
        ),
        None => builder,
    };

    builder
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub email: EmailConfig,
    pub health: HealthConfig,
    #[serde(default)]
    pub contact: ContactConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub address: SocketAddr,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    pub real_ip: Option<HttpRealIpConfig>,
}

#[derive(Debug, Deserialize)]
pub struct HttpRealIpConfig {
    pub header: String,
    pub set_from: IpAddr,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub smtp_url: String,
    pub from: EmailAddressWithName,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactConfig {
    /// Fixed recipient of contact form notifications. If unset, the
    /// notification is sent back to the address given in the submission.
    pub recipient: Option<EmailAddress>,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_default_config() {
        let config = load_paths(&[Path::new(DEFAULT_CONFIG_PATH)]).unwrap();

        assert_eq!(config.http.address.port(), 8000);
        assert_eq!(config.contact.recipient, None);
        assert_eq!(
            config.email.from.into_email_address().as_str(),
            "contact@example.com"
        );
    }

    #[test]
    fn later_files_override_earlier_ones() {
        let dir = std::env::temp_dir().join(format!("courier-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("override.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[contact]\nrecipient = \"inbox@example.com\"\n\n[health]\ncache_ttl = \"1m\""
        )
        .unwrap();
        drop(file);

        let config = load_paths(&[Path::new(DEFAULT_CONFIG_PATH), &path]).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(
            config.contact.recipient.unwrap().as_str(),
            "inbox@example.com"
        );
        assert_eq!(*config.health.cache_ttl, std::time::Duration::from_secs(60));
    }

    #[test]
    fn missing_file() {
        let err = load_paths(&[Path::new("/does/not/exist.toml")]).unwrap_err();
        assert!(err.to_string().contains("/does/not/exist.toml"));
    }
}
