use std::sync::Arc;

use courier_api_rest::{RealIpConfig, RestServerConfig};
use courier_config::Config;
use courier_core_contact_impl::ContactFeatureConfig;
use courier_core_health_impl::HealthFeatureConfig;
use courier_di::provider;
use types::{Database, Email};

pub mod types;

provider! {
    /// The default provider, capable of providing all the dependencies
    pub Provider {
        database: Database,
        email: Email,
        ..config: ConfigProvider {
            RestServerConfig,
            ContactFeatureConfig,
            HealthFeatureConfig,
        }
    }
}

impl Provider {
    pub fn new(config: ConfigProvider, database: Database, email: Email) -> Self {
        Self {
            _cache: Default::default(),
            database,
            email,
            config,
        }
    }
}

provider! {
    /// Reduced provider, capable of providing services that only depend on the configuration
    pub ConfigProvider {
        // API
        rest_server_config: RestServerConfig,

        // Core
        contact_feature_config: ContactFeatureConfig,
        health_feature_config: HealthFeatureConfig,
    }
}

impl ConfigProvider {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        // API
        let rest_server_config = RestServerConfig {
            addr: config.http.address,
            real_ip_config: config.http.real_ip.as_ref().map(|real_ip_config| {
                Arc::new(RealIpConfig {
                    header: real_ip_config.header.clone(),
                    set_from: real_ip_config.set_from,
                })
            }),
            allowed_origins: config.http.allowed_origins.iter().cloned().collect(),
        };

        // Core
        let contact_feature_config = ContactFeatureConfig {
            recipient: config.contact.recipient.clone().map(Arc::new),
        };

        let health_feature_config = HealthFeatureConfig {
            cache_ttl: config.health.cache_ttl.into(),
        };

        Ok(Self {
            _cache: Default::default(),

            // API
            rest_server_config,

            // Core
            contact_feature_config,
            health_feature_config,
        })
    }
}

#[cfg(test)]
mod tests {
    use courier_di::Provide;
    use courier_email_impl::EmailServiceImpl;
    use courier_persistence_postgres::PostgresDatabase;
    use types::{ContactFeature, RestServer};

    use super::*;

    #[tokio::test]
    async fn provide_rest_server() {
        let config = courier_config::load().unwrap();
        let config_provider = ConfigProvider::new(&config).unwrap();

        let database = PostgresDatabase::dummy().await;
        let email = EmailServiceImpl::dummy().await;

        let mut provider = Provider::new(config_provider, database, email);
        let _: RestServer = provider.provide();
        let _: ContactFeature = provider.provide();
    }
}
