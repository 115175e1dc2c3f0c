use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use courier_core_health_contracts::{HealthFeatureService, HealthStatus};
use courier_di::Build;
use courier_email_contracts::EmailService;
use courier_persistence_contracts::Database;
use courier_shared_contracts::time::TimeService;
use tokio::sync::RwLock;
use tracing::error;

#[derive(Debug, Clone, Build)]
pub struct HealthFeatureServiceImpl<Time, Db, Email> {
    time: Time,
    db: Db,
    email: Email,
    config: HealthFeatureConfig,
    #[state]
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct HealthFeatureConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Default)]
struct State {
    cache: RwLock<Option<CachedStatus>>,
}

#[derive(Debug)]
struct CachedStatus {
    status: HealthStatus,
    timestamp: DateTime<Utc>,
}

impl CachedStatus {
    fn fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now < self.timestamp + ttl
    }
}

impl<Time, Db, Email> HealthFeatureService for HealthFeatureServiceImpl<Time, Db, Email>
where
    Time: TimeService,
    Db: Database,
    Email: EmailService,
{
    async fn get_status(&self) -> HealthStatus {
        let now = self.time.now();
        let ttl = self.config.cache_ttl;

        let cache_guard = self.state.cache.read().await;
        if let Some(cached) = cache_guard.as_ref().filter(|c| c.fresh(now, ttl)) {
            return cached.status;
        }
        drop(cache_guard);

        let mut cache_guard = self.state.cache.write().await;
        // another request may have refreshed the status in the meantime
        if let Some(cached) = cache_guard.as_ref().filter(|c| c.fresh(now, ttl)) {
            return cached.status;
        }

        let database = self
            .db
            .ping()
            .await
            .inspect_err(|err| error!("Failed to ping database: {err:#}"))
            .is_ok();

        let email = self
            .email
            .ping()
            .await
            .inspect_err(|err| error!("Failed to ping smtp server: {err:#}"))
            .is_ok();

        let status = HealthStatus { database, email };

        cache_guard
            .insert(CachedStatus {
                status,
                timestamp: now,
            })
            .status
    }
}
