use crate::adapters::database::DbPool;
use crate::config::HealthConfig;
use opentelemetry::{KeyValue, global, metrics::Gauge};
use std::time::Duration;
use tokio::time::timeout;

#[derive(Clone, Debug)]
pub struct Metrics {
    pub status: Gauge<i64>,
}

impl Metrics {
    #[must_use]
    pub(crate) fn new() -> Self {
        let meter = global::meter("userdesk-server");
        Self {
            status: meter
                .i64_gauge("userdesk_health_status")
                .with_description("Status of health checks (1 for ok, 0 for error)")
                .build(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct HealthService {
    pool: DbPool,
    config: HealthConfig,
    metrics: Metrics,
}

impl HealthService {
    #[must_use]
    pub fn new(pool: DbPool, config: HealthConfig) -> Self {
        Self { pool, config, metrics: Metrics::new() }
    }

    /// Checks database connectivity.
    ///
    /// # Errors
    /// Returns a string describing the failure if the database is unreachable.
    pub async fn check_db(&self) -> Result<(), String> {
        let db_timeout = Duration::from_millis(self.config.db_timeout_ms);

        match timeout(db_timeout, sqlx::query("SELECT 1").execute(&self.pool)).await {
            Ok(Ok(_)) => {
                self.metrics.status.record(1, &[KeyValue::new("component", "database")]);
                Ok(())
            }
            Ok(Err(e)) => {
                self.metrics.status.record(0, &[KeyValue::new("component", "database")]);
                Err(format!("Database connection failed: {e:?}"))
            }
            Err(_) => {
                self.metrics.status.record(0, &[KeyValue::new("component", "database")]);
                Err("Database connection timed out".to_string())
            }
        }
    }
}
