#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod telemetry;

use crate::adapters::database::DbPool;
use crate::adapters::database::user_repo::UserRepository;
use crate::api::ServiceContainer;
use crate::config::Config;
use crate::core::health_service::HealthService;
use crate::core::user_service::UserService;
use tokio::sync::watch;

/// Everything the listeners need once wiring is done.
#[derive(Debug)]
pub struct App {
    pub pool: DbPool,
    pub services: ServiceContainer,
    pub health_service: HealthService,
}

#[derive(Debug)]
pub struct AppBuilder {
    config: Config,
    pool: Option<DbPool>,
}

impl AppBuilder {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config, pool: None }
    }

    #[must_use]
    pub fn with_database(mut self, pool: DbPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Wires repositories and services around the shared database handle.
    ///
    /// # Errors
    /// Returns an error if no database was supplied.
    pub fn build(self) -> anyhow::Result<App> {
        let pool = self.pool.ok_or_else(|| anyhow::anyhow!("AppBuilder requires a database pool"))?;

        let user_repo = UserRepository::new(pool.clone());
        let user_service = UserService::new(user_repo);
        let health_service = HealthService::new(pool.clone(), self.config.health);

        Ok(App { pool, services: ServiceContainer { user_service }, health_service })
    }
}

/// Flips `shutdown_tx` to `true` on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
