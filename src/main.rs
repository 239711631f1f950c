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

use axum::ServiceExt;
use axum::extract::Request;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::watch;
use tracing::Instrument;
use userdesk_server::api::{self, MgmtState};
use userdesk_server::config::Config;
use userdesk_server::{AppBuilder, adapters, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    let telemetry_guard = telemetry::init_telemetry(&config.telemetry)?;

    let boot_span = tracing::info_span!("boot_server");
    let (api_listener, mgmt_listener, app_service, mgmt_app, pool) = async {
        // Store first: a missing or unwritable database file stops the boot here.
        let pool = adapters::database::init_store(&config.database).await?;
        tracing::info!(path = %config.database.path.display(), "database ready");

        let app = AppBuilder::new(config.clone()).with_database(pool).build()?;

        let app_service = api::app_service(&config, app.services);
        let mgmt_app = api::mgmt_router(MgmtState { health_service: app.health_service });

        let api_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
        let mgmt_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.mgmt_port).parse()?;

        let api_listener = tokio::net::TcpListener::bind(api_addr).await?;
        let mgmt_listener = tokio::net::TcpListener::bind(mgmt_addr).await?;

        tracing::info!(address = %api_addr, "listening");
        tracing::info!(address = %mgmt_addr, "management server listening");

        Ok::<_, anyhow::Error>((api_listener, mgmt_listener, app_service, mgmt_app, app.pool))
    }
    .instrument(boot_span)
    .await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    userdesk_server::spawn_signal_handler(shutdown_tx.clone());

    let mut api_rx = shutdown_rx.clone();
    let api_server = axum::serve(api_listener, ServiceExt::<Request>::into_make_service(app_service))
        .with_graceful_shutdown(async move {
            let _ = api_rx.wait_for(|&s| s).await;
        });

    let mut mgmt_rx = shutdown_rx;
    let mgmt_server = axum::serve(mgmt_listener, mgmt_app.into_make_service()).with_graceful_shutdown(async move {
        let _ = mgmt_rx.wait_for(|&s| s).await;
    });

    if let Err(e) = tokio::try_join!(api_server.into_future(), mgmt_server.into_future()) {
        tracing::error!(error = %e, "Server error");
    }

    let _ = shutdown_tx.send(true);
    if tokio::time::timeout(Duration::from_secs(config.server.shutdown_timeout_secs), pool.close()).await.is_err() {
        tracing::warn!("Timeout waiting for the database to close.");
    }

    telemetry_guard.shutdown();
    Ok(())
}
