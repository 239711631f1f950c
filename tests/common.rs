#![allow(dead_code)]
use axum::ServiceExt;
use axum::extract::Request;
use clap::Parser;
use std::path::Path;
use std::sync::Once;
use tempfile::TempDir;
use userdesk_server::adapters::database::{self, DbPool};
use userdesk_server::api::{self, MgmtState};
use userdesk_server::config::Config;
use userdesk_server::AppBuilder;

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("userdesk_server=debug".parse().unwrap())
            .add_directive("sqlx=warn".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

pub fn get_test_config(database_path: &Path) -> Config {
    let static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/views");
    Config::try_parse_from([
        "userdesk-server",
        "--host",
        "127.0.0.1",
        "--port",
        "0",
        "--mgmt-port",
        "0",
        "--static-dir",
        static_dir,
        "--database-path",
        database_path.to_str().unwrap(),
    ])
    .unwrap()
}

pub struct TestApp {
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub pool: DbPool,
    pub config: Config,
    _db_dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db_dir = tempfile::tempdir().unwrap();
        let config = get_test_config(&db_dir.path().join("users.sqlite"));
        Self::spawn_with_config(config, db_dir).await
    }

    pub async fn spawn_with_config(config: Config, db_dir: TempDir) -> Self {
        setup_tracing();

        let pool = database::init_store(&config.database).await.expect("Failed to initialize the store");
        let app = AppBuilder::new(config.clone()).with_database(pool).build().unwrap();

        let app_service = api::app_service(&config, app.services);
        let mgmt_router = api::mgmt_router(MgmtState { health_service: app.health_service });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, ServiceExt::<Request>::into_make_service(app_service)).await.unwrap();
        });

        let mgmt_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_url = format!("http://{}", mgmt_listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(mgmt_listener, mgmt_router).await.unwrap();
        });

        Self { server_url, mgmt_url, client: reqwest::Client::new(), pool: app.pool, config, _db_dir: db_dir }
    }

    pub fn users_url(&self) -> String {
        format!("{}/api/users", self.server_url)
    }

    pub fn user_url(&self, id: i64) -> String {
        format!("{}/api/users/{}", self.server_url, id)
    }

    /// Creates a user through the API and returns its id.
    pub async fn create_user(&self, name: &str, email: &str) -> i64 {
        let resp = self
            .client
            .post(self.users_url())
            .json(&serde_json::json!({ "name": name, "email": email }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED, "create failed for {email}");
        let body: serde_json::Value = resp.json().await.unwrap();
        body["id"].as_i64().unwrap()
    }

    pub async fn user_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(&self.pool).await.unwrap()
    }
}
