use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub health: HealthConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "USERDESK_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for the management server (health probes)
    #[arg(long, env = "USERDESK_MGMT_PORT", default_value_t = 9090)]
    pub mgmt_port: u16,

    /// Directory holding the dashboard and other static assets
    #[arg(long, env = "USERDESK_STATIC_DIR", default_value = "views")]
    pub static_dir: PathBuf,

    /// Seconds to wait for the database to close on shutdown
    #[arg(long, env = "USERDESK_SHUTDOWN_TIMEOUT_SECS", default_value_t = 5)]
    pub shutdown_timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file (created if missing)
    #[arg(long = "database-path", env = "USERDESK_DATABASE_PATH", default_value = "./database.sqlite")]
    pub path: PathBuf,

    /// Maximum number of open connections to the database file
    #[arg(long = "database-max-connections", env = "USERDESK_DATABASE_MAX_CONNECTIONS", default_value_t = 1)]
    pub max_connections: u32,

    /// How long a writer waits on a locked database before failing
    #[arg(long = "database-busy-timeout-ms", env = "USERDESK_DATABASE_BUSY_TIMEOUT_MS", default_value_t = 5000)]
    pub busy_timeout_ms: u64,
}

#[derive(Clone, Debug, Args)]
pub struct HealthConfig {
    /// Timeout for the database readiness check
    #[arg(long = "health-db-timeout-ms", env = "USERDESK_HEALTH_DB_TIMEOUT_MS", default_value_t = 2000)]
    pub db_timeout_ms: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "USERDESK_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP collector endpoint; spans and metrics are only exported when set
    #[arg(long, env = "USERDESK_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["userdesk-server", "--port", "8080"]).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.mgmt_port, 9090);
        assert_eq!(config.server.static_dir, PathBuf::from("views"));
        assert_eq!(config.database.path, PathBuf::from("./database.sqlite"));
        assert_eq!(config.database.max_connections, 1);
        assert_eq!(config.telemetry.log_format, LogFormat::Text);
        assert!(config.telemetry.otlp_endpoint.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "userdesk-server",
            "--database-path",
            "/tmp/users.sqlite",
            "--database-max-connections",
            "4",
            "--log-format",
            "json",
            "--otlp-endpoint",
            "http://collector:4317",
        ])
        .unwrap();

        assert_eq!(config.database.path, PathBuf::from("/tmp/users.sqlite"));
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
        assert_eq!(config.telemetry.otlp_endpoint.as_deref(), Some("http://collector:4317"));
    }

    #[test]
    fn test_rejects_invalid_port() {
        assert!(Config::try_parse_from(["userdesk-server", "--port", "not-a-port"]).is_err());
    }
}
