use citydex_enrichment::{DEFAULT_COUNTRIES_URL, DEFAULT_WEATHER_URL};
use citydex_telemetry::LogFormat;
use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const LISTEN_ADDR_ENV: &str = "CITYDEX_LISTEN_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "CITYDEX_STORAGE_BACKEND";
pub const SQLITE_URL_ENV: &str = "CITYDEX_SQLITE_URL";
pub const COUNTRIES_URL_ENV: &str = "CITYDEX_COUNTRIES_URL";
pub const WEATHER_URL_ENV: &str = "CITYDEX_WEATHER_URL";
pub const WEATHER_API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const CORS_ORIGINS_ENV: &str = "CITYDEX_CORS_ORIGINS";
pub const STATIC_DIR_ENV: &str = "CITYDEX_STATIC_DIR";
pub const LOG_FORMAT_ENV: &str = "CITYDEX_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "CITYDEX_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_SQLITE_URL: &str = "sqlite://citydex.db";
pub const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:3000,http://localhost:4000,http://localhost:4001";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "sqlite")]
    Sqlite,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "citydex-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Sqlite
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = SQLITE_URL_ENV, default_value = DEFAULT_SQLITE_URL)]
    pub sqlite_url: String,

    #[arg(long, env = COUNTRIES_URL_ENV, default_value = DEFAULT_COUNTRIES_URL)]
    pub countries_url: String,

    #[arg(long, env = WEATHER_URL_ENV, default_value = DEFAULT_WEATHER_URL)]
    pub weather_url: String,

    /// Weather lookups are skipped when unset.
    #[arg(long, env = WEATHER_API_KEY_ENV, hide_env_values = true)]
    pub weather_api_key: Option<String>,

    #[arg(
        long,
        env = CORS_ORIGINS_ENV,
        value_delimiter = ',',
        default_value = DEFAULT_CORS_ORIGINS
    )]
    pub cors_origins: Vec<String>,

    /// Directory holding the browser UI bundle.
    #[arg(long, env = STATIC_DIR_ENV)]
    pub static_dir: Option<PathBuf>,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,

    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}
