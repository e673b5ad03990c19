use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::analytics::{
    ExportQuoting, SessionSettings, DEFAULT_EXPORT_PREFIX, DEFAULT_TOP_JOBS_LIMIT,
};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub analytics: AnalyticsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let export_prefix =
            env::var("APP_EXPORT_PREFIX").unwrap_or_else(|_| DEFAULT_EXPORT_PREFIX.to_string());
        let export_dir = PathBuf::from(env::var("APP_EXPORT_DIR").unwrap_or_else(|_| ".".into()));
        let quoting = match env::var("APP_EXPORT_QUOTING") {
            Ok(raw) => {
                ExportQuoting::parse(&raw).ok_or(ConfigError::InvalidQuoting { value: raw })?
            }
            Err(_) => ExportQuoting::default(),
        };
        let top_jobs_limit = match env::var("APP_TOP_JOBS_LIMIT") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidTopJobsLimit)?,
            Err(_) => DEFAULT_TOP_JOBS_LIMIT,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            analytics: AnalyticsConfig {
                export_prefix,
                export_dir,
                quoting,
                top_jobs_limit,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Log filter and formatting controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Export naming, quoting, and top-jobs sizing.
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    pub export_prefix: String,
    pub export_dir: PathBuf,
    pub quoting: ExportQuoting,
    pub top_jobs_limit: usize,
}

impl AnalyticsConfig {
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            top_jobs_limit: self.top_jobs_limit,
            export_prefix: self.export_prefix.clone(),
            quoting: self.quoting,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidQuoting { value: String },
    InvalidTopJobsLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidQuoting { value } => write!(
                f,
                "APP_EXPORT_QUOTING must be 'necessary' or 'never' (got '{value}')"
            ),
            ConfigError::InvalidTopJobsLimit => {
                write!(f, "APP_TOP_JOBS_LIMIT must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidQuoting { .. }
            | ConfigError::InvalidTopJobsLimit => None,
        }
    }
}
