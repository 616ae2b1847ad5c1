use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Which family of backend endpoints the import calls go to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ApiMode {
    /// Background (Celery) imports under `/importers/...`
    #[default]
    Production,
    /// Inline imports with a visible browser under `/dev/...`
    Development,
}

impl std::str::FromStr for ApiMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(ApiMode::Production),
            "development" | "dev" => Ok(ApiMode::Development),
            _ => Err(ConfigError::InvalidApiMode(s.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub api_base_url: String,
    pub api_mode: ApiMode,
    pub storage_path: PathBuf,
    pub poll_interval: Duration,
    pub toast_duration: Duration,
    pub http_timeout: Duration,
    pub otel_exporter_endpoint: Option<String>,
    pub service_name: String,
    pub metrics_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let server_port = lookup("SERVER_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let api_base_url = lookup("SYNCAR_API_URL")
            .unwrap_or_else(|| "http://localhost:8000/api/v1".to_string())
            .trim_end_matches('/')
            .to_string();

        let api_mode = match lookup("SYNCAR_API_MODE") {
            Some(mode) => mode.parse()?,
            None => ApiMode::default(),
        };

        let storage_path =
            PathBuf::from(lookup("SYNCAR_STORAGE_PATH").unwrap_or_else(|| "./.syncar".to_string()));

        let poll_interval = Duration::from_millis(parse_number(
            &lookup,
            "SYNCAR_POLL_INTERVAL_MS",
            2000,
        )?);
        if poll_interval.is_zero() {
            return Err(ConfigError::InvalidNumber {
                name: "SYNCAR_POLL_INTERVAL_MS",
                value: "0".to_string(),
            });
        }

        let toast_duration = Duration::from_millis(parse_number(
            &lookup,
            "SYNCAR_TOAST_DURATION_MS",
            3000,
        )?);

        let http_timeout =
            Duration::from_secs(parse_number(&lookup, "SYNCAR_HTTP_TIMEOUT_SECS", 30)?);

        let otel_exporter_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT");

        let service_name = lookup("SERVICE_NAME").unwrap_or_else(|| "syncar".to_string());

        let metrics_port = lookup("METRICS_PORT")
            .unwrap_or_else(|| "9000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        Ok(Config {
            server_host,
            server_port,
            api_base_url,
            api_mode,
            storage_path,
            poll_interval,
            toast_duration,
            http_timeout,
            otel_exporter_endpoint,
            service_name,
            metrics_port,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_number<F>(lookup: &F, name: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        None => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid SYNCAR_API_MODE '{0}' (expected production or development)")]
    InvalidApiMode(String),

    #[error("Invalid value '{value}' for {name}")]
    InvalidNumber { name: &'static str, value: String },
}
