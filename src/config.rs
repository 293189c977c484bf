use std::env;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;
use thiserror::Error;
use url::Url;

pub const DEFAULT_MED42_API_URL: &str = "https://api.med42.ai/v1";
pub const DEFAULT_WEBHOOK_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;
pub const DEFAULT_SERVICE_NAME: &str = "NeoCura Med42 Integration";

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind host (e.g., 0.0.0.0)
    pub app_host: String,
    /// HTTP bind port (e.g., 5000)
    pub app_port: u16,

    /// Med42 base URL, always stored with a trailing slash so `join` keeps
    /// the version segment (e.g., https://api.med42.ai/v1/)
    pub med42_api_url: Url,
    /// Bearer token for Med42
    pub med42_api_key: Option<String>,
    /// Per-call timeout for outbound Med42 requests
    pub med42_timeout: Duration,

    /// Externally reachable base URL of this gateway, used to build the
    /// default webhook callback
    pub public_base_url: Option<Url>,
    /// Name reported by the health endpoint
    pub service_name: String,

    /// Reject undecodable webhook payloads with 400 instead of acknowledging them
    pub webhook_strict: bool,
    /// Largest `/webhook` body accepted before axum answers 413
    pub webhook_max_body_bytes: usize,

    /// Job correlation store knobs
    pub job_ttl: Duration,
    pub job_store_capacity: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid URL for {name}: {value}")]
    InvalidUrl { name: &'static str, value: String },
    #[error("Invalid number for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("General error: {0}")]
    Other(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env if present
        let _ = dotenv();

        let app_host = env_or_default("APP_HOST", "0.0.0.0");
        let app_port = parse_or_default::<u16>("PORT", 5000)?;

        let med42_api_url = normalize_base_url(parse_url_or_default(
            "MED42_API_URL",
            DEFAULT_MED42_API_URL,
        )?);
        let med42_api_key = env::var("MED42_API_KEY").ok().filter(|k| !k.is_empty());
        let med42_timeout = Duration::from_secs(parse_or_default::<u64>("MED42_TIMEOUT_SECS", 30)?);

        let public_base_url = parse_url_optional("PUBLIC_BASE_URL")?.map(normalize_base_url);
        let service_name = env_or_default("SERVICE_NAME", DEFAULT_SERVICE_NAME);

        let webhook_strict = parse_bool_or_default("WEBHOOK_STRICT", false)?;
        let webhook_max_body_bytes = parse_or_default::<usize>(
            "WEBHOOK_MAX_BODY_BYTES",
            DEFAULT_WEBHOOK_MAX_BODY_BYTES,
        )?;

        let job_ttl = Duration::from_secs(parse_or_default::<u64>("JOB_TTL_SECS", 3600)?);
        let job_store_capacity = parse_or_default::<usize>("JOB_STORE_CAPACITY", 1024)?;

        Ok(Self {
            app_host,
            app_port,
            med42_api_url,
            med42_api_key,
            med42_timeout,
            public_base_url,
            service_name,
            webhook_strict,
            webhook_max_body_bytes,
            job_ttl,
            job_store_capacity,
        })
    }

    /// Settings pointing at the given Med42 base URL with every other knob at
    /// its default. Used by embedders and tests that bypass the environment.
    pub fn with_api_url(med42_api_url: Url) -> Self {
        Self {
            app_host: "0.0.0.0".to_string(),
            app_port: 5000,
            med42_api_url: normalize_base_url(med42_api_url),
            med42_api_key: None,
            med42_timeout: Duration::from_secs(30),
            public_base_url: None,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            webhook_strict: false,
            webhook_max_body_bytes: DEFAULT_WEBHOOK_MAX_BODY_BYTES,
            job_ttl: Duration::from_secs(3600),
            job_store_capacity: 1024,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.app_host, self.app_port)
    }
}

/// `Url::join` replaces the last path segment unless the base ends in `/`.
pub fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/* --------------------------- helpers --------------------------- */

fn env_or_default(key: &'static str, default: &'static str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or_default<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(v) => v.parse::<T>().map_err(|_| ConfigError::InvalidNumber {
            name: key,
            value: v,
        }),
        Err(_) => Ok(default),
    }
}

fn parse_bool_or_default(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(key) {
        Ok(v) => {
            let vv = v.to_lowercase();
            match vv.as_str() {
                "1" | "true" | "yes" | "y" => Ok(true),
                "0" | "false" | "no" | "n" => Ok(false),
                _ => Err(ConfigError::Other(format!("Invalid bool for {key}: {v}"))),
            }
        }
        Err(_) => Ok(default),
    }
}

fn parse_url_or_default(key: &'static str, default: &'static str) -> Result<Url, ConfigError> {
    let raw = env_or_default(key, default);
    Url::parse(&raw).map_err(|_| ConfigError::InvalidUrl {
        name: key,
        value: raw,
    })
}

fn parse_url_optional(key: &'static str) -> Result<Option<Url>, ConfigError> {
    match env::var(key) {
        Ok(raw) if !raw.is_empty() => Url::parse(&raw)
            .map(Some)
            .map_err(|_| ConfigError::InvalidUrl {
                name: key,
                value: raw,
            }),
        _ => Ok(None),
    }
}
