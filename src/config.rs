use std::env;
use std::path::Path;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError, ValidationErrors};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";
const DEFAULT_STORE_BACKEND: &str = "memory";
const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";
/// Business timestamps follow the head office clock (UTC+8).
const DEFAULT_UTC_OFFSET_HOURS: i8 = 8;

/// Application configuration with validation.
///
/// The store backend is an explicit configuration value; it is never inferred
/// from the request context.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// JWT signing secret
    #[validate(length(min = 32))]
    pub jwt_secret: String,

    /// JWT expiration in seconds (1h default, 24h ceiling)
    #[validate(range(min = 300, max = 86400))]
    pub jwt_expiration: usize,

    /// Server host address
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Tabular store backend: "memory" or "sheets"
    #[serde(default = "default_store_backend")]
    #[validate(custom = "validate_store_backend")]
    pub store_backend: String,

    /// Base URL of the remote sheets service
    #[serde(default = "default_sheets_base_url")]
    pub sheets_base_url: String,

    /// Workbook identifier (required for the sheets backend)
    #[serde(default)]
    pub spreadsheet_id: Option<String>,

    /// Bearer credential for the sheets service (required for the sheets backend)
    #[serde(default)]
    pub sheets_api_token: Option<String>,

    /// Webhook endpoint receiving the daily reminder digest
    #[serde(default)]
    pub notify_webhook_url: Option<String>,

    /// CORS: comma-separated list of allowed origins; unset means permissive
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// Offset applied to business timestamps
    #[serde(default = "default_utc_offset_hours")]
    #[validate(range(min = -12, max = 14))]
    pub utc_offset_hours: i8,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_store_backend() -> String {
    DEFAULT_STORE_BACKEND.to_string()
}
fn default_sheets_base_url() -> String {
    DEFAULT_SHEETS_BASE_URL.to_string()
}
fn default_utc_offset_hours() -> i8 {
    DEFAULT_UTC_OFFSET_HOURS
}

fn validate_store_backend(value: &str) -> Result<(), ValidationError> {
    match value {
        "memory" | "sheets" => Ok(()),
        _ => Err(ValidationError::new("unknown_store_backend")),
    }
}

impl AppConfig {
    /// Construct a minimal configuration programmatically (tests and tools).
    pub fn new(
        jwt_secret: String,
        jwt_expiration: usize,
        host: String,
        port: u16,
        environment: String,
    ) -> Self {
        Self {
            jwt_secret,
            jwt_expiration,
            host,
            port,
            environment,
            log_level: default_log_level(),
            log_json: false,
            store_backend: default_store_backend(),
            sheets_base_url: default_sheets_base_url(),
            spreadsheet_id: None,
            sheets_api_token: None,
            notify_webhook_url: None,
            cors_allowed_origins: None,
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
        }
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development" || self.environment == "test"
    }

    /// Current time in the configured business offset.
    pub fn local_now(&self) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(i32::from(self.utc_offset_hours) * 3600)
            .unwrap_or_else(|| Utc.fix());
        Utc::now().with_timezone(&offset)
    }

    /// Constraints that cut across fields and cannot be expressed per-field.
    pub fn validate_additional_constraints(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.store_backend == "sheets" {
            if self.spreadsheet_id.as_deref().unwrap_or("").is_empty() {
                errors.add("spreadsheet_id", ValidationError::new("required_for_sheets"));
            }
            if self.sheets_api_token.as_deref().unwrap_or("").is_empty() {
                errors.add("sheets_api_token", ValidationError::new("required_for_sheets"));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Load configuration from `config/` files plus `APP__`-prefixed environment
/// variables. `jwt_secret` has no default and must be supplied.
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .set_default("jwt_expiration", 3600)?
        .set_default("host", "0.0.0.0")?
        .set_default("port", i64::from(DEFAULT_PORT))?
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .set_default("store_backend", DEFAULT_STORE_BACKEND)?
        .set_default("sheets_base_url", DEFAULT_SHEETS_BASE_URL)?
        .set_default("utc_offset_hours", i64::from(DEFAULT_UTC_OFFSET_HOURS))?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    if config.get_string("jwt_secret").is_err() {
        error!("JWT secret is not configured. Set APP__JWT_SECRET with a secure random string (minimum 32 characters).");
        return Err(AppConfigError::Load(ConfigError::NotFound(
            "jwt_secret is required but not configured. Set APP__JWT_SECRET environment variable."
                .into(),
        )));
    }

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    app_config.validate_additional_constraints().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    Ok(app_config)
}

/// Initialize the tracing subscriber. Honors `RUST_LOG` when set.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_directive = format!("funeral_ops_api={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let filter = EnvFilter::try_new(filter_directive)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    if json {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init();
    } else {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init();
    }
}
