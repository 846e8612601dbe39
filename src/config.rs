use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

const DEFAULT_ENV: &str = "development";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LOG_LEVEL: &str = "info";
const CONFIG_DIR: &str = "config";

/// Development fallbacks. Production deployments must override both.
const DEV_DEFAULT_JWT_SECRET: &str =
    "this_is_a_development_secret_key_that_is_at_least_64_characters_long";
const DEV_DEFAULT_TOKEN_SALT: &str = "development_confirmation_token_salt";

/// Outbound mail settings. Credentials are environment-provided; the sender
/// identity is fixed per deployment.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct MailConfig {
    #[serde(default = "default_mail_sender")]
    pub sender: String,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            sender: default_mail_sender(),
            smtp_username: None,
            smtp_password: None,
        }
    }
}

/// Application configuration with validation.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AppConfig {
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Server bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Server bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL used when rendering links into outbound mail
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Session token signing secret
    #[validate(length(min = 32))]
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Session token lifetime in seconds
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    /// Salt mixed into confirmation and password-reset tokens
    #[validate(length(min = 16))]
    #[serde(default = "default_token_salt")]
    pub token_salt: String,

    /// "development" or "production"
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Log filter, e.g. "info" or "quartermaster_api=debug"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON-formatted logs
    #[serde(default)]
    pub log_json: bool,

    /// Apply pending migrations on startup
    #[serde(default = "default_true")]
    pub auto_migrate: bool,

    #[serde(default)]
    #[validate]
    pub mail: MailConfig,
}

fn default_database_url() -> String {
    "sqlite://quartermaster.db?mode=rwc".to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_public_base_url() -> String {
    format!("http://{DEFAULT_HOST}:{DEFAULT_PORT}")
}
fn default_jwt_secret() -> String {
    DEV_DEFAULT_JWT_SECRET.to_string()
}
fn default_session_ttl() -> u64 {
    86_400
}
fn default_token_salt() -> String {
    DEV_DEFAULT_TOKEN_SALT.to_string()
}
fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_mail_sender() -> String {
    "quartermaster@chapterhouse.example".to_string()
}
fn default_true() -> bool {
    true
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        self.environment != "production"
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Loads configuration from `config/default`, `config/<environment>`, and
/// `APP__`-prefixed environment variables, in that order of precedence.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let environment = std::env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let cfg: AppConfig = Config::builder()
        .add_source(File::with_name(&format!("{CONFIG_DIR}/default")).required(false))
        .add_source(File::with_name(&format!("{CONFIG_DIR}/{environment}")).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?
        .try_deserialize()?;

    cfg.validate()
        .map_err(|e| ConfigError::Message(format!("invalid configuration: {e}")))?;

    if !cfg.is_development() {
        if cfg.jwt_secret == DEV_DEFAULT_JWT_SECRET {
            return Err(ConfigError::Message(
                "jwt_secret must be overridden in production".to_string(),
            ));
        }
        if cfg.token_salt == DEV_DEFAULT_TOKEN_SALT {
            return Err(ConfigError::Message(
                "token_salt must be overridden in production".to_string(),
            ));
        }
    }

    info!(environment = %cfg.environment, "configuration loaded");
    Ok(cfg)
}

/// Installs the global tracing subscriber.
pub fn init_tracing(log_level: &str, json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
