//! Configuration for the company service module

use serde::{Deserialize, Serialize};

/// Company service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Access and refresh token settings
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Employee list paging limits
    #[serde(default)]
    pub paging: PagingConfig,

    /// Per-client request quota
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Response caching headers for company reads
    #[serde(default)]
    pub caching: CachingConfig,

    /// Cross-origin policy
    #[serde(default)]
    pub cors: CorsConfig,

    /// Maximum accepted request body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
            paging: PagingConfig::default(),
            rate_limit: RateLimitConfig::default(),
            caching: CachingConfig::default(),
            cors: CorsConfig::default(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SeaORM connection URL (postgres:// or sqlite:)
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Run pending migrations on startup
    #[serde(default = "default_true")]
    pub migrate_on_start: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            migrate_on_start: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct JwtConfig {
    /// HMAC secret; must be set before the server starts
    #[serde(default)]
    pub secret: String,

    #[serde(default = "default_issuer")]
    pub valid_issuer: String,

    #[serde(default = "default_audience")]
    pub valid_audience: String,

    /// Access token lifetime
    #[serde(default = "default_expires_minutes")]
    pub expires_minutes: i64,

    /// Refresh token lifetime, restarted on every login
    #[serde(default = "default_refresh_token_days")]
    pub refresh_token_days: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            valid_issuer: default_issuer(),
            valid_audience: default_audience(),
            expires_minutes: default_expires_minutes(),
            refresh_token_days: default_refresh_token_days(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PagingConfig {
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            max_page_size: default_max_page_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Requests admitted per window
    #[serde(default = "default_rate_limit")]
    pub limit: u32,

    /// Window length in seconds
    #[serde(default = "default_rate_period_secs")]
    pub period_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: default_rate_limit(),
            period_secs: default_rate_period_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CachingConfig {
    /// `max-age` advertised on company reads
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
}

impl Default for CachingConfig {
    fn default() -> Self {
        Self {
            max_age_secs: default_max_age_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins; empty admits any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_database_url() -> String {
    "sqlite://company_employees.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

fn default_issuer() -> String {
    "CompanyEmployeesAPI".to_string()
}

fn default_audience() -> String {
    "https://localhost:5001".to_string()
}

fn default_expires_minutes() -> i64 {
    5
}

fn default_refresh_token_days() -> i64 {
    7
}

fn default_max_page_size() -> u64 {
    crate::domain::paging::DEFAULT_MAX_PAGE_SIZE
}

fn default_rate_limit() -> u32 {
    30
}

fn default_rate_period_secs() -> u64 {
    300
}

fn default_max_age_secs() -> u64 {
    120
}

fn default_max_body_bytes() -> usize {
    1024 * 1024 // 1MB
}
