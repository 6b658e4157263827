//! Kiosk API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;

use kiosk_core::TaxRate;

/// Signing secret used when `JWT_SECRET` is not set. Startup logs a warning.
pub const DEV_JWT_SECRET: &str = "kiosk-dev-secret-change-in-production";

/// Kiosk API configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite database URL or plain file path
    pub database_url: String,

    /// Connection pool size
    pub db_max_connections: u32,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// GST rate a freshly created owner profile starts with
    pub owner_default_gst: TaxRate,

    /// HTTP bind host
    pub http_host: String,

    /// HTTP bind port
    pub http_port: u16,

    /// Initial login seeded when the users table is empty
    pub admin_phone: String,
    pub admin_password: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: "sqlite://kiosk.db".to_string(),
            db_max_connections: 5,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_lifetime_secs: 43_200, // 12 hours
            owner_default_gst: TaxRate::from_bps(1800),
            http_host: "0.0.0.0".to_string(),
            http_port: 5000,
            admin_phone: "admin".to_string(),
            admin_password: "admin123".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        let parse = |key: &str| -> Option<Result<String, ConfigError>> {
            lookup(key).map(|v| {
                let v = v.trim().to_string();
                if v.is_empty() {
                    Err(ConfigError::InvalidValue(key.to_string()))
                } else {
                    Ok(v)
                }
            })
        };

        let config = AppConfig {
            database_url: parse("DATABASE_URL")
                .transpose()?
                .unwrap_or(defaults.database_url),

            db_max_connections: parse_number(&lookup, "DB_MAX_CONNECTIONS")?
                .unwrap_or(defaults.db_max_connections),

            jwt_secret: parse("JWT_SECRET").transpose()?.unwrap_or(defaults.jwt_secret),

            jwt_lifetime_secs: parse_number(&lookup, "JWT_LIFETIME_SECS")?
                .unwrap_or(defaults.jwt_lifetime_secs),

            owner_default_gst: match parse_number::<f64, _>(&lookup, "OWNER_DEFAULT_GST")? {
                Some(fraction) => TaxRate::from_fraction(fraction)
                    .ok_or_else(|| ConfigError::InvalidValue("OWNER_DEFAULT_GST".to_string()))?,
                None => defaults.owner_default_gst,
            },

            http_host: parse("HTTP_HOST").transpose()?.unwrap_or(defaults.http_host),

            http_port: parse_number(&lookup, "HTTP_PORT")?.unwrap_or(defaults.http_port),

            admin_phone: parse("ADMIN_PHONE").transpose()?.unwrap_or(defaults.admin_phone),

            admin_password: parse("ADMIN_PASSWORD")
                .transpose()?
                .unwrap_or(defaults.admin_password),
        };

        if config.jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("JWT_LIFETIME_SECS".to_string()));
        }
        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// `host:port` the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// True when tokens are signed with the built-in development secret.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse_number<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| {
            v.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
