use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEV_JWT_SECRET: &str = "dev-secret-change-me-in-production";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// PostgreSQL connection URL. The server still starts without one, but
    /// every store-backed endpoint answers 503.
    pub database_url: Option<String>,
    /// Maximum database connections in the pool.
    pub db_max_connections: u32,
    /// Minimum database connections in the pool.
    pub db_min_connections: u32,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Lifetime of issued sessions.
    pub session_ttl: Duration,
    pub admin_email: String,
    /// Argon2 PHC string for the admin password.
    pub admin_password_hash: Option<String>,
    /// Plaintext admin password, hashed at startup. Development only.
    pub admin_password: Option<String>,
    /// Upper bound for every store call.
    pub store_timeout: Duration,
    /// Largest `limit` a listing accepts.
    pub max_page_limit: u32,
    /// Largest serialized cart, in bytes.
    pub cart_max_bytes: usize,
    /// Carts untouched this long are dropped.
    pub cart_idle_ttl: Duration,
    /// Allowed CORS origins; empty allows any.
    pub cors_origins: Vec<String>,
    /// Event bus channel capacity.
    pub event_bus_capacity: usize,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: FromStr>(
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match var(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed("PORT", 3030, "u16")?,
            database_url: var("DATABASE_URL"),
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 20, "u32")?,
            db_min_connections: parsed("DB_MIN_CONNECTIONS", 5, "u32")?,
            jwt_secret: var("JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.to_string()),
            session_ttl: Duration::from_secs(parsed("SESSION_TTL_SECS", 86_400, "u64")?),
            admin_email: var("ADMIN_EMAIL").unwrap_or_else(|| "admin@temple.local".to_string()),
            admin_password_hash: var("ADMIN_PASSWORD_HASH"),
            admin_password: var("ADMIN_PASSWORD"),
            store_timeout: Duration::from_millis(parsed("STORE_TIMEOUT_MS", 5_000, "u64")?),
            max_page_limit: parsed("MAX_PAGE_LIMIT", 100, "u32")?,
            cart_max_bytes: parsed("CART_MAX_BYTES", 64 * 1024, "usize")?,
            cart_idle_ttl: Duration::from_secs(parsed("CART_IDLE_SECS", 1_800, "u64")?),
            cors_origins: var("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            event_bus_capacity: parsed("EVENT_BUS_CAPACITY", 1024, "usize")?,
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    /// Settings for tests: no database, fixed secret.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            database_url: None,
            db_max_connections: 1,
            db_min_connections: 0,
            jwt_secret: "test-secret".into(),
            session_ttl: Duration::from_secs(3600),
            admin_email: "admin@temple.local".into(),
            admin_password_hash: None,
            admin_password: None,
            store_timeout: Duration::from_millis(500),
            max_page_limit: 100,
            cart_max_bytes: 64 * 1024,
            cart_idle_ttl: Duration::from_secs(1_800),
            cors_origins: Vec::new(),
            event_bus_capacity: 64,
            log_level: "debug".into(),
        }
    }
}
