use std::path::PathBuf;

use crate::auth::JwtConfig;

/// Server configuration for a marketplace node
///
/// # Environment variables
///
/// Every setting can be overridden through an environment variable:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/mango/market | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | Runtime environment |
/// | LOG_LEVEL | info | Tracing log level |
/// | DELIVERY_FEE | 500 | Flat delivery fee in minor currency units |
/// | TAX_RATE | 0.05 | Tax rate applied to the order subtotal |
/// | DB_TIMEOUT_MS | 5000 | Per-operation storage timeout (milliseconds) |
/// | MAX_CONNECTIONS | 1000 | Concurrent in-flight request limit |
/// | JWT_SECRET | (generated in debug) | HMAC secret, 32 chars minimum |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/mango HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT validation configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Log level passed to the tracing subscriber
    pub log_level: String,

    // === Order pricing ===
    /// Flat delivery fee in minor currency units
    pub delivery_fee: f64,
    /// Tax rate applied to the subtotal (0.05 = 5%)
    pub tax_rate: f64,

    // === Runtime limits ===
    /// Per-operation storage timeout in milliseconds
    pub db_timeout_ms: u64,
    /// Concurrent in-flight request limit
    pub max_connections: usize,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/mango/market".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),

            delivery_fee: std::env::var("DELIVERY_FEE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500.0),
            tax_rate: std::env::var("TAX_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.05),

            db_timeout_ms: std::env::var("DB_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            max_connections: std::env::var("MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
        }
    }

    /// Override the filesystem and port settings
    ///
    /// Commonly used by tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Directory holding the embedded database files
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Directory holding rotated log files
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Create the working directory layout if it does not exist yet
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    /// Whether this node runs in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Whether this node runs in development
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_work_dir_and_port() {
        let config = Config::with_overrides("/tmp/mango-test", 0);
        assert_eq!(config.work_dir, "/tmp/mango-test");
        assert_eq!(config.http_port, 0);
        assert_eq!(
            config.database_dir(),
            PathBuf::from("/tmp/mango-test/database")
        );
        assert_eq!(config.logs_dir(), PathBuf::from("/tmp/mango-test/logs"));
    }

    #[test]
    fn environment_flags() {
        let mut config = Config::with_overrides("/tmp/mango-test", 0);
        config.environment = "production".into();
        assert!(config.is_production());
        assert!(!config.is_development());

        config.environment = "development".into();
        assert!(config.is_development());
        assert!(!config.is_production());
    }
}
