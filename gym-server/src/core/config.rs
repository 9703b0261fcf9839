//! Server configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | WORK_DIR | /var/lib/gym/backoffice | Working directory (database, logs) |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | DATABASE_PATH | <WORK_DIR>/gym.db | SQLite database file |
//! | TIMEZONE | America/Mexico_City | Business timezone |
//! | ENVIRONMENT | development | development \| staging \| production |
//!
//! ```ignore
//! WORK_DIR=/data/gym HTTP_PORT=8080 cargo run
//! ```

use chrono_tz::Tz;

#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory: database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// SQLite database path
    pub database_path: String,
    /// Business timezone: calendar days and day boundaries are computed here
    pub timezone: Tz,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let work_dir =
            std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/gym/backoffice".into());
        let database_path = std::env::var("DATABASE_PATH")
            .unwrap_or_else(|_| format!("{}/gym.db", work_dir));
        let timezone = std::env::var("TIMEZONE")
            .ok()
            .and_then(|tz| tz.parse().ok())
            .unwrap_or(chrono_tz::America::Mexico_City);

        Self {
            work_dir,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path,
            timezone,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override work dir, port and database path - used in tests.
    pub fn with_overrides(
        work_dir: impl Into<String>,
        http_port: u16,
        database_path: impl Into<String>,
    ) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config.database_path = database_path.into();
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

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
    fn overrides_apply() {
        let config = Config::with_overrides("/tmp/gym-test", 8088, "/tmp/gym-test/gym.db");
        assert_eq!(config.work_dir, "/tmp/gym-test");
        assert_eq!(config.http_port, 8088);
        assert_eq!(config.database_path, "/tmp/gym-test/gym.db");
    }
}
