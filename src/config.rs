use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,
    /// Maximum database connections in pool
    pub database_max_connections: u32,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Base URL of the external code-hosting platform API
    pub platform_api_url: String,
    /// Age in days after which crawled user data is considered stale (default: 7)
    pub crawl_ttl_days: i64,
    /// Default recommendation page size (default: 25)
    pub default_count: i64,
    /// Over-fetch multiplier for the candidate pager (default: 2)
    pub overfetch_multiplier: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL"))?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let platform_api_url =
            env::var("PLATFORM_API_URL").unwrap_or_else(|_| "https://api.github.com".to_string());

        let crawl_ttl_days = env::var("CRAWL_TTL_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("CRAWL_TTL_DAYS"))?;

        let default_count = env::var("DEFAULT_COUNT")
            .unwrap_or_else(|_| "25".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DEFAULT_COUNT"))?;

        let overfetch_multiplier = env::var("OVERFETCH_MULTIPLIER")
            .unwrap_or_else(|_| "2".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("OVERFETCH_MULTIPLIER"))?;

        if overfetch_multiplier < 1 {
            return Err(ConfigError::InvalidValue("OVERFETCH_MULTIPLIER"));
        }

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            platform_api_url,
            crawl_ttl_days,
            default_count,
            overfetch_multiplier,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_database_url_is_an_error() {
        // Only run when the variable is genuinely absent, to avoid
        // interfering with integration test environments.
        if env::var("DATABASE_URL").is_err() {
            assert!(matches!(
                Config::from_env(),
                Err(ConfigError::MissingEnvVar("DATABASE_URL"))
            ));
        }
    }
}
