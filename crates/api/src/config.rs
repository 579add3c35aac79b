use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Access-token settings.
    pub jwt: JwtConfig,
    /// Entry-code settings.
    pub entry_code: EntryCodeConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8080`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            entry_code: EntryCodeConfig::from_env(),
        }
    }
}

/// Default lifetime of an issued entry code, in seconds.
pub const DEFAULT_ENTRY_CODE_PERIOD_SECS: i64 = 30;

/// Entry-code signing secret and lifetime.
#[derive(Debug, Clone)]
pub struct EntryCodeConfig {
    /// HMAC secret shared by the issuing endpoint and the gate.
    pub secret: String,
    /// Seconds an issued code stays valid.
    pub period_secs: i64,
}

impl EntryCodeConfig {
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `ENTRY_CODE_SECRET`      | **yes**  | --      |
    /// | `ENTRY_CODE_PERIOD_SECS` | no       | `30`    |
    ///
    /// # Panics
    ///
    /// Panics if `ENTRY_CODE_SECRET` is missing or empty, or if the period
    /// is not a positive integer.
    pub fn from_env() -> Self {
        let secret = std::env::var("ENTRY_CODE_SECRET")
            .expect("ENTRY_CODE_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "ENTRY_CODE_SECRET must not be empty");

        let period_secs: i64 = std::env::var("ENTRY_CODE_PERIOD_SECS")
            .unwrap_or_else(|_| DEFAULT_ENTRY_CODE_PERIOD_SECS.to_string())
            .parse()
            .expect("ENTRY_CODE_PERIOD_SECS must be a valid i64");
        assert!(period_secs > 0, "ENTRY_CODE_PERIOD_SECS must be positive");

        Self {
            secret,
            period_secs,
        }
    }
}
