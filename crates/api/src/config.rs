use inmo_llm::LlmConfig;
use inmo_storage::StorageConfig;

use crate::auth::session::SessionConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development, except
/// `SESSION_SECRET` which must always be provided.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Session token signing and cookie settings.
    pub session: SessionConfig,
    /// Blob store backend for uploaded photos.
    pub storage: StorageConfig,
    /// Chat-completion endpoint used by the avatar.
    pub llm: LlmConfig,
    /// First gestor account to create on an empty database.
    pub bootstrap: Option<BootstrapGestor>,
}

/// Credentials for the initial gestor account.
#[derive(Clone)]
pub struct BootstrapGestor {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapGestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapGestor")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `BOOTSTRAP_GESTOR_EMAIL`    | --                      |
    /// | `BOOTSTRAP_GESTOR_PASSWORD` | --                      |
    ///
    /// Session, storage and LLM settings are read by their own `from_env`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let bootstrap = match (
            std::env::var("BOOTSTRAP_GESTOR_EMAIL").ok(),
            std::env::var("BOOTSTRAP_GESTOR_PASSWORD").ok(),
        ) {
            (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Some(BootstrapGestor { email, password })
            }
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            session: SessionConfig::from_env(),
            storage: StorageConfig::from_env(),
            llm: LlmConfig::from_env(),
            bootstrap,
        }
    }
}
