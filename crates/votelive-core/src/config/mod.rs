//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod backend;
pub mod cache;
pub mod logging;
pub mod realtime;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::auth::AuthConfig;
pub use self::backend::BackendConfig;
pub use self::cache::{CacheConfig, RedisCacheConfig};
pub use self::logging::LoggingConfig;
pub use self::realtime::{ManagedGatewayConfig, RealtimeConfig};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Key/value store provider settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Token verification settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// CRUD backend the realtime node reads projections from.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Real-time session/transport settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `VOTELIVE__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("VOTELIVE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_section() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.realtime.session_ttl_seconds, 60);
        assert_eq!(config.realtime.heartbeat_interval_seconds, 15);
        assert_eq!(config.cache.provider, "memory");
        assert_eq!(config.auth.vote_token_cookie, "vote_token");
    }
}
