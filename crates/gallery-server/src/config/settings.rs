use anyhow::Result;
use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub database: DatabaseConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Mark cookies `Secure` even when no proxy reports https.
    pub force_secure_cookies: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SecurityConfig {
    /// HMAC key for the NSFW consent cookie. Unset = session-only consent.
    #[serde(default)]
    pub consent_secret: Option<String>,
    /// Argon2 PHC string. Unset = admin login disabled.
    #[serde(default)]
    pub admin_password_hash: Option<String>,
    pub session_inactivity_seconds: i64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_max_size: u32,
    pub pool_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MediaConfig {
    pub root: PathBuf,
}

impl Settings {
    /// defaults -> config/settings.{toml,...} -> APP__SECTION__KEY env vars
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::with_defaults(Config::builder())?
            .add_source(File::with_name("config/settings").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    fn with_defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.force_secure_cookies", false)?
            .set_default("security.session_inactivity_seconds", 24 * 60 * 60)?
            .set_default("database.url", "postgres://localhost/gallery")?
            .set_default("database.pool_max_size", 10)?
            .set_default("database.pool_timeout_seconds", 5)?
            .set_default("media.root", "storage/media")
    }

    pub fn consent_secret(&self) -> Option<&str> {
        self.security
            .consent_secret
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn admin_password_hash(&self) -> Option<&str> {
        self.security
            .admin_password_hash
            .as_deref()
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings: Settings = Settings::with_defaults(Config::builder())
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 8080);
        assert!(!settings.server.force_secure_cookies);
        assert_eq!(settings.security.session_inactivity_seconds, 86_400);
        assert_eq!(settings.media.root, PathBuf::from("storage/media"));
        assert!(settings.consent_secret().is_none());
        assert!(settings.admin_password_hash().is_none());
    }

    #[test]
    fn test_overrides() {
        let settings: Settings = Settings::with_defaults(Config::builder())
            .unwrap()
            .set_override("security.consent_secret", "  s3cret  ")
            .unwrap()
            .set_override("server.port", 9000)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.consent_secret(), Some("s3cret"));
    }

    #[test]
    fn test_blank_secret_counts_as_unset() {
        let settings: Settings = Settings::with_defaults(Config::builder())
            .unwrap()
            .set_override("security.consent_secret", "")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(settings.consent_secret().is_none());
    }
}
