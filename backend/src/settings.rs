//! Application settings loaded via OrthoConfig.
//!
//! Values layer CLI flags over `FOOD_*` environment variables over config
//! files. Everything except the database URL has a default.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::keys::{DEFAULT_PRIVATE_KEY_FILE, DEFAULT_PUBLIC_KEY_FILE};

/// Listen address used when `bind_addr` is unset.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Settings that cannot be turned into a running configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("database_url is required (set FOOD_DATABASE_URL)")]
    MissingDatabaseUrl,
    #[error("invalid bind_addr {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
    #[error(
        "token_ttl_hours must be between 1 and {max}, got {0}",
        max = MAX_TOKEN_TTL_HOURS
    )]
    InvalidTokenTtl(i64),
}

/// Runtime configuration for the API server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FOOD")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Directory holding the signing key pair.
    pub key_dir: Option<PathBuf>,
    /// File name of the PKCS#1 private key inside `key_dir`.
    pub private_key_file: Option<String>,
    /// File name of the public key inside `key_dir`.
    pub public_key_file: Option<String>,
    /// Lifetime of issued tokens.
    #[ortho_config(default = 24)]
    pub token_ttl_hours: i64,
    /// Maximum number of pooled database connections.
    #[ortho_config(default = 10)]
    pub pool_max_size: u32,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn key_dir(&self) -> PathBuf {
        self.key_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn private_key_file(&self) -> &str {
        self.private_key_file
            .as_deref()
            .unwrap_or(DEFAULT_PRIVATE_KEY_FILE)
    }

    pub fn public_key_file(&self) -> &str {
        self.public_key_file
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_KEY_FILE)
    }

    pub fn token_ttl_hours(&self) -> Result<i64, SettingsError> {
        match self.token_ttl_hours {
            hours @ 1..=MAX_TOKEN_TTL_HOURS => Ok(hours),
            hours => Err(SettingsError::InvalidTokenTtl(hours)),
        }
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use crate::domain::DEFAULT_TOKEN_VALIDITY_HOURS;
    use crate::outbound::persistence::DEFAULT_POOL_MAX_SIZE;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 7] = [
        "FOOD_BIND_ADDR",
        "FOOD_DATABASE_URL",
        "FOOD_KEY_DIR",
        "FOOD_PRIVATE_KEY_FILE",
        "FOOD_PUBLIC_KEY_FILE",
        "FOOD_TOKEN_TTL_HOURS",
        "FOOD_POOL_MAX_SIZE",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("food-api")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default addr"),
            "0.0.0.0:8000".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(settings.database_url(), Err(SettingsError::MissingDatabaseUrl));
        assert_eq!(settings.key_dir(), PathBuf::from("."));
        assert_eq!(settings.private_key_file(), "app.rsa");
        assert_eq!(settings.public_key_file(), "app.rsa.pub");
        assert_eq!(settings.token_ttl_hours(), Ok(DEFAULT_TOKEN_VALIDITY_HOURS));
        assert_eq!(settings.pool_max_size(), DEFAULT_POOL_MAX_SIZE);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("FOOD_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "FOOD_DATABASE_URL",
                Some("postgres://food@localhost/food".to_owned()),
            ),
            ("FOOD_KEY_DIR", Some("/etc/food".to_owned())),
            ("FOOD_PRIVATE_KEY_FILE", Some("signing.pem".to_owned())),
            ("FOOD_PUBLIC_KEY_FILE", Some("signing.pub.pem".to_owned())),
            ("FOOD_TOKEN_TTL_HOURS", Some("2".to_owned())),
            ("FOOD_POOL_MAX_SIZE", Some("4".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("addr"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(settings.database_url(), Ok("postgres://food@localhost/food"));
        assert_eq!(settings.key_dir(), PathBuf::from("/etc/food"));
        assert_eq!(settings.private_key_file(), "signing.pem");
        assert_eq!(settings.public_key_file(), "signing.pub.pem");
        assert_eq!(settings.token_ttl_hours(), Ok(2));
        assert_eq!(settings.pool_max_size(), 4);
    }

    #[rstest]
    fn invalid_values_are_reported() {
        let _guard = lock_env([
            ("FOOD_BIND_ADDR", Some("not an address".to_owned())),
            ("FOOD_DATABASE_URL", Some("   ".to_owned())),
            ("FOOD_TOKEN_TTL_HOURS", Some("0".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::InvalidBindAddr { .. })
        ));
        assert_eq!(settings.database_url(), Err(SettingsError::MissingDatabaseUrl));
        assert_eq!(
            settings.token_ttl_hours(),
            Err(SettingsError::InvalidTokenTtl(0))
        );
    }

    #[rstest]
    #[case("0")]
    #[case("-3")]
    #[case("8761")]
    #[case("2000000000")]
    fn token_ttl_outside_range_is_rejected(#[case] raw: &str) {
        let _guard = lock_env([
            ("FOOD_DATABASE_URL", None::<String>),
            ("FOOD_TOKEN_TTL_HOURS", Some(raw.to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.token_ttl_hours(),
            Err(SettingsError::InvalidTokenTtl(raw.parse().expect("integer")))
        );
    }

    #[rstest]
    fn longest_token_ttl_is_accepted() {
        let _guard = lock_env([(
            "FOOD_TOKEN_TTL_HOURS",
            Some(MAX_TOKEN_TTL_HOURS.to_string()),
        )]);

        let settings = load_from_empty_args();

        assert_eq!(settings.token_ttl_hours(), Ok(MAX_TOKEN_TTL_HOURS));
    }
}
