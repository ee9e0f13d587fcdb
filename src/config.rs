//! Application configuration
//!
//! Loaded from TOML, by default `~/.config/rental-service/config.toml`.
//! Every section and field has a default, so a missing or partial file
//! still yields a runnable configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::infrastructure::database::DEFAULT_DATABASE_URL;
use crate::shared::InfraError;

const APP_DIR: &str = "rental-service";
const CONFIG_FILE: &str = "config.toml";

/// Default config location, falling back to the working directory when the
/// platform has no config dir.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub reservations: ReservationConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, InfraError> {
        toml::from_str(raw).map_err(|e| InfraError::Config(e.to_string()))
    }

    /// Write the config out, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), InfraError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self).map_err(|e| InfraError::Config(e.to_string()))?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.server.api_host, self.server.api_port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds in-flight requests get to drain after shutdown is signalled.
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".into(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

/// Either a SQLite file `path` or a full connection `url`; `url` wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        match (&self.url, &self.path) {
            (Some(url), _) => url.clone(),
            (None, Some(path)) => format!("sqlite://{}?mode=rwc", path),
            (None, None) => DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".into(),
            jwt_expiration_hours: 24,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".into(),
            email: "admin@rental.local".into(),
            password: "ChangeMe123!".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationConfig {
    pub hold_hours: i64,
    pub expiry_check_interval_secs: u64,
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            hold_hours: 24,
            expiry_check_interval_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.server.api_port, 8080);
        assert_eq!(cfg.reservations.hold_hours, 24);
        assert_eq!(cfg.reservations.expiry_check_interval_secs, 60);
        assert_eq!(cfg.database.connection_url(), DEFAULT_DATABASE_URL);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            api_port = 9100

            [database]
            path = "/var/lib/rental/rental.db"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.api_port, 9100);
        assert_eq!(cfg.server.api_host, "0.0.0.0");
        assert_eq!(
            cfg.database.connection_url(),
            "sqlite:///var/lib/rental/rental.db?mode=rwc"
        );
        assert_eq!(cfg.logging.format, "json");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn url_takes_precedence_over_path() {
        let section = DatabaseSection {
            path: Some("ignored.db".into()),
            url: Some("sqlite::memory:".into()),
        };
        assert_eq!(section.connection_url(), "sqlite::memory:");
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = AppConfig::from_toml("[server\napi_port = 1").unwrap_err();
        assert!(matches!(err, InfraError::Config(_)));
    }

    #[test]
    fn save_then_load_preserves_overrides() {
        let dir = std::env::temp_dir().join(format!("rental-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join(CONFIG_FILE);

        let mut cfg = AppConfig::default();
        cfg.security.jwt_expiration_hours = 6;
        cfg.reservations.hold_hours = 48;
        cfg.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.security.jwt_expiration_hours, 6);
        assert_eq!(loaded.reservations.hold_hours, 48);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
