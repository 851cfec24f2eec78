//! Application configuration
//!
//! Loaded from a TOML file. Every section and key is optional; anything
//! missing takes its default, and a missing file yields `AppConfig::default()`.
//!
//! ```toml
//! [server]
//! api_host = "0.0.0.0"
//! api_port = 8080
//!
//! [database]
//! url = "sqlite://./hotel.db?mode=rwc"
//!
//! [reconciliation]
//! interval_secs = 3600
//!
//! [booking]
//! hotel_name = "Mutiara Hotel"
//! whatsapp_number = "6281396554949"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::application::booking::confirmation::DEFAULT_WHATSAPP_NUMBER;
use crate::application::{ConfirmationTemplate, DEFAULT_INTERVAL_SECS};
use crate::infrastructure::DatabaseConfig;
use crate::shared::errors::InfraError;
use crate::shared::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub const CONFIG_ENV: &str = "HOTEL_BOOKING_CONFIG";

/// `$HOTEL_BOOKING_CONFIG`, else `<config dir>/hotel-booking/config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hotel-booking")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub logging: LoggingConfig,
    pub reconciliation: ReconciliationConfig,
    pub booking: BookingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight work on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_connections: db.max_connections,
        }
    }
}

impl From<&DatabaseSettings> for DatabaseConfig {
    fn from(s: &DatabaseSettings) -> Self {
        DatabaseConfig {
            url: s.url.clone(),
            max_connections: s.max_connections,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `hotel_booking=debug`
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    pub enabled: bool,
    pub interval_secs: u64,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    pub hotel_name: String,
    pub whatsapp_number: String,
    pub payment_instructions: String,
    pub default_page_size: u64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        let template = ConfirmationTemplate::default();
        Self {
            hotel_name: template.hotel_name,
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            payment_instructions: template.payment_instructions,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl BookingConfig {
    pub fn template(&self) -> ConfirmationTemplate {
        ConfirmationTemplate {
            hotel_name: self.hotel_name.clone(),
            whatsapp_number: self.whatsapp_number.clone(),
            payment_instructions: self.payment_instructions.clone(),
        }
    }
}

impl AppConfig {
    /// Read `path`; a missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Write as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), InfraError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), InfraError> {
        if self.server.api_port == 0 {
            return Err(InfraError::InvalidConfig("server.api_port must not be 0".into()));
        }
        if self.database.url.trim().is_empty() {
            return Err(InfraError::InvalidConfig("database.url is empty".into()));
        }
        if self.database.max_connections == 0 {
            return Err(InfraError::InvalidConfig(
                "database.max_connections must be at least 1".into(),
            ));
        }
        if !matches!(self.logging.format.to_lowercase().as_str(), "text" | "json") {
            return Err(InfraError::InvalidConfig(format!(
                "logging.format must be 'text' or 'json', got '{}'",
                self.logging.format
            )));
        }
        if self.reconciliation.interval_secs == 0 {
            return Err(InfraError::InvalidConfig(
                "reconciliation.interval_secs must be at least 1".into(),
            ));
        }
        if self.booking.whatsapp_number.is_empty()
            || !self.booking.whatsapp_number.chars().all(|c| c.is_ascii_digit())
        {
            return Err(InfraError::InvalidConfig(
                "booking.whatsapp_number must be digits only".into(),
            ));
        }
        if self.booking.default_page_size == 0 || self.booking.default_page_size > MAX_PAGE_SIZE {
            return Err(InfraError::InvalidConfig(format!(
                "booking.default_page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(())
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.server.api_host, self.server.api_port)
    }
}
