use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::db::DEFAULT_QUOTA_BYTES;
use crate::sync::DEFAULT_POLL_INTERVAL;
use crate::ui::table::PageSize;
use crate::utils::path::{get_database_path, get_settings_path};
use crate::utils::AppResult;

/// Loggnivå för terminalutskrift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_tracing(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }
}

/// Applikationsinställningar som inte sparas i databas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Egen databassökväg (annars plattformens datakatalog)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    /// Intervall för bevakning av andra anslutningar
    pub poll_interval_ms: u64,
    /// Maximal storlek på lagrad data
    pub storage_quota_bytes: usize,
    /// Sidstorlek för tabeller (10, 25, 50 eller 100)
    pub default_page_size: usize,
    pub log_level: LogLevel,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            database_path: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            storage_quota_bytes: DEFAULT_QUOTA_BYTES,
            default_page_size: 10,
            log_level: LogLevel::default(),
        }
    }
}

impl AppSettings {
    /// Ladda från plattformens konfigurationskatalog, annars standardvärden
    pub fn load() -> Self {
        Self::load_from(&get_settings_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };

        match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ogiltig inställningsfil {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&get_settings_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(get_database_path)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(10))
    }

    /// Sidstorlek, ogiltiga värden ger standard
    pub fn page_size(&self) -> PageSize {
        PageSize::from_value(self.default_page_size).unwrap_or_default()
    }

    /// Kontrollera värden som inte kan uttryckas i typerna
    pub fn validate(&self) -> AppResult<()> {
        if PageSize::from_value(self.default_page_size).is_none() {
            return Err(crate::utils::AppError::validation(format!(
                "Sidstorlek {} stöds inte (10, 25, 50 eller 100)",
                self.default_page_size
            )));
        }
        if self.storage_quota_bytes == 0 {
            return Err(crate::utils::AppError::validation(
                "Lagringskvoten måste vara större än noll",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_settings_toml_roundtrip() {
        let settings = AppSettings {
            poll_interval_ms: 250,
            log_level: LogLevel::Debug,
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let loaded: AppSettings = toml::from_str(&toml_str).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let loaded: AppSettings = toml::from_str("default_page_size = 25\n").unwrap();
        assert_eq!(loaded.page_size(), PageSize::TwentyFive);
        assert_eq!(loaded.poll_interval(), Duration::from_millis(500));
        assert_eq!(loaded.storage_quota_bytes, DEFAULT_QUOTA_BYTES);
        assert_eq!(loaded.log_level.to_tracing(), tracing::Level::WARN);
    }

    #[test]
    fn test_invalid_page_size() {
        let settings = AppSettings {
            default_page_size: 30,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
        assert_eq!(settings.page_size(), PageSize::Ten);
    }

    #[test]
    fn test_load_missing_or_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());

        std::fs::write(&path, "poll_interval_ms = \"snabbt\"").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("settings.toml");
        let settings = AppSettings {
            database_path: Some(PathBuf::from("/tmp/bygg.db")),
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path), settings);
        assert_eq!(settings.database_path(), PathBuf::from("/tmp/bygg.db"));
    }
}
