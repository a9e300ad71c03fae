//! Configuration handling for the TUI

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User configuration for the TUI
#[allow(dead_code)]
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    /// Event sort field
    pub event_sort_field: Option<String>,
    /// Event sort direction
    pub event_sort_direction: Option<String>,
    /// Show archived events by default
    pub show_archived_events: Option<bool>,
    /// Daemon address
    pub daemon_address: Option<String>,
    /// Judge identity used for scoring
    pub judge_id: Option<String>,
}

#[allow(dead_code)]
impl TuiConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "summit-ops", "summit-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: TuiConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TuiConfig::default();
        assert!(config.event_sort_field.is_none());
        assert!(config.event_sort_direction.is_none());
        assert!(config.show_archived_events.is_none());
        assert!(config.daemon_address.is_none());
        assert!(config.judge_id.is_none());
    }

    #[test]
    fn test_serialization() {
        let config = TuiConfig {
            event_sort_field: Some("starts_at".to_string()),
            event_sort_direction: Some("desc".to_string()),
            show_archived_events: Some(true),
            daemon_address: Some("http://localhost:50061".to_string()),
            judge_id: Some("judge-7".to_string()),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: TuiConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.event_sort_field, Some("starts_at".to_string()));
        assert_eq!(parsed.event_sort_direction, Some("desc".to_string()));
        assert_eq!(parsed.show_archived_events, Some(true));
        assert_eq!(
            parsed.daemon_address,
            Some("http://localhost:50061".to_string())
        );
        assert_eq!(parsed.judge_id, Some("judge-7".to_string()));
    }

    #[test]
    fn test_partial_serialization() {
        let config = TuiConfig {
            event_sort_field: Some("name".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: TuiConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.event_sort_field, Some("name".to_string()));
        assert!(parsed.event_sort_direction.is_none());
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let json = "{}";
        let parsed: TuiConfig = serde_json::from_str(json).unwrap();
        assert!(parsed.event_sort_field.is_none());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Should ignore unknown fields
        let json = r#"{"event_sort_field": "name", "unknown_field": "value"}"#;
        let parsed: TuiConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.event_sort_field, Some("name".to_string()));
    }

    #[test]
    fn test_load_returns_default_when_no_file() {
        let result = TuiConfig::load();
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_clone() {
        let config = TuiConfig {
            judge_id: Some("judge-7".to_string()),
            ..Default::default()
        };
        let cloned = config.clone();
        assert_eq!(config.judge_id, cloned.judge_id);
    }
}
