use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::batch::BatchConfig;
use crate::error::{BanksortError, Result};

/// Overrides the settings directory, mainly for tests and CI.
pub const CONFIG_DIR_ENV: &str = "BANKSORT_CONFIG_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_input_dir")]
    pub input_dir: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_mapping_dir")]
    pub mapping_dir: String,
}

fn default_input_dir() -> String {
    "data/input".to_string()
}

fn default_output_dir() -> String {
    "data/processed/01-csv-preprocessing".to_string()
}

fn default_mapping_dir() -> String {
    "mappings".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            mapping_dir: default_mapping_dir(),
        }
    }
}

impl Settings {
    /// Settings with any per-run overrides applied on top.
    pub fn with_overrides(
        &self,
        input_dir: Option<&str>,
        output_dir: Option<&str>,
        mapping_dir: Option<&str>,
    ) -> Settings {
        Settings {
            input_dir: input_dir.map_or_else(|| self.input_dir.clone(), shellexpand_path),
            output_dir: output_dir.map_or_else(|| self.output_dir.clone(), shellexpand_path),
            mapping_dir: mapping_dir.map_or_else(|| self.mapping_dir.clone(), shellexpand_path),
        }
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            input_dir: PathBuf::from(&self.input_dir),
            output_dir: PathBuf::from(&self.output_dir),
            mapping_dir: PathBuf::from(&self.mapping_dir),
        }
    }
}

fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("banksort")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("ignoring unreadable settings at {}: {e}", path.display());
            Settings::default()
        })
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| BanksortError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.input_dir, "data/input");
        assert_eq!(s.output_dir, "data/processed/01-csv-preprocessing");
        assert_eq!(s.mapping_dir, "mappings");
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"input_dir": "/tmp/statements"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.input_dir, "/tmp/statements");
        assert_eq!(s.mapping_dir, "mappings");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            input_dir: "/data/in".to_string(),
            output_dir: "/data/out".to_string(),
            mapping_dir: "/data/mappings".to_string(),
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let loaded: Settings = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_overrides_replace_only_given_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_string_lossy().to_string();
        let s = Settings::default().with_overrides(None, Some(&out), None);
        assert_eq!(s.input_dir, "data/input");
        assert_eq!(s.mapping_dir, "mappings");
        assert_eq!(PathBuf::from(&s.output_dir), std::fs::canonicalize(dir.path()).unwrap());

        let config = s.batch_config();
        assert_eq!(config.input_dir, PathBuf::from("data/input"));
    }
}
