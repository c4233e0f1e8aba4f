/// Application configuration: load, save, and sanitize.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "QUERYGEN_CONFIG";

const CONFIG_FILE_NAME: &str = "querygen.json";
const DEFAULT_COLUMN_TYPE: &str = "VARCHAR";
const DEFAULT_EXPORT_FILE_NAME: &str = "schema.json";

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQL type given to newly added columns (e.g. "VARCHAR", "INT").
    pub default_column_type: String,
    /// Whether newly added columns allow NULL.
    pub default_column_nullable: bool,
    /// Pretty-print exported schema JSON.
    pub pretty_export: bool,
    /// File name used when exporting without an explicit path.
    pub export_file_name: String,
    /// Folder exports are written to. Empty = current directory.
    pub export_folder: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_column_type: DEFAULT_COLUMN_TYPE.to_string(),
            default_column_nullable: true,
            pretty_export: true,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            export_folder: String::new(),
        }
    }
}

impl AppConfig {
    /// Returns the config file path.
    ///
    /// Resolution order:
    /// 1. `QUERYGEN_CONFIG` environment variable
    /// 2. `querygen/querygen.json` under the platform config directory
    /// 3. `querygen.json` in the current directory
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .map(|d| d.join("querygen").join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (missing file, parse error, etc.).
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
                    Ok(mut config) => {
                        config.sanitize();
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {}: {e}", path.display());
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {}: {e}", path.display());
                }
            }
            // Return defaults on error (don't overwrite broken file)
            Self::default()
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e}", path.display());
            }
            config
        }
    }

    /// Saves config to `path` as pretty-printed JSON, creating parent
    /// directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Where an export without an explicit path is written.
    ///
    /// Uses `export_folder` when it names an existing directory, otherwise
    /// the current directory.
    pub fn resolve_export_path(&self) -> PathBuf {
        if !self.export_folder.is_empty() {
            let folder = PathBuf::from(&self.export_folder);
            if folder.is_dir() {
                return folder.join(&self.export_file_name);
            }
            tracing::warn!(
                "Export folder {} does not exist, using current directory",
                folder.display()
            );
        }
        PathBuf::from(&self.export_file_name)
    }

    /// Normalizes values and resets invalid fields.
    pub fn sanitize(&mut self) {
        self.default_column_type = self.default_column_type.trim().to_ascii_uppercase();
        if self.default_column_type.is_empty() {
            self.default_column_type = DEFAULT_COLUMN_TYPE.to_string();
        }

        self.export_file_name = self.export_file_name.trim().to_string();
        if self.export_file_name.is_empty() || self.export_file_name.contains(['/', '\\']) {
            self.export_file_name = DEFAULT_EXPORT_FILE_NAME.to_string();
        } else if !self.export_file_name.to_ascii_lowercase().ends_with(".json") {
            self.export_file_name.push_str(".json");
        }

        self.export_folder = self.export_folder.trim().to_string();
    }
}
