use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Resolve the data directory path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. CASEORG_PATH environment variable (with tilde expansion)
/// 3. XDG data directory (recommended default)
/// 4. ~/.caseorg (fallback for systems without XDG)
pub fn resolve_data_dir(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("CASEORG_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("caseorg"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".caseorg"));
    }

    Err(Error::Config(
        "Could not determine data directory: no HOME directory or XDG data directory found"
            .to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 15,
        }
    }
}

/// What the current user may do on result rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub elevated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsConfig {
    pub max_name_len: usize,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self { max_name_len: 48 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub window: i64,
    pub item_height: f64,
    pub viewport_height: f64,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            window: 80,
            item_height: 20.0,
            viewport_height: 200.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub viewer: ViewerConfig,
    pub results: ResultsConfig,
    pub picker: PickerConfig,
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        if self.picker.window < 1 {
            return Err(Error::Config("picker.window must be at least 1".to_string()));
        }
        if self.picker.item_height <= 0.0 {
            return Err(Error::Config(
                "picker.item_height must be positive".to_string(),
            ));
        }
        if self.results.max_name_len < 8 {
            return Err(Error::Config(
                "results.max_name_len must be at least 8".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.picker.window, 80);
        assert!(!config.viewer.elevated);
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = Config::path_in(temp_dir.path());

        let mut config = Config::default();
        config.server.base_url = "http://office.local:8080".to_string();
        config.viewer.elevated = true;

        config.save_to(&config_path)?;
        assert!(config_path.exists());

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded, config);

        Ok(())
    }

    #[test]
    fn test_partial_file_fills_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = Config::path_in(temp_dir.path());
        std::fs::write(&config_path, "[viewer]\nelevated = true\n")?;

        let loaded = Config::load_from(&config_path)?;
        assert!(loaded.viewer.elevated);
        assert_eq!(loaded.results.max_name_len, 48);
        Ok(())
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path)?;
        assert_eq!(config, Config::default());

        Ok(())
    }

    #[test]
    fn test_invalid_window_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = Config::path_in(temp_dir.path());
        std::fs::write(&config_path, "[picker]\nwindow = 0\n")?;

        assert!(matches!(
            Config::load_from(&config_path),
            Err(Error::Config(_))
        ));
        Ok(())
    }

    #[test]
    fn test_explicit_data_dir_wins() -> Result<()> {
        let resolved = resolve_data_dir(Some("/srv/caseorg"))?;
        assert_eq!(resolved, PathBuf::from("/srv/caseorg"));
        Ok(())
    }
}
