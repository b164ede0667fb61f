use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StampoError};
use crate::paths;

/// User-level configuration loaded from `<config_dir>/stampo/config.toml`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// Extra template search paths, appended after the built-in defaults so
    /// they take override priority during resolution.
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,

    /// Create missing output directories without requiring `--mkdir`.
    #[serde(default)]
    pub always_mkdir: bool,
}

/// Get the path to the user config file.
fn config_path() -> Option<PathBuf> {
    paths::config_dir().map(|d| d.join("config.toml"))
}

/// Load user configuration from the platform config directory.
///
/// Returns `Ok(None)` if the config file does not exist.
/// Returns `Err` if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<Option<UserConfig>> {
    let path = match config_path() {
        Some(p) => p,
        None => return Ok(None),
    };

    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| StampoError::Io {
        context: format!("reading user config {}", path.display()),
        source: e,
    })?;

    let config: UserConfig =
        toml::from_str(&content).map_err(|e| StampoError::ConfigParse { source: e })?;

    Ok(Some(config))
}

/// Like [`load_user_config`], but a broken config is reported and ignored
/// instead of failing the run.
pub fn load_user_config_or_warn() -> Option<UserConfig> {
    match load_user_config() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("ignoring user config: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_user_config() {
        let toml_str = r#"
search_paths = ["/srv/templates", "/home/me/templates"]
always_mkdir = true
"#;
        let config: UserConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.search_paths.len(), 2);
        assert_eq!(config.search_paths[0], PathBuf::from("/srv/templates"));
        assert!(config.always_mkdir);
    }

    #[test]
    fn parse_empty_config_uses_defaults() {
        let config: UserConfig = toml::from_str("").unwrap();
        assert!(config.search_paths.is_empty());
        assert!(!config.always_mkdir);
    }

    #[test]
    fn parse_malformed_config_errors() {
        let result: std::result::Result<UserConfig, _> = toml::from_str("not valid [[ toml");
        assert!(result.is_err());
    }
}
