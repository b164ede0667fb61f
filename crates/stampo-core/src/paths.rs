use std::env;
use std::path::PathBuf;

use crate::config::UserConfig;
use crate::error::{Result, StampoError};

/// Environment variable holding one extra template search path.
pub const TEMPLATE_PATH_ENV: &str = "STAMPO_TEMPLATE_PATH";

/// Per-user stampo data directory (`<data_dir>/stampo`).
pub fn data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join("stampo"))
        .ok_or(StampoError::PathResolution { what: "data" })
}

/// Per-user stampo config directory (`<config_dir>/stampo`).
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("stampo"))
}

/// Default directories scanned for installed templates.
///
/// Ordered lowest priority first: the per-user data directory, then a
/// `.stampo` directory under the current working directory, then the
/// `STAMPO_TEMPLATE_PATH` override if set. Template resolution lets later
/// entries override earlier ones, so the most local source wins.
pub fn template_search_paths() -> Result<Vec<PathBuf>> {
    let mut paths = vec![data_dir()?.join("templates")];

    let cwd = env::current_dir().map_err(|e| StampoError::Io {
        context: "getting current directory".into(),
        source: e,
    })?;
    paths.push(cwd.join(".stampo"));

    if let Ok(extra) = env::var(TEMPLATE_PATH_ENV) {
        if !extra.is_empty() {
            paths.push(PathBuf::from(extra));
        }
    }

    Ok(paths)
}

/// Full search-path list for a run: defaults, then entries from the user
/// config, then `extra` (typically `--search-paths` arguments), in that
/// order so the caller-supplied entries take override priority.
pub fn assemble_search_paths(
    config: Option<&UserConfig>,
    extra: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    let mut paths = template_search_paths()?;

    if let Some(cfg) = config {
        paths.extend(cfg.search_paths.iter().cloned());
    }

    paths.extend(extra.iter().cloned());
    Ok(paths)
}
