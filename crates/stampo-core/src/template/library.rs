use std::path::{Path, PathBuf};

use crate::error::{Result, StampoError};
use crate::template::TemplateBundle;

/// Resolve a template by name or by path to its root directory.
///
/// A bare identifier is matched, case-sensitively, against the names of
/// qualifying subdirectories of each search path in order. Every search path
/// is scanned to completion: when several contain a bundle with the same
/// name, the last one scanned wins, so later (more local) search paths
/// override earlier ones.
pub fn resolve(name_or_path: &str, search_paths: &[PathBuf]) -> Result<TemplateBundle> {
    let direct = Path::new(name_or_path);
    if is_path_like(name_or_path) {
        if TemplateBundle::qualifies(direct) {
            return TemplateBundle::load(direct);
        }
        return Err(StampoError::TemplateNotFound {
            name: name_or_path.to_string(),
        });
    }

    let mut matched: Option<PathBuf> = None;
    for dir in search_paths {
        for root in qualifying_roots(dir) {
            if root.file_name().and_then(|n| n.to_str()) == Some(name_or_path) {
                matched = Some(root);
            }
        }
    }

    match matched {
        Some(root) => TemplateBundle::load(&root),
        None => Err(StampoError::TemplateNotFound {
            name: name_or_path.to_string(),
        }),
    }
}

/// List every qualifying bundle across the search paths, in scan order.
///
/// Missing or unreadable search paths contribute nothing; a bundle whose
/// metadata fails to load is reported and skipped rather than failing the
/// whole listing.
pub fn list(search_paths: &[PathBuf]) -> Vec<TemplateBundle> {
    let mut bundles = Vec::new();
    for dir in search_paths {
        for root in qualifying_roots(dir) {
            match TemplateBundle::load(&root) {
                Ok(bundle) => bundles.push(bundle),
                Err(e) => log::warn!("skipping template at {}: {e}", root.display()),
            }
        }
    }
    bundles
}

/// Returns true if a bundle with the given name is installed.
pub fn exists(name: &str, search_paths: &[PathBuf]) -> bool {
    resolve(name, search_paths).is_ok()
}

/// Remove an installed bundle from disk.
///
/// The name is resolved through the same scan as [`resolve`], so removing an
/// unknown name fails with `TemplateNotFound`.
pub fn remove(name: &str, search_paths: &[PathBuf]) -> Result<()> {
    let bundle = resolve(name, search_paths)?;
    std::fs::remove_dir_all(bundle.root_path()).map_err(|e| StampoError::Io {
        context: format!("removing template {}", bundle.root_path().display()),
        source: e,
    })
}

fn is_path_like(name_or_path: &str) -> bool {
    let path = Path::new(name_or_path);
    path.is_absolute() || path.components().count() > 1
}

/// Immediate subdirectories of `dir` that qualify as template bundles.
fn qualifying_roots(dir: &Path) -> Vec<PathBuf> {
    let read_dir = match std::fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(_) => return Vec::new(),
    };

    let mut roots: Vec<PathBuf> = read_dir
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && TemplateBundle::qualifies(path))
        .collect();

    // read_dir order is platform-dependent; keep the scan deterministic.
    roots.sort();
    roots
}
