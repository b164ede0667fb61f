mod library;

pub use library::{exists, list, remove, resolve};

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, StampoError};

/// File name of the packaged project inside a template bundle.
pub const ARCHIVE_FILE: &str = "project.tar.xz";

/// File name of the metadata descriptor inside a template bundle.
pub const METADATA_FILE: &str = "info.json";

/// Raw shape of a bundle's `info.json`.
#[derive(Debug, Default, Deserialize)]
struct Metadata {
    name: Option<String>,
    author: Option<String>,
    #[serde(default)]
    runners: Vec<PathBuf>,
}

/// Reference to a post-generation runner script.
///
/// Relative paths from `info.json` are resolved against the bundle root
/// here, exactly once; the stored path is absolute thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRef {
    path: PathBuf,
}

impl ScriptRef {
    pub fn new(raw: impl AsRef<Path>, root: &Path) -> ScriptRef {
        let raw = raw.as_ref();
        let path = if raw.is_absolute() {
            raw.to_path_buf()
        } else {
            root.join(raw)
        };
        ScriptRef { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Immutable descriptor of an installed template.
///
/// Produced by resolution, consumed read-only by extraction and the script
/// runner, and discarded after a single generation run.
#[derive(Debug, Clone)]
pub struct TemplateBundle {
    identifier: String,
    display_name: String,
    author: String,
    root_path: PathBuf,
    archive_path: PathBuf,
    scripts: Vec<ScriptRef>,
}

impl TemplateBundle {
    /// Load a bundle from its root directory, parsing `info.json`.
    pub fn load(root: &Path) -> Result<TemplateBundle> {
        let identifier = match root.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => {
                return Err(StampoError::TemplateNotFound {
                    name: root.display().to_string(),
                })
            }
        };

        let metadata_path = root.join(METADATA_FILE);
        let content = std::fs::read_to_string(&metadata_path).map_err(|e| StampoError::Io {
            context: format!("reading template metadata {}", metadata_path.display()),
            source: e,
        })?;
        let metadata: Metadata =
            serde_json::from_str(&content).map_err(|e| StampoError::MetadataParse {
                path: metadata_path,
                source: e,
            })?;

        let display_name = metadata.name.unwrap_or_else(|| identifier.clone());
        let author = metadata.author.unwrap_or_else(|| "unknown".to_string());
        let scripts = metadata
            .runners
            .iter()
            .map(|raw| ScriptRef::new(raw, root))
            .collect();

        Ok(TemplateBundle {
            identifier,
            display_name,
            author,
            root_path: root.to_path_buf(),
            archive_path: root.join(ARCHIVE_FILE),
            scripts,
        })
    }

    /// A directory qualifies as a template bundle iff it holds both the
    /// archive and the metadata descriptor as regular files.
    pub fn qualifies(root: &Path) -> bool {
        root.join(ARCHIVE_FILE).is_file() && root.join(METADATA_FILE).is_file()
    }

    /// The bundle identifier: always the final component of the root path.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Human-readable name from `info.json`, falling back to the identifier.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    /// Post-generation runners, in execution order.
    pub fn scripts(&self) -> &[ScriptRef] {
        &self.scripts
    }
}
