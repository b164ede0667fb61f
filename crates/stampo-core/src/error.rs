use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum StampoError {
    #[error("No template found matching '{name}'")]
    #[diagnostic(help("Run `stampo --list` to see the installed templates"))]
    TemplateNotFound { name: String },

    #[error("Failed to parse template metadata at {path}")]
    #[diagnostic(help("Check the JSON syntax in the template's info.json"))]
    MetadataParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to open archive {path}: {reason}")]
    #[diagnostic(help("The template's project file must be a tar archive compressed with xz"))]
    ArchiveOpen { path: PathBuf, reason: String },

    #[error("Archive extraction into {path} was aborted: {reason}")]
    ExtractionAborted { path: PathBuf, reason: String },

    #[error("Failed to parse user config")]
    #[diagnostic(help("Check the TOML syntax in your stampo config.toml"))]
    ConfigParse {
        #[source]
        source: toml::de::Error,
    },

    #[error("Unable to determine the platform {what} directory")]
    #[diagnostic(help("Set STAMPO_TEMPLATE_PATH or ensure a home directory exists"))]
    PathResolution { what: &'static str },

    #[error("Output directory does not exist: {path}")]
    #[diagnostic(help("Pass --mkdir to create it"))]
    OutputMissing { path: PathBuf },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StampoError>;
