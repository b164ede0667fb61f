pub mod archive;
pub mod config;
pub mod error;
pub mod paths;
pub mod runner;
pub mod template;
pub mod workdir;

use std::path::PathBuf;

use crate::archive::ExtractionOutcome;
use crate::error::{Result, StampoError};
use crate::runner::ScriptOutcome;
use crate::template::TemplateBundle;

/// Options for the `generate` operation.
pub struct GenerateOptions {
    /// Template name, or path to a template's root directory.
    pub template: String,
    /// Output directory. If None, uses the current directory.
    pub output: Option<PathBuf>,
    /// Extra search paths, highest priority last.
    pub search_paths: Vec<PathBuf>,
    /// Create the output directory if it does not exist.
    pub make_output_dir: bool,
    /// Resolve only; do not extract the project archive.
    pub skip_archive: bool,
    /// Do not execute the template's post-generation runners.
    pub skip_runners: bool,
}

/// What a generation run did, for the caller to report.
#[derive(Debug)]
pub struct GenerationReport {
    pub bundle: TemplateBundle,
    pub output_dir: PathBuf,
    /// None when the archive step was skipped.
    pub extraction: Option<ExtractionOutcome>,
    pub scripts: Vec<ScriptOutcome>,
}

/// Main entry point: materialize a template into an output directory.
pub fn generate(options: GenerateOptions) -> Result<GenerationReport> {
    // 1. Resolve the template across the assembled search paths
    let user_config = config::load_user_config_or_warn();
    let search_paths = paths::assemble_search_paths(user_config.as_ref(), &options.search_paths)?;
    let bundle = template::resolve(&options.template, &search_paths)?;
    log::debug!(
        "resolved template '{}' at {}",
        bundle.identifier(),
        bundle.root_path().display()
    );

    // 2. Determine and validate the output directory
    let output_dir = match options.output {
        Some(out) => out,
        None => std::env::current_dir().map_err(|e| StampoError::Io {
            context: "getting current directory".into(),
            source: e,
        })?,
    };
    let make_output_dir = options.make_output_dir
        || user_config.as_ref().map(|c| c.always_mkdir).unwrap_or(false);
    if !output_dir.is_dir() {
        if !make_output_dir {
            return Err(StampoError::OutputMissing { path: output_dir });
        }
        std::fs::create_dir_all(&output_dir).map_err(|e| StampoError::Io {
            context: format!("creating output directory {}", output_dir.display()),
            source: e,
        })?;
    }

    // 3. Extract the project archive
    let extraction = if options.skip_archive {
        None
    } else {
        let outcome = archive::extract(bundle.archive_path(), &output_dir);
        if let ExtractionOutcome::FatalOpenFailure { reason } = &outcome {
            return Err(StampoError::ArchiveOpen {
                path: bundle.archive_path().to_path_buf(),
                reason: reason.clone(),
            });
        }
        Some(outcome)
    };

    // 4. Run post-generation runners against the fresh tree. A partially
    // written tree is not handed to the runners.
    let aborted = matches!(
        extraction,
        Some(ExtractionOutcome::PartialFailure { .. })
    );
    let scripts = if options.skip_runners || aborted {
        Vec::new()
    } else {
        runner::run(bundle.scripts(), &output_dir)
    };

    Ok(GenerationReport {
        bundle,
        output_dir,
        extraction,
        scripts,
    })
}

/// List every installed template visible through the default search paths
/// plus `extra` (typically `--search-paths` arguments).
pub fn list_templates(extra: &[PathBuf]) -> Result<Vec<TemplateBundle>> {
    let user_config = config::load_user_config_or_warn();
    let search_paths = paths::assemble_search_paths(user_config.as_ref(), extra)?;
    Ok(template::list(&search_paths))
}

/// Convenience wrapper matching [`generate`]'s path handling for callers
/// that only need resolution.
pub fn resolve_template(name_or_path: &str, extra: &[PathBuf]) -> Result<TemplateBundle> {
    let user_config = config::load_user_config_or_warn();
    let search_paths = paths::assemble_search_paths(user_config.as_ref(), extra)?;
    template::resolve(name_or_path, &search_paths)
}
