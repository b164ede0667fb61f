mod rhai_runtime;

pub use rhai_runtime::create_engine;

use std::path::{Path, PathBuf};

use crate::template::ScriptRef;
use crate::workdir::ScopedWorkdir;

/// Name of the entry function a runner script may define. It is invoked
/// with no arguments after the script's top-level statements have run.
pub const ENTRY_FN: &str = "setup";

/// Result of one runner script invocation.
#[derive(Debug)]
pub struct ScriptOutcome {
    pub script: PathBuf,
    pub status: ScriptStatus,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ScriptStatus {
    Success,
    /// The referenced script does not exist or is not a regular file.
    NotFound,
    /// The script loaded but failed to compile, raised an error, or its
    /// entry function reported a failure status.
    Failed { message: String },
}

impl ScriptStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ScriptStatus::Success)
    }
}

/// Run the given scripts strictly in list order with `working_dir` as the
/// process working directory for each invocation.
///
/// Each script executes in a fresh engine and scope, so no state leaks
/// between them, and every outcome is collected: one script failing never
/// prevents the scripts after it from running.
pub fn run(scripts: &[ScriptRef], working_dir: &Path) -> Vec<ScriptOutcome> {
    scripts
        .iter()
        .map(|script| {
            let status = run_script(script.path(), working_dir);
            if let ScriptStatus::Failed { message } = &status {
                log::warn!("runner {} failed: {message}", script.path().display());
            }
            ScriptOutcome {
                script: script.path().to_path_buf(),
                status,
            }
        })
        .collect()
}

fn run_script(script: &Path, working_dir: &Path) -> ScriptStatus {
    if !script.is_file() {
        return ScriptStatus::NotFound;
    }

    let source = match std::fs::read_to_string(script) {
        Ok(source) => source,
        Err(e) => {
            return ScriptStatus::Failed {
                message: format!("reading script: {e}"),
            }
        }
    };

    let engine = rhai_runtime::create_engine();
    let ast = match engine.compile(&source) {
        Ok(ast) => ast,
        Err(e) => {
            return ScriptStatus::Failed {
                message: format!("compiling script: {e}"),
            }
        }
    };

    // The working directory is process-global state; the guard restores it
    // when this invocation ends, successful or not.
    let _workdir = match ScopedWorkdir::enter(working_dir) {
        Ok(guard) => guard,
        Err(e) => {
            return ScriptStatus::Failed {
                message: format!("entering {}: {e}", working_dir.display()),
            }
        }
    };

    let mut scope = rhai_runtime::build_scope(working_dir);

    // call_fn evaluates the script's top-level statements before invoking
    // the function, so each branch executes the script body exactly once.
    if defines_entry_fn(&ast) {
        match engine.call_fn::<rhai::Dynamic>(&mut scope, &ast, ENTRY_FN, ()) {
            Ok(value) => entry_fn_status(&value),
            Err(e) => ScriptStatus::Failed {
                message: e.to_string(),
            },
        }
    } else {
        match engine.run_ast_with_scope(&mut scope, &ast) {
            Ok(()) => ScriptStatus::Success,
            Err(e) => ScriptStatus::Failed {
                message: e.to_string(),
            },
        }
    }
}

fn defines_entry_fn(ast: &rhai::AST) -> bool {
    ast.iter_functions()
        .any(|f| f.name == ENTRY_FN && f.params.is_empty())
}

/// Interpret the entry function's return value: a non-zero integer or
/// `false` reports failure, anything else (including unit) is success.
fn entry_fn_status(value: &rhai::Dynamic) -> ScriptStatus {
    if let Some(code) = value.clone().try_cast::<i64>() {
        if code != 0 {
            return ScriptStatus::Failed {
                message: format!("{ENTRY_FN}() returned status {code}"),
            };
        }
    } else if let Some(ok) = value.clone().try_cast::<bool>() {
        if !ok {
            return ScriptStatus::Failed {
                message: format!("{ENTRY_FN}() returned false"),
            };
        }
    }
    ScriptStatus::Success
}
