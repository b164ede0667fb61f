use std::path::Path;

use rhai::{Engine, Scope};

/// Create a sandboxed Rhai engine for a single runner invocation.
///
/// Engines are never shared between runners; each script gets a fresh
/// instance with the standard library and bounded execution limits.
pub fn create_engine() -> Engine {
    let mut engine = Engine::new();

    engine.set_max_call_levels(32);
    engine.set_max_operations(1_000_000);
    engine.set_max_string_size(10 * 1024 * 1024); // 10MB

    engine
}

/// Build the scope a runner script executes in.
pub fn build_scope<'a>(output_dir: &Path) -> Scope<'a> {
    let mut scope = Scope::new();
    scope.push(
        "output_dir".to_string(),
        output_dir.to_string_lossy().to_string(),
    );
    scope
}
