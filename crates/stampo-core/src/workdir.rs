use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

// The process working directory is global mutable state. Every scoped change
// in this process must serialize behind this lock (see ScopedWorkdir).
static CWD_LOCK: Mutex<()> = Mutex::new(());

/// Scoped change of the process working directory.
///
/// Saves the current directory, switches to `dir`, and restores the saved
/// directory on drop — including on panic and error paths. Holding the guard
/// also holds a process-global lock, so overlapping scoped changes from
/// other threads block until this one is restored.
pub struct ScopedWorkdir {
    previous: PathBuf,
    _guard: MutexGuard<'static, ()>,
}

impl ScopedWorkdir {
    pub fn enter(dir: &Path) -> io::Result<ScopedWorkdir> {
        let guard = CWD_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = env::current_dir()?;
        env::set_current_dir(dir)?;
        Ok(ScopedWorkdir {
            previous,
            _guard: guard,
        })
    }

    /// The directory that will be restored when the guard drops.
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for ScopedWorkdir {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.previous) {
            log::error!(
                "failed to restore working directory to {}: {e}",
                self.previous.display()
            );
        }
    }
}
