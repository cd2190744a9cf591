// Single-instance lock - one worker per ledger
// A stale lock file after a hard crash must be removed by hand

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// PID-file lock held for the lifetime of the process. Released on drop.
pub struct PidLock {
    path: PathBuf,
}

impl PidLock {
    /// Acquire the lock, refusing if the file already exists.
    pub fn acquire<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if path.exists() {
            bail!(
                "lock file {} already exists, another instance may be running",
                path.display()
            );
        }

        fs::write(&path, std::process::id().to_string())
            .with_context(|| format!("failed to write lock file {}", path.display()))?;

        Ok(PidLock { path })
    }
}

impl Drop for PidLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

// ============================================================================
// TESTS
// ============================================================================
