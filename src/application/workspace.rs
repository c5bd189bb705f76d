//! Per-deployment scratch directory.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Scratch directory `<base_dir>/<template name>` owned by one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    dir: PathBuf,
}

impl Workspace {
    pub fn new(base_dir: impl AsRef<Path>, template_name: &str) -> Self {
        Self {
            dir: base_dir.as_ref().join(template_name),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory. An existing directory is not an error.
    pub fn ensure(&self) -> io::Result<()> {
        if self.dir.is_dir() {
            debug!(path = %self.dir.display(), "Workspace already exists");
            return Ok(());
        }
        std::fs::create_dir_all(&self.dir)?;
        info!(path = %self.dir.display(), "Workspace created");
        Ok(())
    }

    /// Recursively remove the directory.
    pub fn remove(&self) -> io::Result<()> {
        std::fs::remove_dir_all(&self.dir)?;
        info!(path = %self.dir.display(), "Workspace removed");
        Ok(())
    }
}
