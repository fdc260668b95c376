//! Recipes on disk: `ports/<name>/CONTROL`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::SourceParagraph;
use crate::resolver::PortProvider;

/// The `ports/` directory of a quay root.
#[derive(Debug, Clone)]
pub struct PortsDir {
    dir: PathBuf,
}

impl PortsDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        PortsDir { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Directory holding the recipe for `name`.
    pub fn port_dir(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Path of the `CONTROL` file for `name`.
    pub fn control_path(&self, name: &str) -> PathBuf {
        self.port_dir(name).join("CONTROL")
    }
}

impl PortProvider for PortsDir {
    fn load_port(&self, name: &str) -> Result<Option<SourceParagraph>> {
        let path = self.control_path(name);
        if !path.is_file() {
            tracing::debug!("no port `{}` at {}", name, path.display());
            return Ok(None);
        }
        SourceParagraph::load(&path).map(Some)
    }
}
