//! Global context for quay operations.
//!
//! Provides centralized access to configuration and the directory layout of
//! a quay root:
//!
//! ```text
//! <root>/
//!   ports/<name>/CONTROL              recipes
//!   triplets/<triplet>.cmake          known triplets
//!   scripts/ports.cmake               build driver script
//!   packages/<name>_<triplet>/        built packages
//!   installed/quay/status.d/          status database
//!   .quay/config.toml                 root-local config
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::Triplet;
use crate::status::StatusStore;
use crate::util::config::{global_config_path, load_config, root_config_path, Config};
use crate::util::process::find_cmake;

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// The quay root every path below derives from
    root: PathBuf,

    /// Merged configuration
    config: Config,

    /// `--verbose` was given
    verbose: bool,
}

impl GlobalContext {
    /// Create a context for `root`, loading global and root-local config.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let config = load_config(global_config_path().as_deref(), &root_config_path(&root));
        Self::with_config(root, config)
    }

    /// Create a context with an explicit configuration.
    pub fn with_config(root: impl Into<PathBuf>, config: Config) -> Self {
        GlobalContext {
            root: root.into(),
            config,
            verbose: false,
        }
    }

    /// Create a context rooted at the current directory.
    pub fn from_cwd() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::new(cwd))
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Check if verbose mode is enabled, from the flag or `build.debug`.
    pub fn is_verbose(&self) -> bool {
        self.verbose || self.config.build.debug.unwrap_or(false)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ports_dir(&self) -> PathBuf {
        self.root.join("ports")
    }

    /// Directory holding the recipe for `name`.
    pub fn port_dir(&self, name: &str) -> PathBuf {
        self.ports_dir().join(name)
    }

    pub fn triplets_dir(&self) -> PathBuf {
        self.root.join("triplets")
    }

    pub fn packages_dir(&self) -> PathBuf {
        self.root.join("packages")
    }

    pub fn installed_dir(&self) -> PathBuf {
        self.root.join("installed")
    }

    /// Directory of per-spec status entries.
    pub fn status_dir(&self) -> PathBuf {
        self.installed_dir().join("quay").join("status.d")
    }

    pub fn status_store(&self) -> StatusStore {
        StatusStore::new(self.status_dir())
    }

    /// The CMake script that builds one port.
    pub fn ports_cmake(&self) -> PathBuf {
        self.root.join("scripts").join("ports.cmake")
    }

    /// The triplet for specs that name none.
    ///
    /// `explicit` (from `--triplet`) wins over `build.default_triplet`, which
    /// wins over the host triplet.
    pub fn default_triplet(&self, explicit: Option<&str>) -> Result<Triplet> {
        match explicit.or(self.config.build.default_triplet.as_deref()) {
            Some(name) => Ok(Triplet::from_canonical_name(name)?),
            None => Ok(Triplet::host()),
        }
    }

    /// Fail unless `triplets/<triplet>.cmake` exists in this root.
    pub fn check_triplet(&self, triplet: Triplet) -> Result<()> {
        let file = self
            .triplets_dir()
            .join(format!("{}.cmake", triplet.canonical_name()));
        if !file.is_file() {
            bail!(
                "invalid triplet `{}`: {} does not exist",
                triplet,
                file.display()
            );
        }
        Ok(())
    }

    /// The cmake executable: `build.cmake` if set, otherwise from PATH.
    ///
    /// Falls back to a bare `cmake` so a missing tool surfaces when a build
    /// actually starts.
    pub fn cmake(&self) -> PathBuf {
        if let Some(cmake) = &self.config.build.cmake {
            return cmake.clone();
        }
        find_cmake().unwrap_or_else(|| PathBuf::from("cmake"))
    }
}
