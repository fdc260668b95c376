//! Build context - the collaborators and settings one build attempt uses.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::builder::lint::{PackageLayoutLint, PostBuildLint};
use crate::builder::runner::{BuildRunner, CmakeBuildRunner};
use crate::util::GlobalContext;

/// Build context containing the external capabilities and layout.
#[derive(Clone)]
pub struct BuildContext {
    /// External build capability
    pub runner: Arc<dyn BuildRunner>,

    /// Post-build checks
    pub lint: Arc<dyn PostBuildLint>,

    /// Where built packages are laid out, one directory per spec
    pub packages_dir: PathBuf,

    /// Extra environment passed to every build
    pub env: BTreeMap<String, String>,
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("packages_dir", &self.packages_dir)
            .field("env", &self.env)
            .finish_non_exhaustive()
    }
}

impl BuildContext {
    /// A context with the given collaborators and no extra environment.
    pub fn new(
        runner: Arc<dyn BuildRunner>,
        lint: Arc<dyn PostBuildLint>,
        packages_dir: impl Into<PathBuf>,
    ) -> Self {
        BuildContext {
            runner,
            lint,
            packages_dir: packages_dir.into(),
            env: BTreeMap::new(),
        }
    }

    /// The production context: CMake runner and layout lint, configured from `gctx`.
    ///
    /// `--verbose` and `build.debug` reach the build only through the runner.
    pub fn from_global(gctx: &GlobalContext) -> Self {
        let config = &gctx.config().build;
        let runner = CmakeBuildRunner::new(gctx.cmake(), gctx.ports_cmake(), gctx.is_verbose());
        let lint = PackageLayoutLint::new(gctx.packages_dir());

        BuildContext {
            runner: Arc::new(runner),
            lint: Arc::new(lint),
            packages_dir: gctx.packages_dir(),
            env: config.env.clone(),
        }
    }

    /// Directory holding the built package for `dir_name`.
    pub fn package_dir(&self, dir_name: &str) -> PathBuf {
        self.packages_dir.join(dir_name)
    }

    pub fn packages_dir(&self) -> &Path {
        &self.packages_dir
    }
}
