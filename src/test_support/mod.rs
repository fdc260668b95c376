//! Test utilities and mocks for quay unit tests.
//!
//! The mocks stand in for the two external capabilities a build needs: the
//! build runner and the post-build checks.
//!
//! # Example
//!
//! ```rust,ignore
//! use quay::test_support::{installed_db, MockBuildRunner, MockLint, PortFixture};
//!
//! #[test]
//! fn test_example() {
//!     let runner = Arc::new(MockBuildRunner::exiting_with(1));
//!     let lint = Arc::new(MockLint::clean());
//!     let zlib = PortFixture::new("zlib").depends("bzip2").to_source();
//!
//!     // Use mocks in tests...
//! }
//! ```

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Result};

use crate::builder::{BuildOutput, BuildRequest, BuildRunner, PostBuildLint};
use crate::core::PackageSpec;

// Re-export fixtures for convenience
pub use fixtures::*;

#[derive(Debug, Clone, Copy)]
enum RunnerBehavior {
    Exit(i32),
    FailToStart,
}

/// Build runner that records requests instead of building.
#[derive(Debug)]
pub struct MockBuildRunner {
    behavior: RunnerBehavior,
    calls: Mutex<Vec<PackageSpec>>,
}

impl MockBuildRunner {
    fn with_behavior(behavior: RunnerBehavior) -> Self {
        MockBuildRunner {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every build exits with code 0.
    pub fn succeeding() -> Self {
        Self::with_behavior(RunnerBehavior::Exit(0))
    }

    /// Every build exits with `code`.
    pub fn exiting_with(code: i32) -> Self {
        Self::with_behavior(RunnerBehavior::Exit(code))
    }

    /// No build can be started.
    pub fn failing_to_start() -> Self {
        Self::with_behavior(RunnerBehavior::FailToStart)
    }

    /// Specs built so far, in order.
    pub fn calls(&self) -> Vec<PackageSpec> {
        self.calls.lock().unwrap().clone()
    }
}

impl BuildRunner for MockBuildRunner {
    fn run(&self, request: &BuildRequest<'_>) -> Result<BuildOutput> {
        self.calls.lock().unwrap().push(request.spec.clone());
        match self.behavior {
            RunnerBehavior::Exit(exit_code) => Ok(BuildOutput {
                exit_code,
                elapsed: Duration::from_millis(1),
            }),
            RunnerBehavior::FailToStart => bail!("cmake not found"),
        }
    }
}

/// Post-build check reporting a fixed error count.
#[derive(Debug, Default)]
pub struct MockLint {
    errors: usize,
    checked: AtomicUsize,
}

impl MockLint {
    pub fn clean() -> Self {
        Self::with_errors(0)
    }

    pub fn with_errors(errors: usize) -> Self {
        MockLint {
            errors,
            checked: AtomicUsize::new(0),
        }
    }

    /// How many packages have been checked.
    pub fn checked(&self) -> usize {
        self.checked.load(Ordering::SeqCst)
    }
}

impl PostBuildLint for MockLint {
    fn check(&self, _spec: &PackageSpec) -> usize {
        self.checked.fetch_add(1, Ordering::SeqCst);
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::Path;

    use crate::core::Triplet;

    #[test]
    fn test_mock_runner_records_calls() {
        let source = PortFixture::new("zlib").to_source();
        let spec =
            PackageSpec::from_name_and_triplet("zlib", Triplet::from_canonical_name("x64-windows").unwrap())
                .unwrap();
        let env = BTreeMap::new();
        let request = BuildRequest {
            spec: &spec,
            source: &source,
            port_dir: Path::new("ports/zlib"),
            env: &env,
        };

        let runner = MockBuildRunner::exiting_with(4);
        assert_eq!(runner.run(&request).unwrap().exit_code, 4);
        assert_eq!(runner.calls(), [spec.clone()]);

        assert!(MockBuildRunner::failing_to_start().run(&request).is_err());
    }
}
