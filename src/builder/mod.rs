//! Package build orchestration.
//!
//! This module drives a single spec through build, lint and recording, and
//! defines the external capabilities it relies on.

pub mod context;
pub mod events;
pub mod lint;
pub mod orchestrator;
pub mod runner;

pub use context::BuildContext;
pub use events::BuildEvent;
pub use lint::{PackageLayoutLint, PostBuildLint};
pub use orchestrator::{
    build_package, create_cascade_message, create_error_message,
    create_user_troubleshooting_message, BuildError, BuildResult, BuildState, ExtendedBuildResult,
};
pub use runner::{BuildOutput, BuildRequest, BuildRunner, CmakeBuildRunner};
