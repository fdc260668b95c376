//! Build event types for JSON output.
//!
//! These events are emitted when using `--message-format=json`, one JSON
//! object per line on stdout.
//!
//! # Event Types
//!
//! - `build-started`: A build attempt for a spec began
//! - `build-finished`: A build attempt reached a result
//! - `package-removed`: A spec was removed
//! - `diagnostic`: A message that would otherwise go to stderr
//!
//! # Stability
//!
//! New fields may be added, but existing fields should not be removed or renamed.

use serde::Serialize;

use crate::builder::orchestrator::{BuildResult, ExtendedBuildResult};
use crate::core::PackageSpec;

/// An event emitted while building or installing.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reason")]
pub enum BuildEvent {
    /// A build attempt began.
    #[serde(rename = "build-started")]
    BuildStarted {
        /// Spec being built (e.g., "zlib:x64-windows")
        spec: PackageSpec,
    },

    /// A build attempt finished with a result.
    #[serde(rename = "build-finished")]
    BuildFinished {
        spec: PackageSpec,
        /// `SUCCEEDED`, `BUILD_FAILED`, ...
        result: BuildResult,
        /// Whether the build succeeded
        success: bool,
        /// Time spent in the external build, in microseconds
        #[serde(skip_serializing_if = "Option::is_none")]
        buildtimeus: Option<u64>,
        /// Specs that must be installed first
        #[serde(skip_serializing_if = "Vec::is_empty")]
        unmet_dependencies: Vec<PackageSpec>,
    },

    /// A package was removed.
    #[serde(rename = "package-removed")]
    PackageRemoved { spec: PackageSpec },

    /// A generic diagnostic message.
    #[serde(rename = "diagnostic")]
    Diagnostic {
        /// Severity level ("error", "warning", "note", "help")
        level: String,
        /// Message text
        message: String,
    },
}

impl BuildEvent {
    /// Create a build started event.
    pub fn started(spec: &PackageSpec) -> Self {
        BuildEvent::BuildStarted { spec: spec.clone() }
    }

    /// Create a build finished event from an attempt's result.
    pub fn finished(spec: &PackageSpec, result: &ExtendedBuildResult) -> Self {
        BuildEvent::BuildFinished {
            spec: spec.clone(),
            result: result.code,
            success: result.is_success(),
            buildtimeus: result.build_time.map(|t| t.as_micros() as u64),
            unmet_dependencies: result.unmet_dependencies.clone(),
        }
    }

    /// Create a package removed event.
    pub fn removed(spec: &PackageSpec) -> Self {
        BuildEvent::PackageRemoved { spec: spec.clone() }
    }

    /// Create a diagnostic event.
    pub fn diagnostic(level: impl Into<String>, message: impl Into<String>) -> Self {
        BuildEvent::Diagnostic {
            level: level.into(),
            message: message.into(),
        }
    }

    /// Serialize this event to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
