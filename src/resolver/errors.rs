//! Resolution error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::{PackageSpec, ParseError};
use crate::util::diagnostic::Diagnostic;

/// Error while checking or planning dependencies.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ResolutionError {
    #[error("`{package}` declares an invalid dependency `{dependency}`")]
    #[diagnostic(code(quay::resolve::invalid_dependency))]
    InvalidDependencyName {
        package: PackageSpec,
        dependency: String,
        #[source]
        source: ParseError,
    },

    #[error("no port found for `{spec}`")]
    #[diagnostic(code(quay::resolve::missing_port))]
    MissingPort {
        spec: PackageSpec,
        required_by: Option<PackageSpec>,
    },

    #[error("port for `{spec}` declares itself as `{found}`")]
    #[diagnostic(
        code(quay::resolve::mismatched_port),
        help("the `Source` field must match the port directory name")
    )]
    MismatchedPort { spec: PackageSpec, found: String },

    #[error("dependency cycle: {}", format_cycle(specs))]
    #[diagnostic(
        code(quay::resolve::cycle),
        help("break the cycle by removing one of the `Build-Depends` entries")
    )]
    Cycle { specs: Vec<PackageSpec> },

    #[error("failed to load port `{name}`")]
    #[diagnostic(code(quay::resolve::port_load))]
    PortLoad {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

fn format_cycle(specs: &[PackageSpec]) -> String {
    let mut names: Vec<String> = specs.iter().map(ToString::to_string).collect();
    if let Some(first) = names.first().cloned() {
        names.push(first);
    }
    names.join(" -> ")
}

impl ResolutionError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolutionError::InvalidDependencyName {
                package,
                dependency,
                source,
            } => Diagnostic::error(self.to_string())
                .with_context(source.to_string())
                .with_suggestion(format!(
                    "Fix the `Build-Depends` entry `{}` in the port for `{}`",
                    dependency,
                    package.name()
                )),

            ResolutionError::MissingPort { spec, required_by } => {
                let mut diag = Diagnostic::error(self.to_string());
                if let Some(parent) = required_by {
                    diag = diag.with_context(format!("required by `{}`", parent));
                }
                diag.with_suggestion(format!(
                    "Add a recipe at ports/{}/CONTROL",
                    spec.name()
                ))
            }

            ResolutionError::MismatchedPort { spec, .. } => Diagnostic::error(self.to_string())
                .with_suggestion(format!("Set `Source: {}` in the port's CONTROL", spec.name())),

            ResolutionError::Cycle { .. } => Diagnostic::error(self.to_string()).with_suggestion(
                "Break the cycle by removing or restructuring dependencies".to_string(),
            ),

            ResolutionError::PortLoad { source, .. } => {
                Diagnostic::error(self.to_string()).with_context(source.to_string())
            }
        }
    }
}
