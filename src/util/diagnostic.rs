//! Errors as the user sees them.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;

/// Suggestions shared by several commands.
pub mod suggestions {
    /// Suggestion when the status database holds interrupted installs.
    pub const HALF_INSTALLED: &str = "Run `quay remove <spec>` on each listed package, then reinstall it";

    /// Suggestion when a build cascades.
    pub const INSTALL_DEPENDENCIES: &str = "Run `quay install <spec>` to build dependencies first";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    fn ansi(self) -> &'static str {
        match self {
            Severity::Error => "\x1b[1;31m",
            Severity::Warning => "\x1b[1;33m",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message for the user: what went wrong, what led to it, what to try.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
    /// Underlying causes, outermost first
    pub context: Vec<String>,
    /// Fixes to try, printed as a numbered list
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity,
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Turn one of our typed errors into a diagnostic.
    ///
    /// The `source()` chain becomes context lines and `help` a suggestion.
    pub fn from_miette(err: &dyn MietteDiagnostic) -> Self {
        let mut diag = Diagnostic::error(err.to_string());
        diag.context = std::iter::successors(err.source(), |cause| cause.source())
            .map(|cause| cause.to_string())
            .collect();
        diag.suggestions.extend(err.help().map(|help| help.to_string()));
        diag
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Render for a terminal, with ANSI colors if `color`.
    pub fn format(&self, color: bool) -> String {
        let paint = |code: &str, text: &str| {
            if color {
                format!("{}{}\x1b[0m", code, text)
            } else {
                text.to_string()
            }
        };

        let mut out = format!(
            "{}: {}\n",
            paint(self.severity.ansi(), self.severity.as_str()),
            self.message
        );
        for line in &self.context {
            out.push_str(&format!("  → {}\n", line));
        }
        if !self.suggestions.is_empty() {
            out.push_str(&format!("\n{}: consider:\n", paint("\x1b[1;32m", "help")));
            for (n, suggestion) in self.suggestions.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", n + 1, suggestion));
            }
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PackageSpec, Triplet};

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("Building package zlib:x64-windows failed with: BUILD_FAILED")
            .with_context("cmake exited with code 1")
            .with_suggestion("Run `quay build --verbose` for the full build log");

        let output = diag.format(false);
        assert!(output.starts_with("error: Building package zlib:x64-windows"));
        assert!(output.contains("cmake exited with code 1"));
        assert!(output.contains("help: consider:"));
        assert!(output.contains("1. Run `quay build --verbose`"));
    }

    #[test]
    fn test_from_miette_uses_help() {
        let err = PackageSpec::parse("a:b:c", Triplet::from_canonical_name("x64-windows").unwrap())
            .unwrap_err();

        let diag = Diagnostic::from_miette(&err);
        assert!(diag.message.contains("malformed package spec `a:b:c`"));
        assert_eq!(diag.suggestions.len(), 1);
        assert!(diag.suggestions[0].contains("name:triplet"));
    }
}
