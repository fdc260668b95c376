//! Where command output goes.
//!
//! In human mode, right-aligned status words and diagnostics go to stderr
//! and command results (like `quay list` rows) to stdout. In JSON mode only
//! JSON events are printed, one per line on stdout.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

use crate::builder::BuildEvent;
use crate::util::diagnostic::Diagnostic;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellMode {
    Human {
        verbosity: Verbosity,
        color: ColorChoice,
    },
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Normal,
    /// `--verbose`: debug logging and build tool output
    Verbose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Color when stderr is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

/// The word printed in front of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Built,
    Installed,
    Removed,
    Finished,
    Building,
    Planning,
    Skipped,
    Info,
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Status::Built => "Built",
            Status::Installed => "Installed",
            Status::Removed => "Removed",
            Status::Finished => "Finished",
            Status::Building => "Building",
            Status::Planning => "Planning",
            Status::Skipped => "Skipped",
            Status::Info => "Info",
        }
    }

    /// Bold green for done, cyan for underway, yellow for skipped.
    fn ansi(self) -> &'static str {
        match self {
            Status::Built | Status::Installed | Status::Removed | Status::Finished => "\x1b[1;32m",
            Status::Building | Status::Planning => "\x1b[1;36m",
            Status::Skipped => "\x1b[1;33m",
            Status::Info => "\x1b[1;34m",
        }
    }
}

const STATUS_WIDTH: usize = 12;

#[derive(Debug)]
pub struct Shell {
    mode: ShellMode,
    use_color: bool,
}

impl Shell {
    pub fn new(mode: ShellMode) -> Self {
        let use_color = match mode {
            ShellMode::Json => false,
            ShellMode::Human {
                color: ColorChoice::Auto,
                ..
            } => io::stderr().is_terminal(),
            ShellMode::Human {
                color: ColorChoice::Always,
                ..
            } => true,
            ShellMode::Human {
                color: ColorChoice::Never,
                ..
            } => false,
        };

        Shell { mode, use_color }
    }

    /// The shell selected by the global CLI flags. `json` overrides `verbose`.
    pub fn from_flags(verbose: bool, color: ColorChoice, json: bool) -> Self {
        if json {
            return Shell::new(ShellMode::Json);
        }
        let verbosity = if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Shell::new(ShellMode::Human { verbosity, color })
    }

    pub fn is_verbose(&self) -> bool {
        matches!(&self.mode, ShellMode::Human { verbosity, .. } if *verbosity == Verbosity::Verbose)
    }

    pub fn is_json(&self) -> bool {
        self.mode == ShellMode::Json
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// `{status:>12} {msg}` on stderr.
    pub fn status(&self, status: Status, msg: impl Display) {
        if !self.is_json() {
            eprintln!("{} {}", self.status_label(status), msg);
        }
    }

    pub fn note(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    /// A line of command output on stdout.
    pub fn print(&self, line: impl Display) {
        if !self.is_json() {
            println!("{}", line);
        }
    }

    /// Free-form text on stderr.
    pub fn message(&self, msg: impl Display) {
        if !self.is_json() {
            eprintln!("{}", msg);
        }
    }

    /// A diagnostic on stderr, or a `diagnostic` event in JSON mode.
    pub fn diagnostic(&self, diag: &Diagnostic) {
        if self.is_json() {
            self.emit(&BuildEvent::diagnostic(diag.severity.to_string(), &diag.message));
        } else {
            eprint!("{}", diag.format(self.use_color));
        }
    }

    pub fn emit(&self, event: &BuildEvent) {
        if self.is_json() {
            self.write_json_line(&event.to_json());
        }
    }

    /// An event that is not a [`BuildEvent`], e.g. one row of `quay list`.
    pub fn json_event(&self, event: &serde_json::Value) {
        if self.is_json() {
            self.write_json_line(&event.to_string());
        }
    }

    fn write_json_line(&self, line: &str) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }

    fn status_label(&self, status: Status) -> String {
        let label = format!("{:>width$}", status.label(), width = STATUS_WIDTH);
        if self.use_color {
            format!("{}{}\x1b[0m", status.ansi(), label)
        } else {
            label
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::from_flags(false, ColorChoice::Auto, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        let shell = Shell::from_flags(false, ColorChoice::Never, false);
        assert!(!shell.is_verbose());
        assert!(!shell.is_json());
        assert!(!shell.use_color());

        let verbose = Shell::from_flags(true, ColorChoice::Never, false);
        assert!(verbose.is_verbose());

        let json = Shell::from_flags(true, ColorChoice::Always, true);
        assert!(json.is_json());
        assert!(!json.is_verbose());
        assert!(!json.use_color());
    }

    #[test]
    fn test_status_label_is_right_aligned() {
        let shell = Shell::from_flags(false, ColorChoice::Never, false);

        assert_eq!(shell.status_label(Status::Installed), "   Installed");
        assert_eq!(shell.status_label(Status::Built).len(), STATUS_WIDTH);
    }

    #[test]
    fn test_colored_label() {
        let shell = Shell::from_flags(false, ColorChoice::Always, false);

        assert_eq!(
            shell.status_label(Status::Removed),
            "\x1b[1;32m     Removed\x1b[0m"
        );
    }
}
