//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// quay - a source package manager for C and C++ libraries
#[derive(Parser)]
#[command(name = "quay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output and show build tool output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Triplet for package specs that don't name one (e.g. x64-windows)
    #[arg(long, global = true, value_name = "TRIPLET")]
    pub triplet: Option<String>,

    /// The quay root (defaults to the current directory)
    #[arg(long, global = true, env = "QUAY_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Output format for messages
    #[arg(long, global = true, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// How messages are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    /// Status lines on stderr
    Human,
    /// One JSON event per line on stdout
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build one package whose dependencies are already installed
    Build(BuildArgs),

    /// Build and install packages along with their dependencies
    Install(InstallArgs),

    /// Remove an installed package
    Remove(RemoveArgs),

    /// List installed packages
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Package spec, e.g. zlib or zlib:x64-windows
    pub spec: String,

    /// Only run the post-build checks against an already built package
    #[arg(long)]
    pub checks_only: bool,
}

#[derive(Args)]
pub struct InstallArgs {
    /// Package specs to install
    #[arg(required = true)]
    pub specs: Vec<String>,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Package spec to remove
    pub spec: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only list packages whose name contains this text
    pub filter: Option<String>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "quay",
            "install",
            "zlib",
            "libpng:x86-windows",
            "--triplet",
            "x64-windows",
            "--message-format",
            "json",
            "--root",
            "/tmp/quay",
        ]);

        assert_eq!(cli.triplet.as_deref(), Some("x64-windows"));
        assert_eq!(cli.message_format, MessageFormat::Json);
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/quay")));
        match cli.command {
            Commands::Install(args) => assert_eq!(args.specs, ["zlib", "libpng:x86-windows"]),
            _ => panic!("expected install"),
        }
    }

    #[test]
    fn test_install_requires_a_spec() {
        assert!(Cli::try_parse_from(["quay", "install"]).is_err());
    }
}
