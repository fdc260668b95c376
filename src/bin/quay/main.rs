//! quay CLI - a source package manager for C and C++ libraries

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands, MessageFormat};
use quay::builder::BuildError;
use quay::core::{PackageSpec, ParseError};
use quay::resolver::ResolutionError;
use quay::status::StatusError;
use quay::util::shell::{ColorChoice, Shell};
use quay::util::{Diagnostic, GlobalContext};

/// Settings shared by every command.
pub struct GlobalOptions {
    pub shell: Shell,
    pub gctx: GlobalContext,
    /// `--triplet`, for specs that name none
    pub triplet: Option<String>,
}

impl GlobalOptions {
    /// Parse a spec from the command line, qualifying it with the default triplet.
    pub fn parse_spec(&self, text: &str) -> Result<PackageSpec> {
        let default = self.gctx.default_triplet(self.triplet.as_deref())?;
        Ok(PackageSpec::parse(text, default)?)
    }
}

fn main() {
    let cli = Cli::parse();

    let color = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let shell = Shell::from_flags(cli.verbose, color, cli.message_format == MessageFormat::Json);

    if let Err(e) = run(cli, shell) {
        report(&e);
        std::process::exit(1);
    }
}

fn run(cli: Cli, shell: Shell) -> Result<()> {
    let mut gctx = match cli.root {
        Some(root) => GlobalContext::new(root),
        None => GlobalContext::from_cwd()?,
    };
    gctx.set_verbose(cli.verbose);

    // Set up logging
    let filter = if gctx.is_verbose() {
        EnvFilter::new("quay=debug")
    } else {
        EnvFilter::new("quay=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let global_opts = GlobalOptions {
        shell,
        gctx,
        triplet: cli.triplet,
    };

    // Execute command
    let result = match cli.command {
        Commands::Build(args) => commands::build::execute(args, &global_opts),
        Commands::Install(args) => commands::install::execute(args, &global_opts),
        Commands::Remove(args) => commands::remove::execute(args, &global_opts),
        Commands::List(args) => commands::list::execute(args, &global_opts),
        Commands::Completions(args) => commands::completions::execute(args),
    };

    if let Err(e) = &result {
        if let Some(diag) = typed_diagnostic(e) {
            global_opts.shell.diagnostic(&diag);
            return Err(commands::Reported.into());
        }
    }
    result
}

/// Render errors that carry codes and help text as full diagnostics.
fn typed_diagnostic(err: &anyhow::Error) -> Option<Diagnostic> {
    if let Some(e) = err.downcast_ref::<ResolutionError>() {
        return Some(e.to_diagnostic());
    }
    if let Some(e) = err.downcast_ref::<StatusError>() {
        return Some(Diagnostic::from_miette(e));
    }
    if let Some(e) = err.downcast_ref::<BuildError>() {
        return Some(Diagnostic::from_miette(e));
    }
    if let Some(e) = err.downcast_ref::<ParseError>() {
        return Some(Diagnostic::from_miette(e));
    }
    None
}

fn report(err: &anyhow::Error) {
    if err.downcast_ref::<commands::Reported>().is_none() {
        eprintln!("error: {:#}", err);
    }
}
