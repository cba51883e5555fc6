//! ghcode CLI - embed GitHub code excerpts into HTML.
//!
//! Provides commands for:
//! - `render`: Render one reference as an HTML code block
//! - `expand`: Expand `{% github_code ... %}` tags in a file
//! - `assets`: Write the stylesheet and copy-button script

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AssetsArgs, ExpandArgs, RenderArgs};
use output::Output;

/// ghcode - embed GitHub code excerpts into HTML.
#[derive(Parser)]
#[command(name = "ghcode", version, about)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single reference to stdout.
    Render(RenderArgs),
    /// Expand tags in a file.
    Expand(ExpandArgs),
    /// Write bundled CSS and JS assets.
    Assets(AssetsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Expand(args) => args.execute(),
        Commands::Assets(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_expand_variables() {
        let cli = Cli::try_parse_from([
            "ghcode",
            "expand",
            "page.html",
            "--var",
            "snippet=owner/repo/blob/main/a.rs",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Expand(_)));
    }

    #[test]
    fn test_parse_render_rejects_missing_reference() {
        assert!(Cli::try_parse_from(["ghcode", "render"]).is_err());
    }
}
