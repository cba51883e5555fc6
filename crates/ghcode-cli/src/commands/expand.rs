//! `ghcode expand` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use ghcode::TagRegistry;

use super::{FetchArgs, github_code_tag};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the expand command.
#[derive(Args)]
pub(crate) struct ExpandArgs {
    /// File containing `{% github_code ... %}` tags.
    file: PathBuf,

    /// Write the result to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Template variable available to tag markup (repeatable).
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_variable)]
    variables: Vec<(String, String)>,

    #[command(flatten)]
    fetch: FetchArgs,
}

impl ExpandArgs {
    /// Execute the expand command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or file I/O fails. Failed embeds are
    /// reported inline in the output and do not fail the command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.fetch.load_config(self.variables)?;

        let text = std::fs::read_to_string(&self.file)?;
        let registry = TagRegistry::new()
            .register(github_code_tag(&config))
            .with_variables(config.variables.clone());
        let expanded = registry.expand(&text);

        match &self.output {
            Some(path) => {
                std::fs::write(path, &expanded)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(expanded.as_bytes())?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

/// Parse a `NAME=VALUE` pair.
fn parse_variable(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {s:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty variable name in {s:?}"));
    }
    Ok((name.to_owned(), value.to_owned()))
}
