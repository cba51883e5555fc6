//! `ghcode render` command implementation.

use std::io::Write;

use clap::Args;
use ghcode::render::error_block;

use super::{FetchArgs, github_code_tag};
use crate::error::CliError;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Reference to render (`owner/repo/blob/branch/path[#Lstart[-Lend]]` or a
    /// github.com URL).
    reference: String,

    #[command(flatten)]
    fetch: FetchArgs,
}

impl RenderArgs {
    /// Execute the render command, writing the code block to stdout.
    ///
    /// On failure the error fragment is written instead and the error is
    /// returned, so the process exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is invalid or the file cannot be fetched.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.fetch.load_config(Vec::new())?;
        let result = github_code_tag(&config).try_render(&self.reference);

        let mut stdout = std::io::stdout().lock();
        match result {
            Ok(html) => {
                writeln!(stdout, "{html}")?;
                Ok(())
            }
            Err(err) => {
                writeln!(stdout, "{}", error_block(&err.to_string()))?;
                Err(err.into())
            }
        }
    }
}
