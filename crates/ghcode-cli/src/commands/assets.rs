//! `ghcode assets` command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the assets command.
#[derive(Args)]
pub(crate) struct AssetsArgs {
    /// Site output directory; files go under `assets/github-code/`.
    dest: PathBuf,
}

impl AssetsArgs {
    /// Execute the assets command.
    ///
    /// # Errors
    ///
    /// Returns an error if the files cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        if self.dest.is_file() {
            return Err(CliError::Validation(format!(
                "{} is a file, expected a directory",
                self.dest.display()
            )));
        }

        for path in ghcode::assets::write_assets(&self.dest)? {
            output.info(&format!("  {}", path.display()));
        }
        output.success("Assets written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_file_destination() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let args = AssetsArgs {
            dest: file.path().to_path_buf(),
        };
        assert!(matches!(args.execute(), Err(CliError::Validation(_))));
    }

    #[test]
    fn test_writes_assets() {
        let dir = tempfile::tempdir().unwrap();
        let args = AssetsArgs {
            dest: dir.path().to_path_buf(),
        };
        args.execute().unwrap();
        assert!(
            dir.path()
                .join("assets/github-code/js/github-code.js")
                .is_file()
        );
    }
}
