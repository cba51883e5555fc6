//! CLI command implementations.

pub(crate) mod assets;
pub(crate) mod expand;
pub(crate) mod render;

use std::path::PathBuf;

use clap::Args;
use ghcode::{CodeRenderer, GithubCodeTag, HttpFetcher};
use ghcode_config::{CliSettings, Config};

use crate::error::CliError;

pub(crate) use assets::AssetsArgs;
pub(crate) use expand::ExpandArgs;
pub(crate) use render::RenderArgs;

/// Options shared by commands that fetch and render code.
#[derive(Args)]
pub(crate) struct FetchArgs {
    /// Path to configuration file (default: auto-discover ghcode.toml).
    #[arg(short, long, env = "GHCODE_CONFIG")]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum number of redirects to follow (overrides config).
    #[arg(long)]
    max_redirects: Option<u32>,

    /// Escape code without server-side syntax highlighting.
    #[arg(long)]
    no_highlight: bool,
}

impl FetchArgs {
    /// Load configuration with command-line overrides applied.
    pub(crate) fn load_config(&self, variables: Vec<(String, String)>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            timeout_secs: self.timeout,
            max_redirects: self.max_redirects,
            highlight: self.no_highlight.then_some(false),
            variables,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::debug!(path = %path.display(), "Loaded configuration");
        }
        Ok(config)
    }
}

/// Build the `github_code` tag from configuration.
pub(crate) fn github_code_tag(config: &Config) -> GithubCodeTag {
    let fetcher = HttpFetcher::new()
        .timeout(config.fetch.timeout())
        .max_redirects(config.fetch.max_redirects)
        .user_agent(config.fetch.user_agent.as_str());
    let renderer = CodeRenderer::new().highlight(config.render.highlight);
    GithubCodeTag::with_source(fetcher, renderer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghcode::Tag;

    #[test]
    fn test_github_code_tag_reports_invalid_reference() {
        let tag = github_code_tag(&Config::default());
        let html = tag.render("not-a-reference");
        assert!(html.contains("github-code-error"));
    }
}
