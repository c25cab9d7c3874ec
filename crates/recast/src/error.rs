//! CLI error types rendered through miette.

use miette::Diagnostic;
use recast_common::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error("No recast.toml or recast.json found in {} or any parent", start.display())]
    #[diagnostic(
        code(recast::config::not_found),
        help("Create a recast.toml, or pass --config")
    )]
    ConfigNotFound { start: PathBuf },

    #[error("Invalid rule configuration")]
    #[diagnostic(code(recast::config::rules))]
    Rules(#[source] ConfigError),

    #[error("Input path does not exist: {}", path.display())]
    #[diagnostic(
        code(recast::input::missing),
        help("Set [input] path in recast.toml, or pass --input")
    )]
    InputMissing { path: PathBuf },

    #[error("{0:#}")]
    #[diagnostic(code(recast::io))]
    Other(anyhow::Error),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Other(err)
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Rules(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_keeps_context_chain() {
        let err: CliError = anyhow::anyhow!("disk full")
            .context("Failed to write out/toUserDto.kt")
            .into();
        assert_eq!(err.to_string(), "Failed to write out/toUserDto.kt: disk full");
    }

    #[test]
    fn test_missing_placeholder_is_the_source() {
        let err = CliError::from(ConfigError::MissingPlaceholder { id: "x".into() });
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("Rule 'x' has a template without the {it} placeholder")
        );
    }
}
