//! Error types for toucan_build_tools operations.
//!
//! This module defines the crate-level error with actionable messages and
//! recovery suggestions.

use crate::mesh::MeshError;
use thiserror::Error;

/// Result type alias for toucan_build_tools operations
pub type Result<T> = std::result::Result<T, ToolError>;

/// Main error type for all toucan_build_tools operations
#[derive(Error, Debug)]
pub enum ToolError {
    /// Bundle assembly errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Mesh conversion errors
    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },
}

impl ToolError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error as BundlerError;

        match self {
            ToolError::Bundler(BundlerError::MissingLibrary { name, .. }) => vec![
                format!("Build the {name} target before packaging the app"),
                "Pass --out-dir pointing at the directory holding the build artifacts".to_string(),
            ],
            ToolError::Bundler(BundlerError::SigningFailed { .. }) => vec![
                "List available identities: security find-identity -v -p codesigning".to_string(),
                "Check that --team-identifier matches the provisioning profile".to_string(),
            ],
            ToolError::Bundler(BundlerError::InvalidSettings(_)) | ToolError::Cli(_) => vec![
                "Run with --help to see the accepted arguments".to_string(),
            ],
            ToolError::Bundler(e) if e.is_not_found() => vec![
                "Check that the executable exists in the output directory".to_string(),
                "Pass --out-dir if the artifacts are not in the current directory".to_string(),
            ],
            ToolError::Mesh(MeshError::Parse(_)) => vec![
                "The input must contain \"cells\" index triples and \"positions\" coordinate triples".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
