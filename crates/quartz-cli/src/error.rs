use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors of the driver itself. Fatal diagnostics about the *input* never
/// come back as values; they terminate through `quartz_utils::diagnostic`.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("I/O error while {operation}: {path}")]
    #[diagnostic(code(quartz::cli::io_error))]
    IoError {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {path}")]
    #[diagnostic(
        code(quartz::cli::config_error),
        help("See `quartz-cli init` for the accepted keys")
    )]
    ConfigError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{path} already exists")]
    #[diagnostic(code(quartz::cli::config_exists), help("Pass --force to overwrite it"))]
    ConfigExists { path: PathBuf },

    #[error("Alignment {alignment} is not a positive power of two")]
    #[diagnostic(code(quartz::cli::invalid_alignment))]
    InvalidAlignment { alignment: i64 },

    #[error("Aligning {value} to {alignment} overflows a 64-bit integer")]
    #[diagnostic(code(quartz::cli::alignment_overflow))]
    AlignmentOverflow { value: i64, alignment: i64 },

    #[error("Internal error: {0}")]
    #[diagnostic(code(quartz::cli::internal_error))]
    InternalError(String),
}

/// Convert IO errors with context
pub fn convert_io_error(error: std::io::Error, path: PathBuf, operation: &str) -> CliError {
    CliError::IoError {
        path,
        operation: operation.to_string(),
        source: error,
    }
}
