use std::path::PathBuf;
use thiserror::Error;
use miette::Diagnostic;

use crate::map::FileId;

/// Errors raised while loading or querying source inputs.
#[derive(Debug, Error, Diagnostic)]
pub enum SourceError {
    /// The file could not be read from disk
    #[error("Failed to read source file {path}")]
    #[diagnostic(
        code("SOURCE-001"),
        help("Make sure the path exists and has proper permissions")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The id does not belong to this source map
    #[error("Unknown source file id {0}")]
    #[diagnostic(code("SOURCE-002"))]
    UnknownFile(FileId),

    /// The byte offset is outside the file or not on a character boundary
    #[error("Offset {offset} is not a valid position in {file} ({len} bytes)")]
    #[diagnostic(code("SOURCE-003"))]
    OffsetOutOfRange {
        file: String,
        offset: usize,
        len: usize,
    },
}
