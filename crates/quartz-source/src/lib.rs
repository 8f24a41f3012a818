//! Source inputs for the Quartz toolchain.
//!
//! This crate owns the types every phase uses to talk about *where* something
//! happened:
//! - [`Location`] / [`Position`]: a file name plus 1-based line and column
//! - [`SourceFile`]: loaded text with a line index
//! - [`SourceMap`]: the set of inputs of one compilation, able to turn a
//!   location back into a byte span for snippet rendering
//!
//! Locations are plain values. The lexer creates them, tokens carry them and
//! the diagnostic reporter borrows them for the duration of one report.

mod error;
mod file;
mod location;
mod map;

pub use error::SourceError;
pub use file::SourceFile;
pub use location::{Location, Position};
pub use map::{FileId, SourceMap, Snippet};
