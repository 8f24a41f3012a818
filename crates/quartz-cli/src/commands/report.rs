use std::path::Path;

use quartz_source::{Location, SourceMap};
use quartz_utils::{Fatal, Origin};

/// Raises a fatal diagnostic at `file:line:column`. The file is shown under
/// the message when it can be read; otherwise only the headline is printed.
pub fn handle_report(file: &Path, line: usize, column: usize, message: &str) -> ! {
    let mut sources = SourceMap::new();
    if let Err(err) = sources.load(file) {
        log::info!("{}; reporting without source", err);
    }

    let location = Location::new(file.display().to_string(), line, column);
    Fatal::at(Origin::new(file!(), line!()), &location, message)
        .with_snippet(&sources)
        .raise()
}
