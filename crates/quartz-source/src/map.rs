use std::fmt;
use std::path::Path;
use std::sync::Arc;

use miette::{NamedSource, SourceSpan};
use rustc_hash::FxHashMap;

use crate::error::SourceError;
use crate::file::SourceFile;
use crate::location::Location;

/// Dense handle for a file registered in a [`SourceMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u32);

impl FileId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source text rendered under a diagnostic, with the span to underline.
#[derive(Debug, Clone)]
pub struct Snippet {
    pub source: NamedSource<String>,
    pub span: SourceSpan,
}

/// Owns every source input of a compilation so locations can be resolved
/// back to text.
#[derive(Debug, Default, Clone)]
pub struct SourceMap {
    files: Vec<SourceFile>,
    by_name: FxHashMap<Arc<str>, FileId>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `contents` under `name`. Re-adding a name replaces the text
    /// and keeps the id.
    pub fn add(&mut self, name: impl Into<Arc<str>>, contents: impl Into<String>) -> FileId {
        let file = SourceFile::new(name, contents);

        if let Some(&id) = self.by_name.get(file.name()) {
            log::debug!("replacing source file {}", file.name());
            self.files[id.index()] = file;
            return id;
        }

        let id = FileId(self.files.len() as u32);
        self.by_name.insert(file.name().clone(), id);
        self.files.push(file);
        id
    }

    /// Reads `path` from disk and registers it under its display name.
    pub fn load(&mut self, path: &Path) -> Result<FileId, SourceError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::trace!("loaded {} ({} bytes)", path.display(), contents.len());
        Ok(self.add(path.display().to_string(), contents))
    }

    pub fn get(&self, id: FileId) -> Result<&SourceFile, SourceError> {
        self.files.get(id.index()).ok_or(SourceError::UnknownFile(id))
    }

    pub fn find(&self, name: &str) -> Option<&SourceFile> {
        self.by_name.get(name).map(|id| &self.files[id.index()])
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn location_at(&self, id: FileId, byte_offset: usize) -> Result<Location, SourceError> {
        let file = self.get(id)?;
        file.location_at(byte_offset)
            .ok_or_else(|| SourceError::OffsetOutOfRange {
                file: file.name().to_string(),
                offset: byte_offset,
                len: file.len(),
            })
    }

    /// Source text and span for `location`, if its file is registered and
    /// the position exists in it.
    pub fn snippet(&self, location: &Location) -> Option<Snippet> {
        let file = self.find(location.file())?;
        let offset = file.offset_of(location.position)?;
        let len = file.contents()[offset..]
            .chars()
            .next()
            .filter(|c| *c != '\n')
            .map_or(0, char::len_utf8);

        Some(Snippet {
            source: NamedSource::new(file.name().to_string(), file.contents().to_string()),
            span: SourceSpan::from((offset, len)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_add_and_find() {
        let mut map = SourceMap::new();
        let a = map.add("a.s", "nop\n");
        let b = map.add("b.s", "ret\n");
        assert_ne!(a, b);
        assert_eq!(map.len(), 2);
        assert_eq!(map.find("b.s").unwrap().contents(), "ret\n");
        assert!(map.find("c.s").is_none());
    }

    #[test]
    fn test_re_adding_keeps_id() {
        let mut map = SourceMap::new();
        let first = map.add("a.s", "nop\n");
        let second = map.add("a.s", "ret\n");
        assert_eq!(first, second);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(first).unwrap().contents(), "ret\n");
    }

    #[test]
    fn test_location_at_errors() {
        let mut map = SourceMap::new();
        let id = map.add("a.s", "nop\n");
        assert_eq!(map.location_at(id, 1).unwrap().to_string(), "a.s:1:2");
        assert!(matches!(
            map.location_at(id, 40),
            Err(SourceError::OffsetOutOfRange { offset: 40, len: 4, .. })
        ));

        let empty = SourceMap::new();
        assert!(matches!(empty.get(id), Err(SourceError::UnknownFile(_))));
    }

    #[test]
    fn test_snippet_span() {
        let mut map = SourceMap::new();
        map.add("a.s", "mov rax, 60\nsyscall\n");

        let snippet = map.snippet(&Location::new("a.s", 2, 1)).unwrap();
        assert_eq!(snippet.span.offset(), 12);
        assert_eq!(snippet.span.len(), 1);

        // End of line: zero-width span on the terminator.
        let snippet = map.snippet(&Location::new("a.s", 1, 12)).unwrap();
        assert_eq!(snippet.span.offset(), 11);
        assert_eq!(snippet.span.len(), 0);

        assert!(map.snippet(&Location::new("a.s", 7, 1)).is_none());
        assert!(map.snippet(&Location::new("other.s", 1, 1)).is_none());
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "hlt").unwrap();

        let mut map = SourceMap::new();
        let id = map.load(file.path()).unwrap();
        assert_eq!(map.get(id).unwrap().contents(), "hlt\n");

        let missing = map.load(Path::new("/definitely/not/here.s"));
        assert!(matches!(missing, Err(SourceError::Io { .. })));
    }
}
