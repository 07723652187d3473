//! Line sources: opening files, walking directories, loading keywords.

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::debug;

use crate::error::PipelineError;

/// One readable stream yielding text lines in order.
///
/// Produces a lazy, finite sequence of owned lines; read failures surface
/// as [`PipelineError::SourceRead`] naming the source.
pub struct LineSource {
    name: String,
    reader: Box<dyn BufRead + Send>,
}

impl LineSource {
    /// Open a file on disk as a buffered line source.
    pub fn open(path: &Path) -> Result<Self, PipelineError> {
        let name = path.display().to_string();
        let file = File::open(path).map_err(|source| PipelineError::SourceRead {
            name: name.clone(),
            source,
        })?;
        Ok(Self {
            name,
            reader: Box::new(BufReader::new(file)),
        })
    }

    /// Wrap an already-open reader. Used for in-memory sources in tests.
    pub fn from_reader(name: impl Into<String>, reader: impl Read + Send + 'static) -> Self {
        Self {
            name: name.into(),
            reader: Box::new(BufReader::new(reader)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Next line with the trailing newline stripped, or `None` at EOF.
    pub fn next_line(&mut self) -> Result<Option<String>, PipelineError> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|source| PipelineError::SourceRead {
                name: self.name.clone(),
                source,
            })?;
        if read == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}

impl fmt::Debug for LineSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineSource")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Open every regular file under `dir`, sorted by path.
///
/// The sorted order makes source-to-producer assignment deterministic for a
/// given tree. Standard ignore filters are off: the corpus is counted as-is,
/// hidden files included.
pub fn discover_sources(dir: &Path) -> Result<Vec<LineSource>> {
    let mut paths = Vec::new();
    for entry in WalkBuilder::new(dir).standard_filters(false).build() {
        let entry =
            entry.with_context(|| format!("cannot walk directory `{}`", dir.display()))?;
        if entry.file_type().is_some_and(|ft| ft.is_file()) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    debug!("discovered {} files under `{}`", paths.len(), dir.display());

    let mut sources = Vec::with_capacity(paths.len());
    for path in &paths {
        sources.push(LineSource::open(path)?);
    }
    Ok(sources)
}

/// Load the keyword list from a file: whitespace-separated words, any layout.
pub fn load_keywords(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read keyword file `{}`", path.display()))?;
    let keywords: Vec<String> = text.split_whitespace().map(str::to_string).collect();
    debug!("loaded {} keywords from `{}`", keywords.len(), path.display());
    Ok(keywords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn next_line_strips_newlines() {
        let mut source = LineSource::from_reader("mem", Cursor::new("one\ntwo\r\nthree"));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("one"));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("two"));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("three"));
        assert_eq!(source.next_line().unwrap(), None);
    }

    #[test]
    fn empty_reader_yields_no_lines() {
        let mut source = LineSource::from_reader("mem", Cursor::new(""));
        assert_eq!(source.next_line().unwrap(), None);
    }

    #[test]
    fn read_failure_names_the_source() {
        struct BrokenReader;
        impl Read for BrokenReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("simulated read failure"))
            }
        }

        let mut source = LineSource::from_reader("broken.txt", BrokenReader);
        let err = source.next_line().unwrap_err();
        match err {
            PipelineError::SourceRead { name, .. } => assert_eq!(name, "broken.txt"),
            other => panic!("expected source read error, got {other:?}"),
        }
    }

    #[test]
    fn open_missing_file_is_a_source_error() {
        let dir = TempDir::new().unwrap();
        let err = LineSource::open(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, PipelineError::SourceRead { .. }));
    }

    #[test]
    fn discover_sources_is_sorted_and_recursive() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b.txt"), "beta").unwrap();
        fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        fs::write(dir.path().join("sub/c.txt"), "gamma").unwrap();

        let sources = discover_sources(dir.path()).unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(sources.len(), 3);
        assert!(names[0].ends_with("a.txt"));
        assert!(names[1].ends_with("b.txt"));
        assert!(names[2].ends_with("c.txt"));
    }

    #[test]
    fn discover_sources_on_empty_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let sources = discover_sources(dir.path()).unwrap();
        assert!(sources.is_empty());
    }

    #[test]
    fn load_keywords_splits_on_any_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keywords.txt");
        fs::write(&path, "foo bar\nbaz\t qux\n").unwrap();
        let keywords = load_keywords(&path).unwrap();
        assert_eq!(keywords, vec!["foo", "bar", "baz", "qux"]);
    }
}
