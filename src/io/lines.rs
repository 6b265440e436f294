//! Line sources: where delimited read sessions get their lines.
//!
//! A [`LineSource`] is a single-use recipe for a stream of lines. Building
//! one touches nothing; the file (or reader) is opened when the owning
//! session opens, and closed when the session's iterator drops.
//!
//! A UTF-8 encoding marker (`\u{FEFF}`) at the very start of the stream is
//! stripped from the first line, so marked and unmarked files read the same.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;

/// A single-use opener for a stream of lines.
///
/// Strings convert to in-memory content, paths to files; arbitrary readers
/// go through [`LineSource::from_reader`].
pub enum LineSource {
    Path(PathBuf),
    Text(String),
    Reader(Box<dyn Read + Send>),
}

impl LineSource {
    /// Wrap an arbitrary reader, for example a socket or a decompressor.
    pub fn from_reader(reader: impl Read + Send + 'static) -> Self {
        LineSource::Reader(Box::new(reader))
    }

    /// A short description for error contexts.
    pub fn label(&self) -> String {
        match self {
            LineSource::Path(path) => path.display().to_string(),
            LineSource::Text(_) => "in-memory text".to_owned(),
            LineSource::Reader(_) => "reader".to_owned(),
        }
    }

    /// Open the source and hand back its lines.
    ///
    /// # Errors
    ///
    /// Failure to open a path source, with the path in the context.
    pub fn open(self) -> anyhow::Result<Lines> {
        let reader: Box<dyn BufRead + Send> = match self {
            LineSource::Path(path) => {
                let f = File::open(&path).with_context(|| format!("open {}", path.display()))?;
                Box::new(BufReader::new(f))
            }
            LineSource::Text(text) => Box::new(Cursor::new(text.into_bytes())),
            LineSource::Reader(r) => Box::new(BufReader::new(r)),
        };
        Ok(Lines {
            inner: reader.lines(),
            first: true,
        })
    }
}

impl From<&Path> for LineSource {
    fn from(path: &Path) -> Self {
        LineSource::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for LineSource {
    fn from(path: PathBuf) -> Self {
        LineSource::Path(path)
    }
}

impl From<&str> for LineSource {
    fn from(text: &str) -> Self {
        LineSource::Text(text.to_owned())
    }
}

impl From<String> for LineSource {
    fn from(text: String) -> Self {
        LineSource::Text(text)
    }
}

impl fmt::Debug for LineSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            LineSource::Text(text) => f.debug_tuple("Text").field(&text.len()).finish(),
            LineSource::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

/// The open stream of lines behind a session, encoding marker already
/// handled. Dropping it closes the underlying file.
pub struct Lines {
    inner: std::io::Lines<Box<dyn BufRead + Send>>,
    first: bool,
}

impl Iterator for Lines {
    type Item = std::io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        if self.first {
            self.first = false;
            return Some(item.map(strip_marker));
        }
        Some(item)
    }
}

fn strip_marker(line: String) -> String {
    match line.strip_prefix('\u{FEFF}') {
        Some(rest) => rest.to_owned(),
        None => line,
    }
}
