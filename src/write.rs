//! Write sessions: records out to delimited lines.
//!
//! The mirror of [`crate::session`]: configuration first (headers, encoding
//! marker, append mode), then exactly one sink call, which formats every
//! record as a line with a trailing newline. Sinks return the record count,
//! headers excluded.
//!
//! Sessions come from [`RowCodec::write`](crate::RowCodec::write); the JSON
//! writer produces the same type over serialized objects.

use std::borrow::Borrow;
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context};

pub(crate) type LineFn<T> = Box<dyn Fn(&T) -> anyhow::Result<String> + Send + Sync>;

/// The encoding marker written by [`WriteSession::utf8_marker`].
const UTF8_MARKER: &str = "\u{FEFF}";

enum FieldHeader {
    None,
    /// The codec's own header line.
    Auto,
    /// Caller-supplied column names, joined with the codec separator.
    Names(Vec<String>),
}

/// Separator and field header of the owning codec. Sessions without one
/// (the JSON writer) cannot produce field headers.
struct Dialect {
    sep: String,
    header_line: String,
}

/// A configurable, single-use write session over `records`.
pub struct WriteSession<T, I> {
    records: I,
    line: LineFn<T>,
    headers: Vec<String>,
    field_header: FieldHeader,
    marker: bool,
    append: bool,
    dialect: Option<Dialect>,
}

impl<T, I> WriteSession<T, I> {
    pub(crate) fn new(records: I, line: LineFn<T>) -> Self {
        Self {
            records,
            line,
            headers: Vec::new(),
            field_header: FieldHeader::None,
            marker: false,
            append: false,
            dialect: None,
        }
    }

    pub(crate) fn with_dialect(mut self, sep: String, header_line: String) -> Self {
        self.dialect = Some(Dialect { sep, header_line });
        self
    }

    /// Add one verbatim header line. Repeatable; lines keep their order and
    /// precede any field header.
    pub fn header(mut self, line: impl Into<String>) -> Self {
        self.headers.push(line.into());
        self
    }

    /// Write the participating field names as the header line closest to
    /// the data. Replaces any earlier [`WriteSession::column_names`].
    pub fn auto_header(mut self) -> Self {
        self.field_header = FieldHeader::Auto;
        self
    }

    /// Write the given column names as the header line closest to the data.
    /// Replaces any earlier [`WriteSession::auto_header`].
    pub fn column_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.field_header = FieldHeader::Names(names.into_iter().map(Into::into).collect());
        self
    }

    /// Start the output with a UTF-8 encoding marker, for spreadsheet tools
    /// that need one to detect the encoding.
    pub fn utf8_marker(mut self) -> Self {
        self.marker = true;
        self
    }

    /// Append to the target instead of replacing it. Appending suppresses
    /// the marker and every header, so repeated appends stay well-formed.
    pub fn append(mut self) -> Self {
        self.append = true;
        self
    }
}

impl<T, I> WriteSession<T, I>
where
    I: IntoIterator,
    I::Item: Borrow<T>,
{
    /// Write everything to `w`. Flushing is left to the caller.
    ///
    /// # Errors
    ///
    /// Write failures, and a field-header request on a session without a
    /// codec behind it.
    pub fn to_writer(self, mut w: impl Write) -> anyhow::Result<usize> {
        self.write_to(&mut w)
    }

    /// Write everything to the file at `path`, creating parent directories
    /// as needed. Returns the record count.
    ///
    /// # Errors
    ///
    /// Create, write, and flush failures, with the path in the context.
    pub fn to_path(self, path: impl AsRef<Path>) -> anyhow::Result<usize> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
        }
        let file = if self.append {
            OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .with_context(|| format!("append {}", path.display()))?
        } else {
            File::create(path).with_context(|| format!("create {}", path.display()))?
        };
        let mut w = BufWriter::new(file);
        let count = self.write_to(&mut w)?;
        w.flush().with_context(|| format!("flush {}", path.display()))?;
        Ok(count)
    }

    /// Format everything into a string.
    pub fn into_string(self) -> anyhow::Result<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    fn write_to(self, w: &mut impl Write) -> anyhow::Result<usize> {
        if !self.append {
            if self.marker {
                w.write_all(UTF8_MARKER.as_bytes())?;
            }
            for line in &self.headers {
                w.write_all(line.as_bytes())?;
                w.write_all(b"\n")?;
            }
            match &self.field_header {
                FieldHeader::None => {}
                FieldHeader::Auto => {
                    let Some(dialect) = &self.dialect else {
                        bail!("no field header available for this session");
                    };
                    w.write_all(dialect.header_line.as_bytes())?;
                    w.write_all(b"\n")?;
                }
                FieldHeader::Names(names) => {
                    let Some(dialect) = &self.dialect else {
                        bail!("no separator available for column names");
                    };
                    w.write_all(names.join(&dialect.sep).as_bytes())?;
                    w.write_all(b"\n")?;
                }
            }
        }

        let mut count = 0usize;
        for record in self.records {
            let line = (self.line)(record.borrow())?;
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            count += 1;
        }
        Ok(count)
    }
}
