//! Read sessions over delimited lines.
//!
//! A session separates configuration from consumption. Methods like
//! [`ReadSession::skip_rows`] and the column directives only record intent;
//! the source is opened by the first consuming call ([`records`],
//! [`collect`], or [`each`]), which also performs skipping and column
//! alignment. Until then nothing is touched, so building a session is free
//! and infallible.
//!
//! Column alignment comes in three forms: explicit 0-based slots,
//! spreadsheet letters, or field names resolved against a header row that
//! the session consumes after skipping. A configured [`Tolerance`] turns
//! matching open failures into an empty sequence instead of an error.
//!
//! [`records`]: ReadSession::records
//! [`collect`]: ReadSession::collect
//! [`each`]: ReadSession::each
//!
//! # Example
//!
//! ```
//! use rowbind::{record, RowCodec};
//!
//! record! {
//!     #[derive(Debug, Default, Clone, PartialEq)]
//!     pub struct Point {
//!         pub x: i32,
//!         pub y: i32,
//!     }
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let codec = RowCodec::<Point>::builder().sep(",").build()?;
//! let points = codec.reader("x,y\n3,4\n5,6").skip_rows(1).collect()?;
//! assert_eq!(points, vec![Point { x: 3, y: 4 }, Point { x: 5, y: 6 }]);
//! # Ok(())
//! # }
//! ```

use anyhow::Context;

use crate::align::{header_slots, letter_slots, split_limit, split_with_limit, Columns};
use crate::codec::RowCodec;
use crate::error::{ConfigError, Tolerance};
use crate::field::Record;
use crate::io::lines::{LineSource, Lines};

/// A configurable, single-use read session over delimited lines.
pub struct ReadSession<T: Record> {
    codec: RowCodec<T>,
    source: LineSource,
    skip: usize,
    columns: Option<Columns>,
    strict: bool,
    tolerance: Option<Tolerance>,
}

impl<T: Record> std::fmt::Debug for ReadSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadSession")
            .field("codec", &self.codec)
            .field("source", &self.source)
            .field("skip", &self.skip)
            .field("columns", &self.columns)
            .field("strict", &self.strict)
            .field("tolerance", &self.tolerance)
            .finish()
    }
}

impl<T: Record> ReadSession<T> {
    pub(crate) fn new(codec: RowCodec<T>, source: LineSource) -> Self {
        Self {
            codec,
            source,
            skip: 0,
            columns: None,
            strict: false,
            tolerance: None,
        }
    }

    /// Skip `n` leading rows before any header or data row is read.
    pub fn skip_rows(mut self, n: usize) -> Self {
        self.skip = n;
        self
    }

    /// Read field `i` from slot `slots[i]`. The last column directive wins.
    pub fn columns(mut self, slots: &[usize]) -> Self {
        self.columns = Some(Columns::Slots(slots.to_vec()));
        self
    }

    /// Read fields from the consecutive slots `start..before`.
    pub fn columns_range(self, start: usize, before: usize) -> Self {
        self.columns(&(start..before).collect::<Vec<_>>())
    }

    /// Read fields from the first `before` slots.
    pub fn columns_before(self, before: usize) -> Self {
        self.columns_range(0, before)
    }

    /// Read fields from spreadsheet-lettered columns, for example `"A,C,F"`.
    ///
    /// # Errors
    ///
    /// `ConfigError` immediately on a malformed letter spec.
    pub fn letter_columns(self, spec: &str) -> Result<Self, ConfigError> {
        let slots = letter_slots(spec)?;
        Ok(self.columns(&slots))
    }

    /// Resolve the participating fields against a header row. The session
    /// consumes one row (after skipping) as the header; a requested name the
    /// header lacks is an `AlignError` at open time.
    pub fn columns_by_name<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.columns = Some(Columns::Names(names.into_iter().map(Into::into).collect()));
        self
    }

    /// Fail at open time when the resolved alignment covers fewer slots than
    /// there are participating fields. The default leaves the uncovered
    /// trailing fields at their defaults.
    pub fn strict_columns(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Treat open failures whose cause chain contains an `E` as an empty
    /// sequence. The usual choice is `std::io::Error` for optional files.
    pub fn tolerate<E: std::error::Error + 'static>(self) -> Self {
        self.tolerate_if(Tolerance::of::<E>())
    }

    /// Treat open failures matching `tolerance` as an empty sequence.
    pub fn tolerate_if(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Open the source, skip, align, and hand back the record iterator.
    ///
    /// # Errors
    ///
    /// Open and alignment failures, unless the configured tolerance absorbs
    /// them; an absorbed failure yields an empty iterator. A strict-columns
    /// violation is a `ConfigError`.
    pub fn records(self) -> anyhow::Result<Records<T>> {
        let Self {
            codec,
            source,
            skip,
            columns,
            strict,
            tolerance,
        } = self;
        match open_lines(codec, source, skip, columns, strict) {
            Ok(mut records) => {
                records.tolerance = tolerance;
                Ok(records)
            }
            Err(err) => match tolerance {
                Some(t) if t.matches(&err) => Ok(Records::empty()),
                _ => Err(err),
            },
        }
    }

    /// Open and collect every record.
    ///
    /// # Errors
    ///
    /// Same as [`ReadSession::records`], plus read failures after open;
    /// tolerated mid-stream failures end the collection quietly instead.
    pub fn collect(self) -> anyhow::Result<Vec<T>> {
        let mut out = Vec::new();
        self.records()?.drive(|record| out.push(record))?;
        Ok(out)
    }

    /// Open and feed every record to `f`. Error behavior matches
    /// [`ReadSession::collect`].
    pub fn each(self, f: impl FnMut(T)) -> anyhow::Result<()> {
        self.records()?.drive(f)
    }
}

fn open_lines<T: Record>(
    codec: RowCodec<T>,
    source: LineSource,
    skip: usize,
    columns: Option<Columns>,
    strict: bool,
) -> anyhow::Result<Records<T>> {
    let label = source.label();
    let mut lines = source.open()?;
    let mut consumed = 0usize;

    for _ in 0..skip {
        match lines.next() {
            Some(Ok(_)) => consumed += 1,
            Some(Err(e)) => return Err(read_error(e, consumed + 1, &label)),
            None => break,
        }
    }

    let slots = match columns {
        None => None,
        Some(Columns::Slots(slots)) => Some(slots),
        Some(Columns::Names(names)) => {
            let observed: Vec<String> = match lines.next() {
                Some(Ok(line)) => {
                    consumed += 1;
                    line.split(codec.sep()).map(str::to_owned).collect()
                }
                Some(Err(e)) => return Err(read_error(e, consumed + 1, &label)),
                None => Vec::new(),
            };
            let slots = header_slots(&names, &observed)
                .with_context(|| format!("align columns in {label}"))?;
            Some(slots)
        }
    };

    let field_count = codec.schema().len();
    if strict {
        if let Some(slots) = &slots {
            if slots.len() < field_count {
                return Err(ConfigError::new(format!(
                    "alignment covers {} of {} fields in {}",
                    slots.len(),
                    field_count,
                    label
                ))
                .into());
            }
        }
    }

    let limit = split_limit(field_count, slots.as_deref());
    Ok(Records {
        drive: Some(Drive {
            codec,
            lines,
            slots,
            limit,
            label,
            consumed,
        }),
        stashed: None,
        tolerance: None,
    })
}

fn read_error(e: std::io::Error, line_no: usize, label: &str) -> anyhow::Error {
    anyhow::Error::new(e).context(format!("read line {line_no} in {label}"))
}

struct Drive<T: Record> {
    codec: RowCodec<T>,
    lines: Lines,
    slots: Option<Vec<usize>>,
    limit: usize,
    label: String,
    consumed: usize,
}

impl<T: Record> Drive<T> {
    fn parse(&self, line: &str) -> T {
        let cells = split_with_limit(line, self.codec.sep(), self.limit);
        self.codec
            .parser()
            .parse_row(cells.as_slice(), self.slots.as_deref())
    }
}

/// The open, single-pass record iterator behind a read session.
///
/// A read failure after a successful open ends the iteration; plain `next()`
/// cannot report it, so it is stashed for [`Records::try_next`] (and for the
/// session's `collect`/`each`, which check it). Dropping the iterator
/// releases the underlying source.
pub struct Records<T: Record> {
    drive: Option<Drive<T>>,
    stashed: Option<anyhow::Error>,
    tolerance: Option<Tolerance>,
}

impl<T: Record> Records<T> {
    pub(crate) fn empty() -> Self {
        Self {
            drive: None,
            stashed: None,
            tolerance: None,
        }
    }

    /// Like `next()`, but surfaces the read failure that ended the
    /// iteration, if any.
    pub fn try_next(&mut self) -> anyhow::Result<Option<T>> {
        match self.next() {
            Some(record) => Ok(Some(record)),
            None => match self.stashed.take() {
                Some(err) => Err(err),
                None => Ok(None),
            },
        }
    }

    pub(crate) fn drive(mut self, mut f: impl FnMut(T)) -> anyhow::Result<()> {
        loop {
            match self.try_next() {
                Ok(Some(record)) => f(record),
                Ok(None) => return Ok(()),
                Err(err) => {
                    return match &self.tolerance {
                        Some(t) if t.matches(&err) => Ok(()),
                        _ => Err(err),
                    };
                }
            }
        }
    }
}

impl<T: Record> Iterator for Records<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let drive = self.drive.as_mut()?;
        match drive.lines.next() {
            Some(Ok(line)) => {
                drive.consumed += 1;
                Some(drive.parse(&line))
            }
            Some(Err(e)) => {
                let err = read_error(e, drive.consumed + 1, &drive.label);
                self.drive = None;
                self.stashed = Some(err);
                None
            }
            None => {
                self.drive = None;
                None
            }
        }
    }
}
