//! Sheet rows: binding records to spreadsheet-shaped data.
//!
//! The workbook container is somebody else's business; this module takes
//! whatever rows a workbook crate (or a test) produces, as a [`SheetSource`],
//! and runs the same skip/align/tolerate session over them that delimited
//! text gets. Cells keep their types: numbers feed numeric fields directly
//! instead of round-tripping through text.
//!
//! # Example
//!
//! ```
//! use rowbind::io::sheet::SheetRow;
//! use rowbind::{record, RowCodec};
//!
//! record! {
//!     #[derive(Debug, Default, Clone)]
//!     pub struct Person {
//!         pub name: String,
//!         pub age: i32,
//!     }
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let rows = vec![
//!     SheetRow::from_text(["name", "age"]),
//!     SheetRow::new(vec!["ada".into(), 36.0.into()]),
//! ];
//! let codec = RowCodec::<Person>::builder().build()?;
//! let people = codec.sheet_reader(rows).skip_rows(1).collect()?;
//! assert_eq!(people[0].age, 36);
//! # Ok(())
//! # }
//! ```

use anyhow::Context;

use crate::align::{header_slots, letter_slots, Columns};
use crate::codec::RowCodec;
use crate::error::{ConfigError, Tolerance};
use crate::field::Record;
use crate::row::{Cell, Row};

/// One typed spreadsheet cell.
#[derive(Clone, Debug, PartialEq)]
pub enum SheetCell {
    Text(String),
    Number(f64),
    Bool(bool),
    Blank,
}

impl SheetCell {
    /// Textual rendering, used for header resolution and custom parse
    /// functions.
    pub fn to_text(&self) -> String {
        match self {
            SheetCell::Text(s) => s.clone(),
            SheetCell::Number(n) => n.to_string(),
            SheetCell::Bool(b) => b.to_string(),
            SheetCell::Blank => String::new(),
        }
    }
}

impl From<&str> for SheetCell {
    fn from(s: &str) -> Self {
        SheetCell::Text(s.to_owned())
    }
}

impl From<String> for SheetCell {
    fn from(s: String) -> Self {
        SheetCell::Text(s)
    }
}

impl From<f64> for SheetCell {
    fn from(n: f64) -> Self {
        SheetCell::Number(n)
    }
}

impl From<i32> for SheetCell {
    fn from(n: i32) -> Self {
        SheetCell::Number(n.into())
    }
}

impl From<bool> for SheetCell {
    fn from(b: bool) -> Self {
        SheetCell::Bool(b)
    }
}

/// One row of typed cells in sheet order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SheetRow {
    cells: Vec<SheetCell>,
}

impl SheetRow {
    pub fn new(cells: Vec<SheetCell>) -> Self {
        Self { cells }
    }

    /// A row of text cells, handy for headers and fixtures.
    pub fn from_text<S: Into<String>>(cells: impl IntoIterator<Item = S>) -> Self {
        Self::new(cells.into_iter().map(|s| SheetCell::Text(s.into())).collect())
    }

    pub fn cells(&self) -> &[SheetCell] {
        &self.cells
    }

    fn texts(&self) -> Vec<String> {
        self.cells.iter().map(SheetCell::to_text).collect()
    }
}

impl Row for SheetRow {
    fn width(&self) -> usize {
        self.cells.len()
    }

    fn cell(&self, slot: usize) -> Option<Cell<'_>> {
        self.cells.get(slot).map(|c| match c {
            SheetCell::Text(s) => Cell::Text(s),
            SheetCell::Number(n) => Cell::Number(*n),
            SheetCell::Bool(b) => Cell::Bool(*b),
            SheetCell::Blank => Cell::Blank,
        })
    }
}

type RowIter = Box<dyn Iterator<Item = SheetRow> + Send>;

/// A single-use opener for a stream of sheet rows.
///
/// Adapters wrap their workbook crate here: load the sheet inside the
/// closure and surface load failures from it, then yield rows infallibly.
/// An in-memory grid converts directly.
pub struct SheetSource {
    label: String,
    open: Box<dyn FnOnce() -> anyhow::Result<RowIter> + Send>,
}

impl SheetSource {
    pub fn new(
        label: impl Into<String>,
        open: impl FnOnce() -> anyhow::Result<RowIter> + Send + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            open: Box::new(open),
        }
    }

    /// A source over rows already in memory.
    pub fn from_rows(rows: Vec<SheetRow>) -> Self {
        Self::new("sheet rows", move || {
            Ok(Box::new(rows.into_iter()) as RowIter)
        })
    }

    fn open(self) -> anyhow::Result<RowIter> {
        let label = self.label;
        (self.open)().with_context(|| format!("open {label}"))
    }
}

impl From<Vec<SheetRow>> for SheetSource {
    fn from(rows: Vec<SheetRow>) -> Self {
        SheetSource::from_rows(rows)
    }
}

/// A configurable, single-use read session over sheet rows.
///
/// The configuration surface and open semantics match
/// [`ReadSession`](crate::session::ReadSession); only the rows differ.
pub struct SheetSession<T: Record> {
    codec: RowCodec<T>,
    source: SheetSource,
    skip: usize,
    columns: Option<Columns>,
    strict: bool,
    tolerance: Option<Tolerance>,
}

impl<T: Record> SheetSession<T> {
    pub(crate) fn new(codec: RowCodec<T>, source: SheetSource) -> Self {
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

    /// Resolve the participating fields against a header row, read from the
    /// cells' text.
    pub fn columns_by_name<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.columns = Some(Columns::Names(names.into_iter().map(Into::into).collect()));
        self
    }

    /// Fail at open time when the resolved alignment covers fewer slots than
    /// there are participating fields.
    pub fn strict_columns(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Treat open failures whose cause chain contains an `E` as an empty
    /// sequence.
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
    /// them; an absorbed failure yields an empty iterator.
    pub fn records(self) -> anyhow::Result<SheetRecords<T>> {
        let Self {
            codec,
            source,
            skip,
            columns,
            strict,
            tolerance,
        } = self;
        match open_sheet(codec, source, skip, columns, strict) {
            Ok(records) => Ok(records),
            Err(err) => match tolerance {
                Some(t) if t.matches(&err) => Ok(SheetRecords { inner: None }),
                _ => Err(err),
            },
        }
    }

    /// Open and collect every record.
    pub fn collect(self) -> anyhow::Result<Vec<T>> {
        Ok(self.records()?.collect())
    }

    /// Open and feed every record to `f`.
    pub fn each(self, mut f: impl FnMut(T)) -> anyhow::Result<()> {
        for record in self.records()? {
            f(record);
        }
        Ok(())
    }
}

fn open_sheet<T: Record>(
    codec: RowCodec<T>,
    source: SheetSource,
    skip: usize,
    columns: Option<Columns>,
    strict: bool,
) -> anyhow::Result<SheetRecords<T>> {
    let label = source.label.clone();
    let mut rows = source.open()?;

    for _ in 0..skip {
        if rows.next().is_none() {
            break;
        }
    }

    let slots = match columns {
        None => None,
        Some(Columns::Slots(slots)) => Some(slots),
        Some(Columns::Names(names)) => {
            let observed = rows.next().map(|row| row.texts()).unwrap_or_default();
            let slots = header_slots(&names, &observed)
                .with_context(|| format!("align columns in {label}"))?;
            Some(slots)
        }
    };

    if strict {
        if let Some(slots) = &slots {
            if slots.len() < codec.schema().len() {
                return Err(ConfigError::new(format!(
                    "alignment covers {} of {} fields in {}",
                    slots.len(),
                    codec.schema().len(),
                    label
                ))
                .into());
            }
        }
    }

    Ok(SheetRecords {
        inner: Some(SheetDrive { codec, rows, slots }),
    })
}

struct SheetDrive<T: Record> {
    codec: RowCodec<T>,
    rows: RowIter,
    slots: Option<Vec<usize>>,
}

/// The open, single-pass record iterator behind a sheet session. Dropping
/// it releases the row source.
pub struct SheetRecords<T: Record> {
    inner: Option<SheetDrive<T>>,
}

impl<T: Record> Iterator for SheetRecords<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let drive = self.inner.as_mut()?;
        match drive.rows.next() {
            Some(row) => Some(drive.codec.parser().parse_row(&row, drive.slots.as_deref())),
            None => {
                self.inner = None;
                None
            }
        }
    }
}
