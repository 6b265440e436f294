//! Row-to-record conversion.
//!
//! A [`RowParser`] pairs each participating field with the conversion that
//! fills it: the canonical scalar conversion, a registered custom parse
//! function, or a text preprocessor stacked in front of the canonical
//! conversion. The pairing is fixed when the codec is built.
//!
//! Parsing is total: a missing cell or a failed conversion leaves that one
//! field at its default value and moves on to the next.

use crate::coerce::{parse_cell, ConvertError};
use crate::field::{FieldDef, FieldKind, FieldValue, Record};
use crate::row::{Cell, Row};

/// A registered custom parse function: cell text in, field value out.
pub type ParseFn = Box<dyn Fn(&str) -> Result<FieldValue, ConvertError> + Send + Sync>;

/// A registered text preprocessor applied before the canonical conversion.
pub type PreFn = Box<dyn Fn(&str) -> String + Send + Sync>;

/// How one field's cell becomes its value.
pub enum CellParse {
    /// The canonical conversion for `kind`.
    Scalar(FieldKind),
    /// A custom function over the cell's text.
    Custom(ParseFn),
    /// A text preprocessor, then the canonical conversion for `kind`.
    Pre { pre: PreFn, kind: FieldKind },
}

/// Converts raw rows into records, one attr per participating field.
pub struct RowParser<T> {
    attrs: Vec<(FieldDef<T>, CellParse)>,
}

impl<T: Record> RowParser<T> {
    pub(crate) fn new(attrs: Vec<(FieldDef<T>, CellParse)>) -> Self {
        Self { attrs }
    }

    /// Convert one row, reading slot `i` (or `slots[i]` when a permutation
    /// is given) into field `i`. Fields without a usable cell keep their
    /// default. Never fails.
    pub fn parse_row<R: Row + ?Sized>(&self, row: &R, slots: Option<&[usize]>) -> T {
        let mut record = T::default();
        match slots {
            None => {
                let n = self.attrs.len().min(row.width());
                for i in 0..n {
                    self.fill(&mut record, i, row.cell(i));
                }
            }
            Some(slots) => {
                let n = self.attrs.len().min(slots.len());
                for i in 0..n {
                    self.fill(&mut record, i, row.cell(slots[i]));
                }
            }
        }
        record
    }

    fn fill(&self, record: &mut T, i: usize, cell: Option<Cell<'_>>) {
        let Some(cell) = cell else { return };
        let (def, parse) = &self.attrs[i];
        let value = match parse {
            CellParse::Scalar(kind) => parse_cell(*kind, cell),
            CellParse::Custom(f) => f(&cell.to_text()),
            CellParse::Pre { pre, kind } => {
                let text = pre(&cell.to_text());
                parse_cell(*kind, Cell::Text(&text))
            }
        };
        if let Ok(v) = value {
            (def.set)(record, v);
        }
    }
}
