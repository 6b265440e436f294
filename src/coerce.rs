//! Canonical conversions between raw cells and scalar field values.
//!
//! Every kind except [`FieldKind::Other`] converts here without any
//! registration. Failed conversions report a [`ConvertError`]; the parser
//! recovers from it by leaving the target field at its default, so a single
//! malformed cell never aborts a row.

use std::fmt;

use crate::field::{FieldKind, FieldValue};
use crate::row::Cell;

/// A cell that could not be converted to its field's kind.
#[derive(Debug, Clone)]
pub struct ConvertError {
    /// Textual rendering of the offending cell.
    pub raw: String,
    /// The kind the cell was supposed to become.
    pub kind: FieldKind,
}

impl ConvertError {
    pub fn new<S: Into<String>>(raw: S, kind: FieldKind) -> Self {
        Self {
            raw: raw.into(),
            kind,
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot convert '{}' to {}", self.raw, self.kind)
    }
}

impl std::error::Error for ConvertError {}

/// Convert one raw cell to a value of `kind`.
///
/// Text cells parse with `str::parse` semantics; a `Char` takes the first
/// character of a non-empty cell and `Bool` accepts `true`/`false` in any
/// case. Number cells feed the numeric kinds directly, truncating toward
/// zero for the integer kinds. Everything else, including blank cells, is a
/// [`ConvertError`].
///
/// `Other` kinds have no canonical conversion and never reach this function;
/// their fields take a registered custom parse function instead.
pub fn parse_cell(kind: FieldKind, cell: Cell<'_>) -> Result<FieldValue, ConvertError> {
    let fail = || ConvertError::new(cell.to_text(), kind);
    match (kind, cell) {
        (FieldKind::Text, Cell::Text(s)) => Ok(FieldValue::Text(s.to_owned())),
        (FieldKind::Char, Cell::Text(s)) => {
            s.chars().next().map(FieldValue::Char).ok_or_else(fail)
        }
        (FieldKind::Bool, Cell::Text(s)) => {
            if s.eq_ignore_ascii_case("true") {
                Ok(FieldValue::Bool(true))
            } else if s.eq_ignore_ascii_case("false") {
                Ok(FieldValue::Bool(false))
            } else {
                Err(fail())
            }
        }
        (FieldKind::Int, Cell::Text(s)) => s.parse().map(FieldValue::Int).map_err(|_| fail()),
        (FieldKind::Double, Cell::Text(s)) => {
            s.parse().map(FieldValue::Double).map_err(|_| fail())
        }
        (FieldKind::Long, Cell::Text(s)) => s.parse().map(FieldValue::Long).map_err(|_| fail()),
        (FieldKind::Int, Cell::Number(n)) => Ok(FieldValue::Int(n as i32)),
        (FieldKind::Double, Cell::Number(n)) => Ok(FieldValue::Double(n)),
        (FieldKind::Long, Cell::Number(n)) => Ok(FieldValue::Long(n as i64)),
        (FieldKind::Bool, Cell::Bool(b)) => Ok(FieldValue::Bool(b)),
        _ => Err(fail()),
    }
}

/// The natural text form of a value. Never fails; booleans render as
/// `true`/`false` and floats through their shortest exact representation.
pub fn format_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Char(c) => c.to_string(),
        FieldValue::Text(s) => s.clone(),
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Int(n) => n.to_string(),
        FieldValue::Double(n) => n.to_string(),
        FieldValue::Long(n) => n.to_string(),
    }
}
