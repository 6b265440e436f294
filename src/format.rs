//! Record-to-row formatting.
//!
//! The mirror of parsing: each participating field renders through either
//! the natural text form or a registered custom format function. An absent
//! field renders as empty text without consulting either. Formatting never
//! fails.

use crate::coerce::format_value;
use crate::field::{FieldDef, FieldValue, Record};

/// A registered custom format function.
pub type FormatFn = Box<dyn Fn(&FieldValue) -> String + Send + Sync>;

/// How one field's value becomes its cell text.
pub enum CellFormat {
    /// The natural text form.
    Natural,
    /// A custom function over the present value.
    Custom(FormatFn),
}

/// Renders records as rows of cell text, one attr per participating field.
pub struct RowFormatter<T> {
    attrs: Vec<(FieldDef<T>, CellFormat)>,
}

impl<T: Record> RowFormatter<T> {
    pub(crate) fn new(attrs: Vec<(FieldDef<T>, CellFormat)>) -> Self {
        Self { attrs }
    }

    /// One cell of text per participating field, in schema order.
    pub fn format_row(&self, record: &T) -> Vec<String> {
        self.attrs
            .iter()
            .map(|(def, format)| Self::cell(record, def, format))
            .collect()
    }

    /// The record as a single `sep`-delimited line, without a line ending.
    pub fn format_line(&self, record: &T, sep: &str) -> String {
        let mut line = String::new();
        for (i, (def, format)) in self.attrs.iter().enumerate() {
            if i > 0 {
                line.push_str(sep);
            }
            line.push_str(&Self::cell(record, def, format));
        }
        line
    }

    /// The participating field names as a `sep`-delimited header line.
    pub fn header_line(&self, sep: &str) -> String {
        let mut line = String::new();
        for (i, (def, _)) in self.attrs.iter().enumerate() {
            if i > 0 {
                line.push_str(sep);
            }
            line.push_str(def.name);
        }
        line
    }

    fn cell(record: &T, def: &FieldDef<T>, format: &CellFormat) -> String {
        match (def.get)(record) {
            None => String::new(),
            Some(value) => match format {
                CellFormat::Natural => format_value(&value),
                CellFormat::Custom(f) => f(&value),
            },
        }
    }
}
