//! Raw rows: the slot-addressed view every source lowers into.
//!
//! A [`Row`] is a bounded sequence of [`Cell`]s addressed by 0-based slot.
//! Delimited text lines become rows of text cells after splitting; sheet rows
//! carry typed cells. Parsing never looks at anything but this view.

use std::borrow::Cow;

/// One observed cell. Text sources only ever produce `Text`; typed sheet
/// cells keep their number/bool/blank states.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Bool(bool),
    Blank,
}

impl<'a> Cell<'a> {
    /// Textual rendering of the cell, as handed to custom parse functions.
    pub fn to_text(&self) -> Cow<'a, str> {
        match *self {
            Cell::Text(s) => Cow::Borrowed(s),
            Cell::Number(n) => Cow::Owned(n.to_string()),
            Cell::Bool(true) => Cow::Borrowed("true"),
            Cell::Bool(false) => Cow::Borrowed("false"),
            Cell::Blank => Cow::Borrowed(""),
        }
    }
}

/// A bounded row of cells. Out-of-range slots yield `None`, which the parser
/// treats like a failed conversion: the target field keeps its default.
pub trait Row {
    /// Number of cells in this row.
    fn width(&self) -> usize;

    /// The cell at `slot`, or `None` past the end of the row.
    fn cell(&self, slot: usize) -> Option<Cell<'_>>;
}

impl Row for [String] {
    fn width(&self) -> usize {
        self.len()
    }

    fn cell(&self, slot: usize) -> Option<Cell<'_>> {
        self.get(slot).map(|s| Cell::Text(s))
    }
}
