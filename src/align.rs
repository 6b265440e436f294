//! Column alignment: mapping participating fields onto row slots.
//!
//! A session aligns fields to columns in one of three ways: explicit 0-based
//! slots, spreadsheet-style letters, or names resolved against a header row.
//! All of them reduce to a slot permutation that the parser then follows.

use crate::error::{AlignError, ConfigError};

/// A column directive held by a session until it opens.
#[derive(Clone, Debug)]
pub enum Columns {
    /// Explicit 0-based slots, one per participating field.
    Slots(Vec<usize>),
    /// Field names to resolve against the header row at open time.
    Names(Vec<String>),
}

/// Decode a comma-separated spreadsheet column spec into 0-based slots.
///
/// Letters follow the base-26 convention: `A` is 0, `Z` is 25, `AA` is 26.
/// Case is ignored.
///
/// # Errors
///
/// `ConfigError` when a piece is empty or contains a non-letter.
pub fn letter_slots(spec: &str) -> Result<Vec<usize>, ConfigError> {
    spec.split(',').map(|piece| letter_slot(piece.trim())).collect()
}

fn letter_slot(letters: &str) -> Result<usize, ConfigError> {
    if letters.is_empty() {
        return Err(ConfigError::new("empty column letter"));
    }
    let mut acc = 0usize;
    for c in letters.chars() {
        let c = c.to_ascii_uppercase();
        if !c.is_ascii_uppercase() {
            return Err(ConfigError::new(format!(
                "invalid column letter '{letters}'"
            )));
        }
        acc = acc * 26 + (c as usize - 'A' as usize + 1);
    }
    Ok(acc - 1)
}

/// Resolve requested field names to their positions in an observed header.
///
/// # Errors
///
/// `AlignError` naming the first requested column the header does not
/// contain.
pub fn header_slots(requested: &[String], observed: &[String]) -> Result<Vec<usize>, AlignError> {
    requested
        .iter()
        .map(|name| {
            observed
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| AlignError::new(name.clone(), observed.to_vec()))
        })
        .collect()
}

/// The split limit for delimited lines: one more than the field count, so
/// surplus columns coalesce into a single ignored tail piece. Explicit slots
/// past the field count raise it to `max(slot) + 2`, keeping every addressed
/// slot a real cell.
pub fn split_limit(field_count: usize, slots: Option<&[usize]>) -> usize {
    let base = field_count + 1;
    match slots.and_then(|s| s.iter().max()) {
        Some(&max_slot) => base.max(max_slot + 2),
        None => base,
    }
}

/// Split `line` on `sep` into at most `limit` pieces; the last piece keeps
/// the remainder verbatim, separators included.
pub fn split_with_limit(line: &str, sep: &str, limit: usize) -> Vec<String> {
    if limit == 0 {
        return vec![line.to_owned()];
    }
    line.splitn(limit, sep).map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_decode_base_26() {
        assert_eq!(letter_slots("A").unwrap(), vec![0]);
        assert_eq!(letter_slots("a, c ,F").unwrap(), vec![0, 2, 5]);
        assert_eq!(letter_slots("Z,AA,AB").unwrap(), vec![25, 26, 27]);
        assert!(letter_slots("A,,B").is_err());
        assert!(letter_slots("A1").is_err());
    }

    #[test]
    fn header_resolution_finds_positions() {
        let observed: Vec<String> = ["b", "a", "c"].map(String::from).to_vec();
        let requested: Vec<String> = ["a", "c"].map(String::from).to_vec();
        assert_eq!(header_slots(&requested, &observed).unwrap(), vec![1, 2]);

        let missing: Vec<String> = ["a", "x"].map(String::from).to_vec();
        let err = header_slots(&missing, &observed).unwrap_err();
        assert_eq!(err.missing, "x");
        assert_eq!(err.header, observed);
    }

    #[test]
    fn split_limit_covers_addressed_slots() {
        assert_eq!(split_limit(3, None), 4);
        assert_eq!(split_limit(3, Some(&[0, 1, 2])), 4);
        assert_eq!(split_limit(2, Some(&[0, 6])), 8);
    }

    #[test]
    fn tail_piece_keeps_surplus_columns() {
        let pieces = split_with_limit("a,b,c,d,e", ",", 3);
        assert_eq!(pieces, vec!["a", "b", "c,d,e"]);
        let short = split_with_limit("a,b", ",", 4);
        assert_eq!(short, vec!["a", "b"]);
    }
}
