#![cfg(feature = "sheet")]

use std::fmt;

use rowbind::io::sheet::{SheetCell, SheetRow, SheetSource};
use rowbind::{record, RowCodec};

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Person {
        pub name: String,
        pub age: i32,
        pub score: f64,
        pub active: bool,
    }
}

fn people() -> RowCodec<Person> {
    RowCodec::builder().build().unwrap()
}

fn ada() -> SheetRow {
    SheetRow::new(vec!["ada".into(), 36.into(), 91.5.into(), true.into()])
}

#[test]
fn typed_cells_feed_fields_directly() -> anyhow::Result<()> {
    let got = people().sheet_reader(vec![ada()]).collect()?;
    assert_eq!(
        got,
        vec![Person {
            name: "ada".into(),
            age: 36,
            score: 91.5,
            active: true,
        }]
    );
    Ok(())
}

#[test]
fn text_cells_convert_like_delimited_cells() -> anyhow::Result<()> {
    let rows = vec![SheetRow::from_text(["grace", "45", "88.25", "true"])];
    let got = people().sheet_reader(rows).collect()?;
    assert_eq!(got[0].age, 45);
    assert_eq!(got[0].score, 88.25);
    assert!(got[0].active);
    Ok(())
}

#[test]
fn numbers_truncate_toward_zero_for_integer_fields() -> anyhow::Result<()> {
    let rows = vec![SheetRow::new(vec![
        "x".into(),
        SheetCell::Number(3.9),
        SheetCell::Number(-1.25),
        false.into(),
    ])];
    let got = people().sheet_reader(rows).collect()?;
    assert_eq!(got[0].age, 3);
    assert_eq!(got[0].score, -1.25);
    Ok(())
}

#[test]
fn number_into_a_text_field_keeps_the_default() -> anyhow::Result<()> {
    let rows = vec![SheetRow::new(vec![
        SheetCell::Number(12.0),
        36.into(),
        91.5.into(),
        true.into(),
    ])];
    let got = people().sheet_reader(rows).collect()?;
    assert_eq!(got[0].name, "");
    assert_eq!(got[0].age, 36);
    Ok(())
}

#[test]
fn blank_cells_keep_defaults() -> anyhow::Result<()> {
    let rows = vec![SheetRow::new(vec![
        "lone".into(),
        SheetCell::Blank,
        SheetCell::Blank,
        SheetCell::Blank,
    ])];
    let got = people().sheet_reader(rows).collect()?;
    assert_eq!(
        got[0],
        Person {
            name: "lone".into(),
            ..Person::default()
        }
    );
    Ok(())
}

#[test]
fn short_rows_leave_trailing_fields_at_defaults() -> anyhow::Result<()> {
    let rows = vec![SheetRow::from_text(["tiny"])];
    let got = people().sheet_reader(rows).collect()?;
    assert_eq!(got[0].name, "tiny");
    assert_eq!(got[0].age, 0);
    Ok(())
}

#[test]
fn skip_rows_drops_leading_rows() -> anyhow::Result<()> {
    let rows = vec![SheetRow::from_text(["garbage"]), ada()];
    let got = people().sheet_reader(rows).skip_rows(1).collect()?;
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].name, "ada");
    Ok(())
}

#[test]
fn header_row_resolves_names_to_slots() -> anyhow::Result<()> {
    let rows = vec![
        SheetRow::from_text(["age", "name", "active", "score"]),
        SheetRow::new(vec![36.into(), "ada".into(), true.into(), 91.5.into()]),
    ];
    let got = people()
        .sheet_reader(rows)
        .columns_by_name(["name", "age", "score", "active"])
        .collect()?;
    assert_eq!(
        got,
        vec![Person {
            name: "ada".into(),
            age: 36,
            score: 91.5,
            active: true,
        }]
    );
    Ok(())
}

#[test]
fn missing_header_name_is_an_alignment_error() {
    let rows = vec![SheetRow::from_text(["name", "age"])];
    let result = people()
        .sheet_reader(rows)
        .columns_by_name(["name", "age", "score", "active"])
        .collect();
    let shown = format!("{:?}", result.unwrap_err());
    assert!(shown.contains("align columns in sheet rows"));
    assert!(shown.contains("column 'score' not found"));
}

#[test]
fn letter_columns_address_sheet_slots() -> anyhow::Result<()> {
    let rows = vec![SheetRow::new(vec![
        "pad".into(),
        "ada".into(),
        36.into(),
        91.5.into(),
        true.into(),
    ])];
    let got = people()
        .sheet_reader(rows)
        .letter_columns("B,C,D,E")?
        .collect()?;
    assert_eq!(got[0].name, "ada");
    assert!(got[0].active);
    Ok(())
}

#[test]
fn strict_columns_rejects_partial_alignment() {
    let result = people()
        .sheet_reader(vec![ada()])
        .columns(&[0, 1])
        .strict_columns()
        .collect();
    let shown = format!("{:?}", result.unwrap_err());
    assert!(shown.contains("alignment covers 2 of 4 fields"));
}

#[derive(Debug)]
struct LoadError;

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("workbook damaged")
    }
}

impl std::error::Error for LoadError {}

fn failing_source() -> SheetSource {
    SheetSource::new("budget.xlsx", || Err(anyhow::Error::new(LoadError)))
}

#[test]
fn failing_source_is_an_error_by_default() {
    let result = people().sheet_reader(failing_source()).collect();
    let shown = format!("{:?}", result.unwrap_err());
    assert!(shown.contains("open budget.xlsx"));
    assert!(shown.contains("workbook damaged"));
}

#[test]
fn tolerated_failing_source_reads_as_empty() -> anyhow::Result<()> {
    let got = people()
        .sheet_reader(failing_source())
        .tolerate::<LoadError>()
        .collect()?;
    assert!(got.is_empty());
    Ok(())
}
