#![cfg(feature = "json")]

use std::io;

use rowbind::io::json::{json_writer, JsonReader};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Task {
    id: i64,
    label: String,
    #[serde(default)]
    urgent: bool,
}

fn sample() -> Vec<Task> {
    vec![
        Task {
            id: 1,
            label: "first".into(),
            urgent: false,
        },
        Task {
            id: 2,
            label: "second".into(),
            urgent: true,
        },
    ]
}

#[test]
fn writer_emits_one_object_per_line() -> anyhow::Result<()> {
    let out = json_writer(sample()).into_string()?;
    assert_eq!(
        out,
        "{\"id\":1,\"label\":\"first\",\"urgent\":false}\n{\"id\":2,\"label\":\"second\",\"urgent\":true}\n"
    );
    Ok(())
}

#[test]
fn round_trips_through_a_file() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("tasks.jsonl");

    let n = json_writer(sample()).to_path(&path)?;
    assert_eq!(n, 2);

    let back: Vec<Task> = JsonReader::new().read(path.as_path()).collect()?;
    assert_eq!(back, sample());
    Ok(())
}

#[test]
fn reads_in_memory_lines() -> anyhow::Result<()> {
    let text = "{\"id\":7,\"label\":\"only\"}";
    let got: Vec<Task> = JsonReader::new().read(text).collect()?;
    assert_eq!(got[0].id, 7);
    assert!(!got[0].urgent);
    Ok(())
}

#[test]
fn skip_rows_drops_leading_lines() -> anyhow::Result<()> {
    let text = "not json at all\n{\"id\":1,\"label\":\"a\"}";
    let got: Vec<Task> = JsonReader::new().read(text).skip_rows(1).collect()?;
    assert_eq!(got.len(), 1);
    Ok(())
}

#[test]
fn blank_lines_are_skipped() -> anyhow::Result<()> {
    let text = "{\"id\":1,\"label\":\"a\"}\n\n   \n{\"id\":2,\"label\":\"b\"}";
    let got: Vec<Task> = JsonReader::new().read(text).collect()?;
    assert_eq!(got.len(), 2);
    Ok(())
}

#[test]
fn malformed_line_is_stashed_for_try_next() -> anyhow::Result<()> {
    let text = "{\"id\":1,\"label\":\"a\"}\n{broken";
    let mut records = JsonReader::<Task>::new().read(text).records()?;
    assert!(records.try_next()?.is_some());

    let err = records.try_next().unwrap_err();
    let shown = format!("{err:?}");
    assert!(shown.contains("parse JSON line 2 in in-memory text"));
    Ok(())
}

#[test]
fn malformed_line_fails_collect() {
    let result: anyhow::Result<Vec<Task>> =
        JsonReader::new().read("{\"id\":1,\"label\":\"a\"}\n{broken").collect();
    assert!(result.is_err());
}

#[test]
fn tolerated_parse_failure_keeps_the_partial_result() -> anyhow::Result<()> {
    let text = "{\"id\":1,\"label\":\"a\"}\n{broken\n{\"id\":3,\"label\":\"c\"}";
    let got: Vec<Task> = JsonReader::new()
        .read(text)
        .tolerate::<serde_json::Error>()
        .collect()?;
    // The stream ends at the malformed line; later records are unreachable.
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].id, 1);
    Ok(())
}

#[test]
fn missing_file_is_an_error_by_default() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("absent.jsonl");
    let result: anyhow::Result<Vec<Task>> =
        JsonReader::new().read(missing.as_path()).collect();
    let shown = format!("{:?}", result.unwrap_err());
    assert!(shown.contains("open"));
}

#[test]
fn tolerated_missing_file_reads_as_empty() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let missing = tmp.path().join("absent.jsonl");
    let got: Vec<Task> = JsonReader::new()
        .read(missing.as_path())
        .tolerate::<io::Error>()
        .collect()?;
    assert!(got.is_empty());
    Ok(())
}
