use std::fs;

use rowbind::{record, RowCodec};

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Entry {
        pub name: String,
        pub total: i64,
    }
}

fn csv() -> RowCodec<Entry> {
    RowCodec::builder().sep(",").build().unwrap()
}

fn sample() -> Vec<Entry> {
    vec![
        Entry {
            name: "alpha".into(),
            total: 10,
        },
        Entry {
            name: "beta".into(),
            total: 20,
        },
    ]
}

#[test]
fn writes_one_line_per_record() -> anyhow::Result<()> {
    let out = csv().write(sample()).into_string()?;
    assert_eq!(out, "alpha,10\nbeta,20\n");
    Ok(())
}

#[test]
fn borrowed_records_write_the_same() -> anyhow::Result<()> {
    let data = sample();
    let out = csv().write(&data).into_string()?;
    assert_eq!(out, "alpha,10\nbeta,20\n");
    Ok(())
}

#[test]
fn auto_header_prepends_field_names() -> anyhow::Result<()> {
    let out = csv().write(sample()).auto_header().into_string()?;
    assert_eq!(out, "name,total\nalpha,10\nbeta,20\n");
    Ok(())
}

#[test]
fn column_names_prepend_custom_names() -> anyhow::Result<()> {
    let out = csv()
        .write(sample())
        .column_names(["Name", "Grand Total"])
        .into_string()?;
    assert!(out.starts_with("Name,Grand Total\n"));
    Ok(())
}

#[test]
fn last_field_header_directive_wins() -> anyhow::Result<()> {
    let out = csv()
        .write(sample())
        .auto_header()
        .column_names(["n", "t"])
        .into_string()?;
    assert!(out.starts_with("n,t\nalpha"));

    let out = csv()
        .write(sample())
        .column_names(["n", "t"])
        .auto_header()
        .into_string()?;
    assert!(out.starts_with("name,total\nalpha"));
    Ok(())
}

#[test]
fn verbatim_headers_keep_order_and_precede_field_names() -> anyhow::Result<()> {
    let out = csv()
        .write(sample())
        .header("# produced by the nightly export")
        .header("# do not edit")
        .auto_header()
        .into_string()?;
    assert_eq!(
        out,
        "# produced by the nightly export\n# do not edit\nname,total\nalpha,10\nbeta,20\n"
    );
    Ok(())
}

#[test]
fn utf8_marker_leads_the_output() -> anyhow::Result<()> {
    let out = csv().write(sample()).utf8_marker().auto_header().into_string()?;
    assert!(out.starts_with("\u{feff}name,total\n"));
    Ok(())
}

#[test]
fn sink_count_excludes_headers() -> anyhow::Result<()> {
    let mut buf = Vec::new();
    let n = csv()
        .write(sample())
        .header("# two header lines")
        .auto_header()
        .to_writer(&mut buf)?;
    assert_eq!(n, 2);
    Ok(())
}

#[test]
fn empty_input_still_writes_headers() -> anyhow::Result<()> {
    let empty: Vec<Entry> = Vec::new();
    let out = csv().write(empty).auto_header().into_string()?;
    assert_eq!(out, "name,total\n");
    Ok(())
}

#[test]
fn to_path_creates_missing_parent_directories() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("nested").join("deep").join("out.csv");
    let n = csv().write(sample()).to_path(&path)?;
    assert_eq!(n, 2);
    assert_eq!(fs::read_to_string(&path)?, "alpha,10\nbeta,20\n");
    Ok(())
}

#[test]
fn append_adds_records_without_repeating_headers() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("log.csv");

    csv().write(sample()).utf8_marker().auto_header().to_path(&path)?;
    let more = vec![Entry {
        name: "gamma".into(),
        total: 30,
    }];
    let n = csv().write(more).utf8_marker().auto_header().append().to_path(&path)?;
    assert_eq!(n, 1);

    let contents = fs::read_to_string(&path)?;
    assert_eq!(
        contents,
        "\u{feff}name,total\nalpha,10\nbeta,20\ngamma,30\n"
    );
    Ok(())
}

#[test]
fn append_to_a_fresh_path_starts_the_file() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("fresh.csv");
    let n = csv().write(sample()).append().to_path(&path)?;
    assert_eq!(n, 2);
    assert_eq!(fs::read_to_string(&path)?, "alpha,10\nbeta,20\n");
    Ok(())
}
