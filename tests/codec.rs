use rowbind::{record, FieldValue, RowCodec, DEFAULT_SEP};

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Reading {
        pub sensor: String,
        pub value: f64,
        pub count: i32,
        pub ok: bool,
    }
}

fn csv() -> RowCodec<Reading> {
    RowCodec::builder().sep(",").build().unwrap()
}

#[test]
fn parse_line_fills_fields_in_declaration_order() {
    let r = csv().parse_line("probe-1,3.5,7,true");
    assert_eq!(
        r,
        Reading {
            sensor: "probe-1".into(),
            value: 3.5,
            count: 7,
            ok: true,
        }
    );
}

#[test]
fn format_then_parse_round_trips() {
    let codec = csv();
    let original = Reading {
        sensor: "probe-2".into(),
        value: -0.25,
        count: 42,
        ok: false,
    };
    let line = codec.format_line(&original);
    assert_eq!(codec.parse_line(&line), original);
}

#[test]
fn header_line_uses_participating_field_names() {
    assert_eq!(csv().header_line(), "sensor,value,count,ok");
}

#[test]
fn format_row_yields_one_cell_per_field() {
    let r = Reading {
        sensor: "probe".into(),
        value: 2.5,
        count: 3,
        ok: true,
    };
    assert_eq!(csv().format_row(&r), vec!["probe", "2.5", "3", "true"]);
}

#[test]
fn default_separator_survives_plain_prose() -> anyhow::Result<()> {
    let codec = RowCodec::<Reading>::new()?;
    let r = Reading {
        sensor: "a probe, with commas".into(),
        value: 1.0,
        count: 1,
        ok: true,
    };
    let line = codec.format_line(&r);
    assert!(line.contains(DEFAULT_SEP));
    assert_eq!(codec.parse_line(&line), r);
    Ok(())
}

#[test]
fn with_sep_shares_the_binding() {
    let tabbed = csv().with_sep("\t");
    let r = tabbed.parse_line("probe\t1.5\t2\ttrue");
    assert_eq!(r.value, 1.5);
    assert_eq!(tabbed.format_line(&r), "probe\t1.5\t2\ttrue");
}

#[test]
fn multi_char_separator_works() {
    let codec = RowCodec::<Reading>::builder().sep("::").build().unwrap();
    let r = codec.parse_line("probe::2.5::3::false");
    assert_eq!(r.count, 3);
    assert_eq!(codec.format_line(&r), "probe::2.5::3::false");
}

#[test]
fn surplus_columns_coalesce_into_ignored_tail() {
    let r = csv().parse_line("probe,1.5,2,true,extra,columns,here");
    assert_eq!(r.sensor, "probe");
    assert_eq!(r.count, 2);
    assert!(r.ok);
}

#[test]
fn malformed_cells_keep_field_defaults() {
    let r = csv().parse_line("probe,not-a-number,4,maybe");
    assert_eq!(r.sensor, "probe");
    assert_eq!(r.value, 0.0);
    assert_eq!(r.count, 4);
    assert!(!r.ok);
}

#[test]
fn short_rows_leave_trailing_fields_at_defaults() {
    let r = csv().parse_line("probe,9.0");
    assert_eq!(r.value, 9.0);
    assert_eq!(r.count, 0);
    assert!(!r.ok);
}

#[test]
fn bool_cells_parse_case_insensitively() {
    assert!(csv().parse_line("p,0,0,TRUE").ok);
    assert!(!csv().parse_line("p,0,0,False").ok);
    assert!(!csv().parse_line("p,0,0,1").ok);
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Sample {
        pub label: String,
        pub weight: Option<f64>,
    }
}

#[test]
fn absent_option_formats_as_empty_and_parses_back_to_none() {
    let codec = RowCodec::<Sample>::builder().sep(",").build().unwrap();
    let none = Sample {
        label: "empty".into(),
        weight: None,
    };
    let line = codec.format_line(&none);
    assert_eq!(line, "empty,");
    assert_eq!(codec.parse_line(&line), none);

    let some = Sample {
        label: "full".into(),
        weight: Some(12.5),
    };
    assert_eq!(codec.format_line(&some), "full,12.5");
    assert_eq!(codec.parse_line("full,12.5"), some);
}

#[test]
fn empty_text_cell_parses_as_present_empty_string() {
    // Text conversion accepts the empty cell, unlike the numeric kinds.
    let codec = RowCodec::<Sample>::builder().sep(",").build().unwrap();
    let r = codec.parse_line(",3.0");
    assert_eq!(r.label, "");
    assert_eq!(r.weight, Some(3.0));
}

#[test]
fn custom_parse_replaces_canonical_conversion() -> anyhow::Result<()> {
    let codec = RowCodec::<Reading>::builder()
        .sep(",")
        .parse_with("count", |s| {
            rowbind::coerce::parse_cell(rowbind::FieldKind::Int, rowbind::Cell::Text(s.trim_start_matches('x')))
        })
        .build()?;
    assert_eq!(codec.parse_line("p,0,x12,true").count, 12);
    Ok(())
}

#[test]
fn failing_custom_parse_keeps_the_default() -> anyhow::Result<()> {
    let codec = RowCodec::<Reading>::builder()
        .sep(",")
        .parse_with("count", |s| match s.strip_prefix('#') {
            Some(rest) => rowbind::coerce::parse_cell(rowbind::FieldKind::Int, rowbind::Cell::Text(rest)),
            None => Err(rowbind::ConvertError::new(s, rowbind::FieldKind::Int)),
        })
        .build()?;
    assert_eq!(codec.parse_line("p,0,#5,true").count, 5);
    assert_eq!(codec.parse_line("p,0,5,true").count, 0);
    Ok(())
}

#[test]
fn preprocess_runs_before_canonical_conversion() -> anyhow::Result<()> {
    let codec = RowCodec::<Reading>::builder()
        .sep(",")
        .preprocess("value", |s| s.trim_start_matches('$').to_owned())
        .build()?;
    assert_eq!(codec.parse_line("p,$4.5,1,true").value, 4.5);
    Ok(())
}

#[test]
fn preprocess_text_applies_to_unregistered_text_fields() -> anyhow::Result<()> {
    let codec = RowCodec::<Reading>::builder()
        .sep(",")
        .preprocess_text(|s| s.trim().to_owned())
        .build()?;
    let r = codec.parse_line("  padded  ,1.0,1,true");
    assert_eq!(r.sensor, "padded");
    Ok(())
}

#[test]
fn custom_format_overrides_present_values_only() -> anyhow::Result<()> {
    let codec = RowCodec::<Sample>::builder()
        .sep(",")
        .format_with("weight", |v| match v {
            FieldValue::Double(n) => format!("{n:.2}"),
            other => panic!("unexpected value {other:?}"),
        })
        .build()?;
    let some = Sample {
        label: "a".into(),
        weight: Some(1.5),
    };
    assert_eq!(codec.format_line(&some), "a,1.50");
    let none = Sample {
        label: "b".into(),
        weight: None,
    };
    assert_eq!(codec.format_line(&none), "b,");
    Ok(())
}

#[test]
fn write_path_then_read_path_round_trips() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("readings.csv");
    let codec = csv();
    let data = vec![
        Reading {
            sensor: "a".into(),
            value: 1.5,
            count: 1,
            ok: true,
        },
        Reading {
            sensor: "b".into(),
            value: -2.0,
            count: 2,
            ok: false,
        },
    ];

    let n = codec.write_path(&path, &data)?;
    assert_eq!(n, 2);
    let contents = std::fs::read_to_string(&path)?;
    assert!(contents.starts_with("sensor,value,count,ok\n"));

    let back = codec.read_path(&path)?;
    assert_eq!(back, data);
    Ok(())
}

#[test]
fn read_path_propagates_missing_file() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("absent.csv");
    let result = csv().read_path(&missing);
    assert!(result.is_err());
    let err_msg = format!("{:?}", result.unwrap_err());
    assert!(err_msg.contains("open"));
}
