use super::*;
use serde_json::{Value, json};

fn frame(frame: u32, value: &str) -> Value {
    json!({ "frame": frame, "data": [ { "id": 0, "values": [value] } ] })
}

fn table(names: &[&str], tracks: Vec<Vec<Value>>) -> Value {
    json!({
        "version": 5,
        "timeTables": [ {
            "duration": 48,
            "name": "sheet1",
            "timeTableHeaders": [
                { "fieldId": 5, "names": ["CAM"] },
                { "fieldId": 0, "names": names }
            ],
            "fields": [
                {
                    "fieldId": 0,
                    "tracks": tracks
                        .into_iter()
                        .enumerate()
                        .map(|(i, f)| json!({ "trackNo": i, "frames": f }))
                        .collect::<Vec<_>>()
                },
                {
                    "fieldId": 5,
                    "tracks": [ { "trackNo": 0, "frames": [ frame(0, "1") ] } ]
                }
            ]
        } ]
    })
}

fn decode(v: &Value) -> SyncResult<Timesheet> {
    read_timesheet("cut.xdts", &v.to_string())
}

#[test]
fn decodes_visible_columns_and_ignores_camera_data() {
    let v = table(
        &["A", "B"],
        vec![
            vec![frame(0, "1"), frame(12, NULL_CELL), frame(24, "3")],
            vec![frame(6, "2")],
        ],
    );
    let ts = decode(&v).unwrap();

    assert_eq!(ts.name(), "cut.xdts");
    assert_eq!(ts.duration(), 48);
    assert_eq!(ts.columns(), ["A", "B"]);

    let a = ts.exposures("A").unwrap();
    assert_eq!(
        a,
        [
            ExposureEvent::shown(0, CelNumber::new(1).unwrap()),
            ExposureEvent::empty(12),
            ExposureEvent::shown(24, CelNumber::new(3).unwrap()),
        ]
    );
    assert_eq!(
        ts.exposures("B").unwrap(),
        [ExposureEvent::shown(6, CelNumber::new(2).unwrap())]
    );
}

#[test]
fn skips_non_cel_data_items() {
    let v = table(
        &["A"],
        vec![vec![json!({
            "frame": 3,
            "data": [
                { "id": 7, "values": ["memo"] },
                { "id": 0, "values": ["4", "ignored"] }
            ]
        })]],
    );
    let ts = decode(&v).unwrap();
    assert_eq!(
        ts.exposures("A").unwrap(),
        [ExposureEvent::shown(3, CelNumber::new(4).unwrap())]
    );
}

#[test]
fn accepts_signature_line_and_numeric_values() {
    let v = table(&["A"], vec![vec![json!({ "frame": 0, "data": [ { "id": 0, "values": [2] } ] })]]);
    let text = format!("{XDTS_SIGNATURE}\n{v}");
    let ts = read_timesheet("cut.xdts", &text).unwrap();
    assert_eq!(
        ts.exposures("A").unwrap(),
        [ExposureEvent::shown(0, CelNumber::new(2).unwrap())]
    );
}

#[test]
fn missing_visible_header_yields_no_columns() {
    let v = json!({
        "timeTables": [ {
            "duration": 12,
            "timeTableHeaders": [ { "fieldId": 5, "names": ["CAM"] } ],
            "fields": []
        } ]
    });
    let ts = decode(&v).unwrap();
    assert!(ts.columns().is_empty());
    assert_eq!(ts.duration(), 12);
}

#[test]
fn blank_header_name_is_malformed() {
    let v = table(&["A", "a "], vec![vec![], vec![]]);
    assert!(decode(&v).is_ok());

    let v = table(&["A", "  "], vec![vec![], vec![]]);
    let err = decode(&v).unwrap_err();
    assert!(matches!(err, SyncError::MalformedColumnName { ref file } if file == "cut.xdts"));
}

#[test]
fn duplicate_header_name_is_rejected() {
    let v = table(&["A", "B", "B"], vec![vec![], vec![], vec![]]);
    let err = decode(&v).unwrap_err();
    assert!(matches!(err, SyncError::DuplicateColumnName { ref column, .. } if column == "B"));
}

#[test]
fn hybrid_notation_is_unsupported() {
    let v = table(&["A"], vec![vec![frame(0, "1a")]]);
    let err = decode(&v).unwrap_err();
    match err {
        SyncError::UnsupportedFrameNotation { file, value } => {
            assert_eq!(file, "cut.xdts");
            assert_eq!(value, "1a");
        }
        other => panic!("unexpected {other}"),
    }
}

#[test]
fn coercion_rejects_non_numbers() {
    for bad in ["", " ", "x", "SYMBOL_TICK_1", "NaN", "inf", "0", "-1", "1.5"] {
        let raw = RawValue::Text(bad.to_string());
        assert!(coerce_cel(&raw, "f").is_err(), "accepted {bad:?}");
    }
    assert_eq!(
        coerce_cel(&RawValue::Text(" 7 ".to_string()), "f").unwrap(),
        CelNumber::new(7)
    );
    assert_eq!(coerce_cel(&RawValue::Number(3.0), "f").unwrap(), CelNumber::new(3));
    assert_eq!(
        coerce_cel(&RawValue::Text(NULL_CELL.to_string()), "f").unwrap(),
        None
    );
}

#[test]
fn column_count_mismatch_iff_sizes_differ() {
    for headers in 0..4usize {
        for tracks in 0..4usize {
            let names: Vec<String> = (0..headers).map(|i| format!("C{i}")).collect();
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            let v = table(&names, vec![vec![]; tracks]);
            match decode(&v) {
                Ok(ts) => {
                    assert_eq!(headers, tracks);
                    assert_eq!(ts.columns().len(), headers);
                }
                Err(SyncError::ColumnCountMismatch {
                    headers: h,
                    tracks: t,
                    ..
                }) => {
                    assert_ne!(headers, tracks);
                    assert_eq!((h, t), (headers, tracks));
                }
                Err(e) => panic!("unexpected {e}"),
            }
        }
    }
}

#[test]
fn reserved_tokens_fail_before_parsing() {
    // Not even valid JSON: the guard must fire first.
    let err = read_timesheet("cut.xdts", "{ prototype").unwrap_err();
    assert!(matches!(
        err,
        SyncError::UnsafeColumnName { ref file, token: "prototype" } if file == "cut.xdts"
    ));

    for token in RESERVED_TOKENS {
        let v = table(&[token], vec![vec![]]);
        assert!(matches!(
            decode(&v).unwrap_err(),
            SyncError::UnsafeColumnName { .. }
        ));
    }
}

#[test]
fn empty_time_tables_is_an_error() {
    let err = decode(&json!({ "timeTables": [] })).unwrap_err();
    assert!(matches!(err, SyncError::MissingTimeTable { .. }));
}

#[test]
fn malformed_json_names_the_file() {
    let err = read_timesheet("broken.xdts", "{ \"timeTables\": [").unwrap_err();
    assert!(matches!(err, SyncError::Payload { ref file, .. } if file == "broken.xdts"));
}

#[test]
fn decoding_is_deterministic() {
    let v = table(
        &["A", "B"],
        vec![vec![frame(0, "1"), frame(5, NULL_CELL)], vec![frame(2, "9")]],
    );
    let text = v.to_string();
    let a = read_timesheet("cut.xdts", &text).unwrap();
    let b = read_timesheet("cut.xdts", &text).unwrap();
    assert_eq!(a, b);
}
