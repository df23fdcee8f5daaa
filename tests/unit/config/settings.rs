use super::*;

#[test]
fn missing_keys_take_defaults() {
    let s = Settings::from_reader(r#"{ "outputFolder": "Out" }"#.as_bytes()).unwrap();
    assert_eq!(s.timesheet_folder, "./XDTS");
    assert_eq!(s.input_folder, "Input");
    assert_eq!(s.output_folder, "Out");
    assert_eq!(s.start_frame, 1);
}

#[test]
fn start_frame_must_be_zero_or_one() {
    let s = Settings::from_reader(r#"{ "startFrame": 0 }"#.as_bytes()).unwrap();
    assert_eq!(s.display_frame(0), 0);

    let err = Settings::from_reader(r#"{ "startFrame": 2 }"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("startFrame is not 0 or 1"));
}

#[test]
fn wrongly_typed_values_are_rejected() {
    let err = Settings::from_reader(r#"{ "inputFolder": 3 }"#.as_bytes()).unwrap_err();
    assert!(matches!(err, SyncError::Settings(_)));
    assert!(Settings::from_reader(r#"{ "startFrame": -1 }"#.as_bytes()).is_err());
}

#[test]
fn load_or_default_without_file() {
    let dir = std::path::PathBuf::from("target").join("settings_none");
    std::fs::create_dir_all(&dir).unwrap();
    let _ = std::fs::remove_file(dir.join(SETTINGS_FILE_NAME));
    assert_eq!(Settings::load_or_default(&dir).unwrap(), Settings::default());
}
