use super::*;

#[test]
fn messages_name_the_offending_file() {
    let err = SyncError::UnsupportedFrameNotation {
        file: "shot_010.xdts".to_string(),
        value: "1a".to_string(),
    };
    let msg = err.to_string();
    assert!(msg.contains("shot_010.xdts"));
    assert!(msg.contains("`1a`"));

    let err = SyncError::ColumnCountMismatch {
        file: "cut.xdts".to_string(),
        headers: 3,
        tracks: 2,
    };
    assert!(err.to_string().contains("found 3 header(s) and 2 entries"));
}

#[test]
fn host_errors_name_group_and_column() {
    let err = SyncError::host("[cut.xdts]", "A", "missing cel");
    let msg = err.to_string();
    assert!(msg.starts_with("host error:"));
    assert!(msg.contains("`[cut.xdts]`"));
    assert!(msg.contains("`A`"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SyncError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
