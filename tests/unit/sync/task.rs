use super::*;
use crate::{
    foundation::core::FrameRate,
    project::asset_group::CelInfo,
    timesheet::model::{CelNumber, ExposureEvent},
};
use std::collections::BTreeSet;

fn sheet(name: &str, cols: &[&str]) -> Timesheet {
    let cols = cols
        .iter()
        .map(|c| {
            (
                c.to_string(),
                vec![ExposureEvent::shown(0, CelNumber::new(1).unwrap())],
            )
        })
        .collect();
    Timesheet::new(name, 24, cols).unwrap()
}

fn group(timesheet: &str, cels: &[&str]) -> AssetGroup {
    let info = CelInfo {
        width: 1920,
        height: 1080,
        pixel_aspect: 1.0,
        frame_rate: FrameRate::new(24.0).unwrap(),
    };
    AssetGroup {
        name: format!("[{timesheet}]"),
        timesheet_name: timesheet.to_string(),
        cels: cels.iter().map(|c| (c.to_string(), info)).collect(),
        comps: BTreeSet::new(),
        has_output_folder: true,
    }
}

#[test]
fn keeps_only_columns_with_cels_and_their_original_index() {
    let ts = sheet("cut.xdts", &["BG", "A", "B", "C"]);
    let task = resolve_task(&ts, &group("cut.xdts", &["C", "A", "extra"]));

    assert_eq!(task.columns.len(), 2);
    assert_eq!(task.columns["A"], 1);
    assert_eq!(task.columns["C"], 3);
    assert!(!task.columns.contains_key("extra"));
    assert_eq!(task.ordered_columns(), ["A", "C"]);
}

#[test]
fn ordered_columns_follow_display_order_not_name_order() {
    let ts = sheet("cut.xdts", &["Z", "M", "A"]);
    let task = resolve_task(&ts, &group("cut.xdts", &["A", "M", "Z"]));
    assert_eq!(task.ordered_columns(), ["Z", "M", "A"]);
}

#[test]
fn name_matching_is_exact() {
    let ts = sheet("cut.xdts", &["a", "B "]);
    let task = resolve_task(&ts, &group("cut.xdts", &["A", "B"]));
    assert!(task.columns.is_empty());
}

#[test]
fn builds_one_task_per_timesheet_in_discovery_order() {
    let sheets = vec![sheet("b.xdts", &["A"]), sheet("a.xdts", &["A", "B"])];
    let groups = vec![group("a.xdts", &["A", "B"]), group("b.xdts", &["A"])];

    let tasks = build_tasks(&sheets, &groups).unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].asset_group.name, "[b.xdts]");
    assert_eq!(tasks[0].timesheet.name(), "b.xdts");
    assert_eq!(tasks[1].columns.len(), 2);
}

#[test]
fn missing_group_aborts_the_batch() {
    let sheets = vec![sheet("a.xdts", &["A"]), sheet("b.xdts", &["A"])];
    let groups = vec![group("a.xdts", &["A"])];
    let err = build_tasks(&sheets, &groups).unwrap_err();
    assert!(matches!(err, SyncError::MissingAssetGroup(ref n) if n == "[b.xdts]"));
}

#[test]
fn group_pointing_at_unknown_timesheet_fails() {
    let sheets = vec![sheet("a.xdts", &["A"])];
    let mut g = group("a.xdts", &["A"]);
    g.timesheet_name = "other.xdts".to_string();
    let err = build_tasks(&sheets, &[g]).unwrap_err();
    assert!(matches!(err, SyncError::MissingTimesheet(ref n) if n == "other.xdts"));
}
