use std::path::{Path, PathBuf};

use crate::{
    foundation::error::{SyncError, SyncResult},
    host::api::Host,
    project::asset_group::AssetGroup,
    sync::{
        apply::apply_tasks,
        task::{Task, build_tasks},
    },
    timesheet::model::Timesheet,
};

/// File extension of exchange timesheets.
pub const XDTS_EXTENSION: &str = "xdts";

/// Every `*.xdts` file directly inside `dir`, sorted by file name.
pub fn find_timesheet_files(dir: impl AsRef<Path>) -> SyncResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(SyncError::Other(anyhow::anyhow!(
            "could not find XDTS folder `{}`",
            dir.display()
        )));
    }

    let entries = std::fs::read_dir(dir).map_err(|e| {
        SyncError::Other(anyhow::anyhow!("read XDTS folder `{}`: {e}", dir.display()))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| SyncError::Other(e.into()))?.path();
        let is_xdts = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(XDTS_EXTENSION));
        if is_xdts && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Decode every timesheet in `dir`. Any malformed file aborts the whole batch.
#[tracing::instrument(skip_all, fields(dir = %dir.as_ref().display()))]
pub fn load_timesheets(dir: impl AsRef<Path>) -> SyncResult<Vec<Timesheet>> {
    let files = find_timesheet_files(&dir)?;
    if files.is_empty() {
        return Err(SyncError::Other(anyhow::anyhow!(
            "there are no XDTS files in the timesheet folder; no processing will occur"
        )));
    }

    let sheets = files
        .iter()
        .map(Timesheet::from_path)
        .collect::<SyncResult<Vec<_>>>()?;
    tracing::info!(count = sheets.len(), "loaded timesheets");
    Ok(sheets)
}

/// Resolve tasks for the decoded timesheets and apply them to `host`.
pub fn synchronize(
    host: &mut dyn Host,
    timesheets: &[Timesheet],
    groups: &[AssetGroup],
) -> SyncResult<Vec<Task>> {
    let tasks = build_tasks(timesheets, groups)?;
    apply_tasks(host, &tasks)?;
    tracing::info!(
        tasks = tasks.len(),
        columns = tasks.iter().map(|t| t.columns.len()).sum::<usize>(),
        "synchronized"
    );
    Ok(tasks)
}
