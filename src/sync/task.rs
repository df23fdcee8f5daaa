use std::collections::BTreeMap;

use crate::{
    foundation::error::{SyncError, SyncResult},
    project::asset_group::{AssetGroup, locate_asset_group},
    timesheet::model::Timesheet,
};

/// One asset group paired with its timesheet and the columns both sides know about.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Task {
    pub timesheet: Timesheet,
    pub asset_group: AssetGroup,
    /// Column name -> index in `timesheet.columns()`.
    pub columns: BTreeMap<String, usize>,
}

impl Task {
    /// Resolved columns in their original left-to-right order.
    pub fn ordered_columns(&self) -> Vec<&str> {
        let mut cols: Vec<(&str, usize)> = self
            .columns
            .iter()
            .map(|(c, &i)| (c.as_str(), i))
            .collect();
        cols.sort_by_key(|&(_, i)| i);
        cols.into_iter().map(|(c, _)| c).collect()
    }
}

/// Intersect the timesheet's columns with the group's cels.
///
/// Columns without a cel are dropped silently; a timesheet may name more columns than the group
/// has footage for.
pub fn resolve_task(timesheet: &Timesheet, asset_group: &AssetGroup) -> Task {
    let columns: BTreeMap<String, usize> = timesheet
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, c)| asset_group.has_cel(c))
        .map(|(i, c)| (c.clone(), i))
        .collect();

    tracing::debug!(
        group = %asset_group.name,
        resolved = columns.len(),
        dropped = timesheet.columns().len() - columns.len(),
        "resolved columns"
    );

    Task {
        timesheet: timesheet.clone(),
        asset_group: asset_group.clone(),
        columns,
    }
}

/// Pair every timesheet with its asset group and resolve the columns.
///
/// Groups are located per timesheet (missing or duplicated groups fail), and tasks come out in
/// that discovery order.
#[tracing::instrument(skip_all, fields(timesheets = timesheets.len(), groups = groups.len()))]
pub fn build_tasks(timesheets: &[Timesheet], groups: &[AssetGroup]) -> SyncResult<Vec<Task>> {
    let discovered = timesheets
        .iter()
        .map(|ts| locate_asset_group(groups, ts.name()))
        .collect::<SyncResult<Vec<_>>>()?;

    discovered
        .into_iter()
        .map(|group| -> SyncResult<Task> {
            let timesheet = timesheets
                .iter()
                .find(|ts| ts.name() == group.timesheet_name)
                .ok_or_else(|| SyncError::MissingTimesheet(group.timesheet_name.clone()))?;
            Ok(resolve_task(timesheet, group))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/sync/task.rs"]
mod tests;
