use std::collections::{BTreeMap, BTreeSet};

use crate::foundation::{
    core::FrameRate,
    error::{SyncError, SyncResult},
};

/// Footage settings of a source clip ("cel").
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelInfo {
    pub width: u32,
    pub height: u32,
    pub pixel_aspect: f64,
    pub frame_rate: FrameRate,
}

/// Read-only snapshot of one sync folder in the host project.
///
/// The host owns the actual clips and compositions; this only records what exists by name.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AssetGroup {
    pub name: String,
    /// Display name of the timesheet this group is synchronized from.
    pub timesheet_name: String,
    pub cels: BTreeMap<String, CelInfo>,
    pub comps: BTreeSet<String>,
    pub has_output_folder: bool,
}

impl AssetGroup {
    pub fn has_cel(&self, column: &str) -> bool {
        self.cels.contains_key(column)
    }

    pub fn cel(&self, column: &str) -> SyncResult<&CelInfo> {
        self.cels
            .get(column)
            .ok_or_else(|| SyncError::host(&self.name, column, "no cel with this name"))
    }
}

/// Folder name a timesheet's asset group is expected under: `[<timesheet name>]`.
pub fn sync_folder_name(timesheet_name: &str) -> String {
    format!("[{timesheet_name}]")
}

/// Find the single asset group synchronized from `timesheet_name`.
pub fn locate_asset_group<'a>(
    groups: &'a [AssetGroup],
    timesheet_name: &str,
) -> SyncResult<&'a AssetGroup> {
    let expected = sync_folder_name(timesheet_name);
    let mut found = groups.iter().filter(|g| g.name == expected);

    let group = found
        .next()
        .ok_or_else(|| SyncError::MissingAssetGroup(expected.clone()))?;
    if found.next().is_some() {
        return Err(SyncError::DuplicateAssetGroup(expected));
    }
    Ok(group)
}
