use std::{fs::File, io::BufReader, path::Path};

use crate::foundation::error::{SyncError, SyncResult};

/// File name the settings are looked up under, next to the project.
pub const SETTINGS_FILE_NAME: &str = "xdts-sync.json";

/// User settings; every key is optional and falls back to its default.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Folder holding the `.xdts` files, relative to the project file.
    pub timesheet_folder: String,
    /// Subfolder of each sync folder holding the cels.
    pub input_folder: String,
    /// Subfolder of each sync folder receiving one composition per column.
    pub output_folder: String,
    /// Number shown for the first frame when listing exposures (0 or 1).
    pub start_frame: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timesheet_folder: "./XDTS".to_string(),
            input_folder: "Input".to_string(),
            output_folder: "Comps".to_string(),
            start_frame: 1,
        }
    }
}

impl Settings {
    pub fn from_reader<R: std::io::Read>(r: R) -> SyncResult<Self> {
        let settings: Settings =
            serde_json::from_reader(r).map_err(|e| SyncError::settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_path(path: impl AsRef<Path>) -> SyncResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SyncError::settings(format!("open settings '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Load `xdts-sync.json` from `dir`, or the defaults when there is none.
    pub fn load_or_default(dir: impl AsRef<Path>) -> SyncResult<Self> {
        let path = dir.as_ref().join(SETTINGS_FILE_NAME);
        if path.is_file() {
            tracing::info!(path = %path.display(), "loading settings");
            Self::from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> SyncResult<()> {
        if self.timesheet_folder.is_empty() {
            return Err(SyncError::settings("timesheetFolder is empty"));
        }
        if self.input_folder.is_empty() {
            return Err(SyncError::settings("inputFolder is empty"));
        }
        if self.output_folder.is_empty() {
            return Err(SyncError::settings("outputFolder is empty"));
        }
        if self.start_frame > 1 {
            return Err(SyncError::settings("startFrame is not 0 or 1"));
        }
        Ok(())
    }

    /// Frame number as displayed to the user.
    pub fn display_frame(&self, frame: u32) -> u32 {
        frame + self.start_frame
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
