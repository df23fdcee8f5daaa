/// Convenience result type used across the crate.
pub type SyncResult<T> = Result<T, SyncError>;

/// Every failure the sync pipeline can surface.
///
/// All variants are fatal: nothing inside the crate retries or recovers. Messages name the
/// offending timesheet file, asset group or column so they can be shown to the user verbatim.
#[derive(thiserror::Error, Debug)]
pub enum SyncError {
    /// A header column name is empty or whitespace-only.
    #[error(
        "discovered an unnamed column in timesheet `{file}`; ensure all columns are given names with visible characters"
    )]
    MalformedColumnName { file: String },

    /// Two header column names are exactly equal.
    #[error(
        "duplicate column name `{column}` in timesheet `{file}`; remove duplicate column names and update the XDTS file"
    )]
    DuplicateColumnName { file: String, column: String },

    /// A cel reference could not be read as a frame number.
    #[error(
        "issue parsing frame data for `{file}`, frame with value `{value}` is not supported; frames must be specified by number and hybrid notations such as `1 1a 2 2a` are not supported"
    )]
    UnsupportedFrameNotation { file: String, value: String },

    /// Header and field sections disagree on the number of columns.
    #[error(
        "mismatched column headers and column data, found {headers} header(s) and {tracks} entries in XDTS file `{file}`"
    )]
    ColumnCountMismatch {
        file: String,
        headers: usize,
        tracks: usize,
    },

    /// The raw payload contains a reserved property name.
    #[error(
        "detected the value `{token}` within `{file}`; ensure there are no columns with this name and update the XDTS file"
    )]
    UnsafeColumnName { file: String, token: &'static str },

    /// The payload declares no time table.
    #[error("timesheet `{file}` does not contain any time table")]
    MissingTimeTable { file: String },

    /// The payload is not valid JSON or does not have the XDTS shape.
    #[error("could not parse timesheet `{file}`: {message}")]
    Payload { file: String, message: String },

    /// No asset group exists for a timesheet.
    #[error("could not find sync folder with name `{0}`")]
    MissingAssetGroup(String),

    /// More than one asset group shares a name.
    #[error("found too many sync folders with name `{0}`; ensure there is only 1 sync folder with this name")]
    DuplicateAssetGroup(String),

    /// An asset group points at a timesheet that was never decoded.
    #[error("could not find timesheet with name `{0}` for task processing")]
    MissingTimesheet(String),

    /// Invalid settings file contents.
    #[error("invalid settings file: {0}")]
    Settings(String),

    /// Failure reported by the host project.
    #[error("host error: {0}")]
    Host(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SyncError {
    /// Build a [`SyncError::Settings`] value.
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }

    /// Build a [`SyncError::Host`] value naming the asset group and column involved.
    pub fn host(group: &str, column: &str, msg: impl std::fmt::Display) -> Self {
        Self::Host(format!("{msg} (sync folder `{group}`, column `{column}`)"))
    }

    /// Build a [`SyncError::Payload`] value.
    pub fn payload(file: &str, msg: impl std::fmt::Display) -> Self {
        Self::Payload {
            file: file.to_string(),
            message: msg.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
