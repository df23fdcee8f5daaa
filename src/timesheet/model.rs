use std::collections::{BTreeMap, HashSet};

use crate::foundation::error::{SyncError, SyncResult};

/// Sentinel cel value meaning "empty cell": nothing is shown from this frame.
pub const NULL_CELL: &str = "SYMBOL_NULL_CELL";

/// A 1-indexed source frame number as authored on the timesheet.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct CelNumber(u32);

impl CelNumber {
    pub fn new(n: u32) -> Option<Self> {
        (n >= 1).then_some(Self(n))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// 0-indexed ordinal used by the time-remap mechanism.
    pub fn source_ordinal(self) -> u32 {
        self.0 - 1
    }
}

impl TryFrom<u32> for CelNumber {
    type Error = String;

    fn try_from(n: u32) -> Result<Self, String> {
        Self::new(n).ok_or_else(|| format!("cel number must be >= 1, got {n}"))
    }
}

impl From<CelNumber> for u32 {
    fn from(c: CelNumber) -> u32 {
        c.0
    }
}

/// A change, starting at `frame`, of what a column shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExposureEvent {
    pub frame: u32,
    pub value: Option<CelNumber>, // None = empty cell
}

impl ExposureEvent {
    pub fn shown(frame: u32, cel: CelNumber) -> Self {
        Self {
            frame,
            value: Some(cel),
        }
    }

    pub fn empty(frame: u32) -> Self {
        Self { frame, value: None }
    }
}

/// A decoded timesheet: ordered column names and the exposures authored for each.
///
/// Column names are unique and never blank. Instances are only built through
/// [`Timesheet::new`], which enforces that, and are immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Timesheet {
    name: String,
    duration: u32, // total frames
    columns: Vec<String>,
    exposures: BTreeMap<String, Vec<ExposureEvent>>,
}

impl Timesheet {
    /// Build a timesheet from `(column, exposures)` pairs in left-to-right order.
    pub fn new(
        name: impl Into<String>,
        duration: u32,
        columns: Vec<(String, Vec<ExposureEvent>)>,
    ) -> SyncResult<Self> {
        let name = name.into();
        validate_column_names(&name, columns.iter().map(|(c, _)| c.as_str()))?;

        let mut names = Vec::with_capacity(columns.len());
        let mut exposures = BTreeMap::new();
        for (column, events) in columns {
            names.push(column.clone());
            exposures.insert(column, events);
        }

        Ok(Self {
            name,
            duration,
            columns: names,
            exposures,
        })
    }

    /// Display name of the file this timesheet was decoded from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn exposures(&self, column: &str) -> Option<&[ExposureEvent]> {
        self.exposures.get(column).map(Vec::as_slice)
    }

    /// Iterate `(column, exposures)` in left-to-right order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ExposureEvent])> {
        self.columns.iter().map(|c| {
            let events = self.exposures.get(c).map(Vec::as_slice).unwrap_or(&[]);
            (c.as_str(), events)
        })
    }
}

/// Reject blank and duplicated column names.
pub(crate) fn validate_column_names<'a>(
    file: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> SyncResult<()> {
    let names: Vec<&str> = names.into_iter().collect();

    if names.iter().any(|n| n.trim().is_empty()) {
        return Err(SyncError::MalformedColumnName {
            file: file.to_string(),
        });
    }

    let mut seen = HashSet::with_capacity(names.len());
    for n in names {
        if !seen.insert(n) {
            return Err(SyncError::DuplicateColumnName {
                file: file.to_string(),
                column: n.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/timesheet/model.rs"]
mod tests;
