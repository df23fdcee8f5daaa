use std::{fs, path::Path};

use crate::{
    foundation::error::{SyncError, SyncResult},
    timesheet::{
        model::{CelNumber, ExposureEvent, NULL_CELL, Timesheet, validate_column_names},
        payload::{CEL_REFERENCE_DATUM, RawValue, TimeTable, VISIBLE_FRAME_FIELD, XdtsPayload},
    },
};

/// First line of every XDTS file, preceding the JSON body.
pub const XDTS_SIGNATURE: &str = "exchangeDigitalTimeSheet Save Data";

/// Property names rejected anywhere in the raw payload text.
pub const RESERVED_TOKENS: [&str; 4] = ["__proto__", "prototype", "toString", "valueOf"];

/// Fail if `text` contains any reserved property name as a literal substring.
pub fn guard_reserved_tokens(file: &str, text: &str) -> SyncResult<()> {
    match RESERVED_TOKENS.into_iter().find(|t| text.contains(t)) {
        Some(token) => Err(SyncError::UnsafeColumnName {
            file: file.to_string(),
            token,
        }),
        None => Ok(()),
    }
}

/// Drop the signature line if present; bare JSON bodies pass through.
pub fn strip_signature(text: &str) -> &str {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    match text.strip_prefix(XDTS_SIGNATURE) {
        Some(rest) => rest.trim_start_matches(['\r', '\n']),
        None => text,
    }
}

/// Parse the full text of an XDTS file into a [`Timesheet`].
///
/// The reserved-token guard runs before any structural decoding.
#[tracing::instrument(skip(text), fields(bytes = text.len()))]
pub fn read_timesheet(name: &str, text: &str) -> SyncResult<Timesheet> {
    let body = strip_signature(text);
    guard_reserved_tokens(name, body)?;

    let payload: XdtsPayload =
        serde_json::from_str(body).map_err(|e| SyncError::payload(name, e))?;
    decode_timesheet(&payload, name)
}

impl Timesheet {
    /// Read and decode an XDTS file; the display name is the file name component.
    pub fn from_path(path: impl AsRef<Path>) -> SyncResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let text = fs::read_to_string(path).map_err(|e| {
            SyncError::Other(anyhow::anyhow!(
                "could not open timesheet `{}`: {e}",
                path.display()
            ))
        })?;
        read_timesheet(&name, &text)
    }
}

/// Turn a deserialized payload into a [`Timesheet`]. Only the first time table is consulted.
pub fn decode_timesheet(payload: &XdtsPayload, file: &str) -> SyncResult<Timesheet> {
    let table = payload
        .time_tables
        .first()
        .ok_or_else(|| SyncError::MissingTimeTable {
            file: file.to_string(),
        })?;

    let names = extract_column_names(table, file)?;
    let tracks = extract_tracks(table, file)?;

    if names.len() != tracks.len() {
        return Err(SyncError::ColumnCountMismatch {
            file: file.to_string(),
            headers: names.len(),
            tracks: tracks.len(),
        });
    }

    let columns: Vec<(String, Vec<ExposureEvent>)> = names.into_iter().zip(tracks).collect();
    tracing::debug!(file, columns = columns.len(), duration = table.duration, "decoded timesheet");
    Timesheet::new(file, table.duration, columns)
}

fn extract_column_names(table: &TimeTable, file: &str) -> SyncResult<Vec<String>> {
    let names = table
        .time_table_headers
        .iter()
        .find(|h| h.field_id == VISIBLE_FRAME_FIELD)
        .map(|h| h.names.clone())
        .unwrap_or_default();

    validate_column_names(file, names.iter().map(String::as_str))?;
    Ok(names)
}

/// One exposure sequence per visible-frame track, left to right.
fn extract_tracks(table: &TimeTable, file: &str) -> SyncResult<Vec<Vec<ExposureEvent>>> {
    let mut out = Vec::new();

    for field in table
        .fields
        .iter()
        .filter(|f| f.field_id == VISIBLE_FRAME_FIELD)
    {
        for track in &field.tracks {
            let mut events = Vec::with_capacity(track.frames.len());
            for block in &track.frames {
                for datum in block.data.iter().filter(|d| d.id == CEL_REFERENCE_DATUM) {
                    let raw = datum.values.first().ok_or_else(|| {
                        SyncError::UnsupportedFrameNotation {
                            file: file.to_string(),
                            value: String::new(),
                        }
                    })?;
                    events.push(ExposureEvent {
                        frame: block.frame,
                        value: coerce_cel(raw, file)?,
                    });
                }
            }
            out.push(events);
        }
    }

    Ok(out)
}

/// `None` for the empty-cell sentinel, otherwise the numeric cel reference.
pub(crate) fn coerce_cel(raw: &RawValue, file: &str) -> SyncResult<Option<CelNumber>> {
    let unsupported = || SyncError::UnsupportedFrameNotation {
        file: file.to_string(),
        value: raw.to_string(),
    };

    let n = match raw {
        RawValue::Text(s) if s == NULL_CELL => return Ok(None),
        RawValue::Text(s) => s.trim().parse::<f64>().map_err(|_| unsupported())?,
        RawValue::Number(n) => *n,
    };

    if !n.is_finite() || n.fract() != 0.0 || n < 1.0 || n > f64::from(u32::MAX) {
        return Err(unsupported());
    }
    CelNumber::new(n as u32).map(Some).ok_or_else(unsupported)
}

#[cfg(test)]
#[path = "../../tests/unit/timesheet/decode.rs"]
mod tests;
