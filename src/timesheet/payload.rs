//! Schema-bound serde model of the XDTS JSON payload.
//!
//! Only the keys the decoder consults are modelled; everything else in the document is ignored.
//! Keys are plain struct fields, so input keys can never alias anything but data.

use serde::{Deserialize, Serialize};

/// Category tag of the visible-frame (cel) headers and fields.
pub const VISIBLE_FRAME_FIELD: i64 = 0;

/// Data item type of the cel-reference datum inside a frame block.
pub const CEL_REFERENCE_DATUM: i64 = 0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XdtsPayload {
    pub time_tables: Vec<TimeTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeTable {
    pub duration: u32,
    #[serde(default)]
    pub time_table_headers: Vec<TimeTableHeader>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeTableHeader {
    pub field_id: i64,
    #[serde(default)]
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub field_id: i64,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub frames: Vec<FrameBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameBlock {
    pub frame: u32,
    #[serde(default)]
    pub data: Vec<Datum>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Datum {
    pub id: i64,
    #[serde(default)]
    pub values: Vec<RawValue>,
}

/// A cel value as written in the file. XDTS writers emit strings, but bare numbers are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}
