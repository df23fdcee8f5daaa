use crate::{
    foundation::{core::FrameRate, error::SyncResult},
    project::asset_group::CelInfo,
};

/// Addresses one column of one asset group: its cel and its output composition share the name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnRef<'a> {
    pub group: &'a str,
    pub column: &'a str,
}

impl<'a> ColumnRef<'a> {
    pub fn new(group: &'a str, column: &'a str) -> Self {
        Self { group, column }
    }
}

/// Animated layer properties written by the synchronizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PropertyKind {
    /// Source frame of the time-remap effect.
    SourceFrame,
    /// Layer opacity, 0..=100.
    Opacity,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompSettings {
    pub width: u32,
    pub height: u32,
    pub pixel_aspect: f64,
    pub duration_secs: f64,
    pub frame_rate: FrameRate,
}

impl CompSettings {
    /// Placeholder settings for compositions created before they are matched to a cel.
    pub fn stub() -> Self {
        Self {
            width: 100,
            height: 100,
            pixel_aspect: 1.0,
            duration_secs: 10.0,
            frame_rate: FrameRate::FILM,
        }
    }

    /// Settings mirroring `cel`, long enough for `duration_frames` of the timesheet.
    pub fn matching_cel(cel: &CelInfo, duration_frames: u32) -> Self {
        Self {
            width: cel.width,
            height: cel.height,
            pixel_aspect: cel.pixel_aspect,
            duration_secs: cel.frame_rate.frames_to_secs(duration_frames),
            frame_rate: cel.frame_rate,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerTiming {
    pub start_time: f64,
    pub in_point: f64,
    pub out_point: f64,
}

/// Mutation surface of the compositing host.
///
/// Every call is synchronous. Implementations report missing clips, compositions or layers as
/// errors naming the group and column. Key indices are 0-based in set order.
pub trait Host {
    fn begin_undo_group(&mut self, label: &str) -> SyncResult<()>;
    fn end_undo_group(&mut self) -> SyncResult<()>;

    /// Create the group's output folder if it does not exist yet.
    fn ensure_output_folder(&mut self, group: &str) -> SyncResult<()>;

    fn cel_info(&self, at: ColumnRef<'_>) -> SyncResult<CelInfo>;

    /// Loop the cel's source `loops` times so it covers the whole timesheet.
    fn loop_cel(&mut self, at: ColumnRef<'_>, loops: u32) -> SyncResult<()>;

    /// Create the output composition with `stub` settings if it is missing.
    /// Returns `true` when a composition was created.
    fn ensure_comp(&mut self, at: ColumnRef<'_>, stub: &CompSettings) -> SyncResult<bool>;

    fn configure_comp(&mut self, at: ColumnRef<'_>, settings: &CompSettings) -> SyncResult<()>;

    /// Remove every layer of the composition and add a single layer showing the cel.
    fn replace_layers_with_cel(&mut self, at: ColumnRef<'_>) -> SyncResult<()>;

    fn set_layer_timing(&mut self, at: ColumnRef<'_>, timing: LayerTiming) -> SyncResult<()>;

    /// Attach a whole-frame, source-frame time-remap effect to the layer.
    fn add_time_remap(&mut self, at: ColumnRef<'_>) -> SyncResult<()>;

    fn set_values_at_times(
        &mut self,
        at: ColumnRef<'_>,
        property: PropertyKind,
        times: &[f64],
        values: &[f64],
    ) -> SyncResult<()>;

    fn key_count(&self, at: ColumnRef<'_>, property: PropertyKind) -> SyncResult<usize>;

    /// Set hold interpolation on both sides of key `key`.
    fn set_key_hold(&mut self, at: ColumnRef<'_>, property: PropertyKind, key: usize)
    -> SyncResult<()>;
}
