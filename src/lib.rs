//! xdts-sync turns exchange-format exposure timesheets (`.xdts`) into stepped animation curves.
//!
//! A timesheet records, per column and per frame, which drawing ("cel") of a column is exposed.
//! For every column that has matching footage in the host project, the synchronizer writes two
//! hold-interpolated curves onto a composition's layer: a time-remap curve selecting the source
//! frame, and an opacity curve hiding the layer on empty cells.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: XDTS text -> [`Timesheet`] ([`read_timesheet`], [`Timesheet::from_path`])
//! 2. **Resolve**: `Timesheet` x [`AssetGroup`] -> [`Task`] ([`resolve_task`], [`build_tasks`])
//! 3. **Synthesize**: exposures -> [`ColumnCurves`] ([`synthesize_column`])
//! 4. **Apply**: tasks -> host mutations through the [`Host`] trait ([`apply_tasks`]), inside
//!    one undo group
//!
//! Decoding and resolving are pure. Only the apply step touches the host, and [`MemoryHost`]
//! provides an in-memory project for running the whole pipeline without one.
#![forbid(unsafe_code)]

mod config;
mod curves;
mod foundation;
mod host;
mod project;
mod sync;
mod timesheet;

pub use config::settings::{SETTINGS_FILE_NAME, Settings};
pub use curves::synth::{
    ColumnCurves, Curve, CurveKey, Interpolation, KeySeries, NO_SOURCE, OPACITY_HIDDEN,
    OPACITY_VISIBLE, opacity_series, source_frame_series, synthesize_column,
};
pub use foundation::core::FrameRate;
pub use foundation::error::{SyncError, SyncResult};
pub use host::api::{ColumnRef, CompSettings, Host, LayerTiming, PropertyKind};
pub use host::memory::{MemoryCel, MemoryComp, MemoryHost, MemoryLayer, SubFolder, SyncFolder};
pub use project::asset_group::{AssetGroup, CelInfo, locate_asset_group, sync_folder_name};
pub use sync::apply::{UNDO_GROUP_LABEL, apply_tasks};
pub use sync::pipeline::{XDTS_EXTENSION, find_timesheet_files, load_timesheets, synchronize};
pub use sync::task::{Task, build_tasks, resolve_task};
pub use timesheet::decode::{
    RESERVED_TOKENS, XDTS_SIGNATURE, decode_timesheet, guard_reserved_tokens, read_timesheet,
    strip_signature,
};
pub use timesheet::model::{CelNumber, ExposureEvent, NULL_CELL, Timesheet};
pub use timesheet::payload;
