use crate::{
    curves::synth::{KeySeries, opacity_series, source_frame_series},
    foundation::error::SyncResult,
    host::api::{ColumnRef, CompSettings, Host, LayerTiming, PropertyKind},
    sync::task::Task,
};

/// Label of the undo group wrapping the apply phase.
pub const UNDO_GROUP_LABEL: &str = "Synchronize Timesheets";

/// Apply every task to the host inside one undo group.
///
/// The group is closed whether or not a step fails; mutations made before a failure stay
/// applied and are undone as one unit by the user.
#[tracing::instrument(skip_all, fields(tasks = tasks.len()))]
pub fn apply_tasks(host: &mut dyn Host, tasks: &[Task]) -> SyncResult<()> {
    host.begin_undo_group(UNDO_GROUP_LABEL)?;
    let result = apply_phases(host, tasks);
    let closed = host.end_undo_group();
    result?;
    closed
}

fn apply_phases(host: &mut dyn Host, tasks: &[Task]) -> SyncResult<()> {
    for task in tasks {
        populate_missing(host, task)?;
    }
    for task in tasks {
        fix_cel_settings(host, task)?;
    }
    for task in tasks {
        fix_comp_settings(host, task)?;
    }
    for task in tasks {
        retime_comps(host, task)?;
    }
    Ok(())
}

/// Create the output folder and stub compositions for columns that have none yet.
fn populate_missing(host: &mut dyn Host, task: &Task) -> SyncResult<()> {
    let group = task.asset_group.name.as_str();
    if !task.asset_group.has_output_folder {
        host.ensure_output_folder(group)?;
    }

    let stub = CompSettings::stub();
    for column in task.ordered_columns() {
        if host.ensure_comp(ColumnRef::new(group, column), &stub)? {
            tracing::info!(group, column, "created composition");
        }
    }
    Ok(())
}

/// Loop every cel enough times to outlast the timesheet.
fn fix_cel_settings(host: &mut dyn Host, task: &Task) -> SyncResult<()> {
    let group = task.asset_group.name.as_str();
    for column in task.ordered_columns() {
        host.loop_cel(ColumnRef::new(group, column), task.timesheet.duration())?;
    }
    Ok(())
}

/// Match each composition to its cel and rebuild its single layer.
fn fix_comp_settings(host: &mut dyn Host, task: &Task) -> SyncResult<()> {
    let group = task.asset_group.name.as_str();
    let duration = task.timesheet.duration();

    for column in task.ordered_columns() {
        let at = ColumnRef::new(group, column);
        let cel = host.cel_info(at)?;
        let settings = CompSettings::matching_cel(&cel, duration);

        host.configure_comp(at, &settings)?;
        host.replace_layers_with_cel(at)?;
        host.set_layer_timing(
            at,
            LayerTiming {
                start_time: 0.0,
                in_point: 0.0,
                out_point: settings.duration_secs,
            },
        )?;
    }
    Ok(())
}

/// Write stepped remap and opacity keys on every layer.
fn retime_comps(host: &mut dyn Host, task: &Task) -> SyncResult<()> {
    let group = task.asset_group.name.as_str();

    for column in task.ordered_columns() {
        let at = ColumnRef::new(group, column);
        let exposures = task.timesheet.exposures(column).unwrap_or_default();
        // The composition rate was matched to the cel's in `fix_comp_settings`.
        let rate = host.cel_info(at)?.frame_rate;

        host.add_time_remap(at)?;
        let remap = source_frame_series(exposures, rate);
        let opacity = opacity_series(exposures, rate);
        set_series(host, at, PropertyKind::SourceFrame, &remap)?;
        set_series(host, at, PropertyKind::Opacity, &opacity)?;

        // Interpolation is per key, so it can only be set once all keys exist.
        hold_all_keys(host, at, PropertyKind::SourceFrame)?;
        hold_all_keys(host, at, PropertyKind::Opacity)?;

        tracing::debug!(
            group,
            column,
            remap_keys = remap.times.len(),
            opacity_keys = opacity.times.len(),
            "retimed column"
        );
    }
    Ok(())
}

fn set_series(
    host: &mut dyn Host,
    at: ColumnRef<'_>,
    property: PropertyKind,
    series: &KeySeries,
) -> SyncResult<()> {
    host.set_values_at_times(at, property, &series.times, &series.values)
}

fn hold_all_keys(host: &mut dyn Host, at: ColumnRef<'_>, property: PropertyKind) -> SyncResult<()> {
    for key in 0..host.key_count(at, property)? {
        host.set_key_hold(at, property, key)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/sync/apply.rs"]
mod tests;
