use std::collections::{BTreeMap, BTreeSet};

use crate::{
    config::settings::Settings,
    curves::synth::{Curve, Interpolation},
    foundation::{
        core::FrameRate,
        error::{SyncError, SyncResult},
    },
    host::api::{ColumnRef, CompSettings, Host, LayerTiming, PropertyKind},
    project::asset_group::{AssetGroup, CelInfo},
};

/// In-memory project: sync folders with cel and composition subfolders.
///
/// Serializes to and from JSON so a project can be described in a file, synchronized, and
/// written back out.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryHost {
    pub folders: Vec<SyncFolder>,
    /// Labels of closed undo groups, oldest first.
    #[serde(default)]
    pub undo_history: Vec<String>,
    #[serde(skip)]
    open_undo_group: Option<String>,
    #[serde(skip)]
    layout: FolderLayout,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct FolderLayout {
    input: String,
    output: String,
}

impl Default for FolderLayout {
    fn default() -> Self {
        let s = Settings::default();
        Self {
            input: s.input_folder,
            output: s.output_folder,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SyncFolder {
    pub name: String,
    #[serde(default)]
    pub folders: Vec<SubFolder>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SubFolder {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub cels: BTreeMap<String, MemoryCel>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub comps: BTreeMap<String, MemoryComp>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryCel {
    pub width: u32,
    pub height: u32,
    pub pixel_aspect: f64,
    pub frame_rate: FrameRate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_count: Option<u32>,
}

impl MemoryCel {
    pub fn new(info: CelInfo) -> Self {
        Self {
            width: info.width,
            height: info.height,
            pixel_aspect: info.pixel_aspect,
            frame_rate: info.frame_rate,
            loop_count: None,
        }
    }

    pub fn info(&self) -> CelInfo {
        CelInfo {
            width: self.width,
            height: self.height,
            pixel_aspect: self.pixel_aspect,
            frame_rate: self.frame_rate,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MemoryComp {
    pub settings: CompSettings,
    #[serde(default)]
    pub layers: Vec<MemoryLayer>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryLayer {
    /// Name of the cel the layer shows.
    pub source: String,
    #[serde(default)]
    pub timing: LayerTiming,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_remap: Option<Curve>,
    #[serde(default)]
    pub opacity: Curve,
}

impl MemoryHost {
    pub fn new(folders: Vec<SyncFolder>) -> Self {
        Self {
            folders,
            ..Self::default()
        }
    }

    pub fn from_reader<R: std::io::Read>(r: R) -> SyncResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| SyncError::Host(format!("parse project JSON: {e}")))
    }

    /// Use the input/output subfolder names from `settings`.
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.layout = FolderLayout {
            input: settings.input_folder.clone(),
            output: settings.output_folder.clone(),
        };
        self
    }

    /// Snapshot every sync folder (named `[<timesheet>]`) as an [`AssetGroup`].
    ///
    /// The input subfolder must exist exactly once; the output subfolder may be missing.
    pub fn asset_groups(&self) -> SyncResult<Vec<AssetGroup>> {
        let mut out = Vec::new();
        for folder in &self.folders {
            let Some(timesheet_name) = folder
                .name
                .strip_prefix('[')
                .and_then(|n| n.strip_suffix(']'))
            else {
                continue;
            };

            let inputs = unique_subfolder(folder, &self.layout.input)?.ok_or_else(|| {
                SyncError::Host(format!(
                    "could not find `{}` subfolder in `{}`",
                    self.layout.input, folder.name
                ))
            })?;
            let outputs = unique_subfolder(folder, &self.layout.output)?;

            out.push(AssetGroup {
                name: folder.name.clone(),
                timesheet_name: timesheet_name.to_string(),
                cels: inputs
                    .cels
                    .iter()
                    .map(|(n, c)| (n.clone(), c.info()))
                    .collect(),
                comps: outputs
                    .map(|o| o.comps.keys().cloned().collect())
                    .unwrap_or_else(BTreeSet::new),
                has_output_folder: outputs.is_some(),
            });
        }
        Ok(out)
    }

    pub fn is_undo_group_open(&self) -> bool {
        self.open_undo_group.is_some()
    }

    pub fn folder(&self, group: &str) -> SyncResult<&SyncFolder> {
        self.folders
            .iter()
            .find(|f| f.name == group)
            .ok_or_else(|| SyncError::MissingAssetGroup(group.to_string()))
    }

    fn folder_mut(&mut self, group: &str) -> SyncResult<&mut SyncFolder> {
        self.folders
            .iter_mut()
            .find(|f| f.name == group)
            .ok_or_else(|| SyncError::MissingAssetGroup(group.to_string()))
    }

    pub fn cel(&self, at: ColumnRef<'_>) -> SyncResult<&MemoryCel> {
        let folder = self.folder(at.group)?;
        unique_subfolder(folder, &self.layout.input)?
            .and_then(|f| f.cels.get(at.column))
            .ok_or_else(|| SyncError::host(at.group, at.column, "could not find cel"))
    }

    pub fn comp(&self, at: ColumnRef<'_>) -> SyncResult<&MemoryComp> {
        let folder = self.folder(at.group)?;
        unique_subfolder(folder, &self.layout.output)?
            .and_then(|f| f.comps.get(at.column))
            .ok_or_else(|| SyncError::host(at.group, at.column, "could not find composition"))
    }

    fn subfolder_mut(&mut self, group: &str, name: &str) -> SyncResult<Option<&mut SubFolder>> {
        let folder = self.folder_mut(group)?;
        let mut found = folder.folders.iter_mut().filter(|f| f.name == name);
        let first = found.next();
        if found.next().is_some() {
            return Err(SyncError::Host(format!(
                "found duplicate `{name}` subfolders in `{group}`"
            )));
        }
        Ok(first)
    }

    fn cel_mut(&mut self, at: ColumnRef<'_>) -> SyncResult<&mut MemoryCel> {
        let input = self.layout.input.clone();
        self.subfolder_mut(at.group, &input)?
            .and_then(|f| f.cels.get_mut(at.column))
            .ok_or_else(|| SyncError::host(at.group, at.column, "could not find cel"))
    }

    fn comp_mut(&mut self, at: ColumnRef<'_>) -> SyncResult<&mut MemoryComp> {
        let output = self.layout.output.clone();
        self.subfolder_mut(at.group, &output)?
            .and_then(|f| f.comps.get_mut(at.column))
            .ok_or_else(|| SyncError::host(at.group, at.column, "could not find composition"))
    }

    fn layer_mut(&mut self, at: ColumnRef<'_>) -> SyncResult<&mut MemoryLayer> {
        self.comp_mut(at)?
            .layers
            .first_mut()
            .ok_or_else(|| SyncError::host(at.group, at.column, "composition has no layer"))
    }

    fn property_mut(&mut self, at: ColumnRef<'_>, property: PropertyKind) -> SyncResult<&mut Curve> {
        let layer = self.layer_mut(at)?;
        match property {
            PropertyKind::Opacity => Ok(&mut layer.opacity),
            PropertyKind::SourceFrame => layer
                .time_remap
                .as_mut()
                .ok_or_else(|| SyncError::host(at.group, at.column, "layer has no time remap")),
        }
    }
}

fn unique_subfolder<'a>(folder: &'a SyncFolder, name: &str) -> SyncResult<Option<&'a SubFolder>> {
    let mut found = folder.folders.iter().filter(|f| f.name == name);
    let first = found.next();
    if found.next().is_some() {
        return Err(SyncError::Host(format!(
            "found duplicate `{name}` subfolders in `{}`",
            folder.name
        )));
    }
    Ok(first)
}

impl Host for MemoryHost {
    fn begin_undo_group(&mut self, label: &str) -> SyncResult<()> {
        if let Some(open) = &self.open_undo_group {
            return Err(SyncError::Host(format!(
                "undo group `{open}` is still open"
            )));
        }
        self.open_undo_group = Some(label.to_string());
        Ok(())
    }

    fn end_undo_group(&mut self) -> SyncResult<()> {
        let label = self
            .open_undo_group
            .take()
            .ok_or_else(|| SyncError::Host("no undo group is open".to_string()))?;
        self.undo_history.push(label);
        Ok(())
    }

    fn ensure_output_folder(&mut self, group: &str) -> SyncResult<()> {
        let output = self.layout.output.clone();
        if self.subfolder_mut(group, &output)?.is_none() {
            tracing::debug!(group, folder = %output, "creating output folder");
            self.folder_mut(group)?.folders.push(SubFolder {
                name: output,
                ..SubFolder::default()
            });
        }
        Ok(())
    }

    fn cel_info(&self, at: ColumnRef<'_>) -> SyncResult<CelInfo> {
        self.cel(at).map(MemoryCel::info)
    }

    fn loop_cel(&mut self, at: ColumnRef<'_>, loops: u32) -> SyncResult<()> {
        self.cel_mut(at)?.loop_count = Some(loops);
        Ok(())
    }

    fn ensure_comp(&mut self, at: ColumnRef<'_>, stub: &CompSettings) -> SyncResult<bool> {
        let output = self.layout.output.clone();
        let outputs = self
            .subfolder_mut(at.group, &output)?
            .ok_or_else(|| SyncError::host(at.group, at.column, "output folder is missing"))?;
        if outputs.comps.contains_key(at.column) {
            return Ok(false);
        }
        outputs.comps.insert(
            at.column.to_string(),
            MemoryComp {
                settings: *stub,
                layers: Vec::new(),
            },
        );
        Ok(true)
    }

    fn configure_comp(&mut self, at: ColumnRef<'_>, settings: &CompSettings) -> SyncResult<()> {
        self.comp_mut(at)?.settings = *settings;
        Ok(())
    }

    fn replace_layers_with_cel(&mut self, at: ColumnRef<'_>) -> SyncResult<()> {
        self.cel(at)?;
        let comp = self.comp_mut(at)?;
        comp.layers.clear();
        comp.layers.push(MemoryLayer {
            source: at.column.to_string(),
            timing: LayerTiming::default(),
            time_remap: None,
            opacity: Curve::default(),
        });
        Ok(())
    }

    fn set_layer_timing(&mut self, at: ColumnRef<'_>, timing: LayerTiming) -> SyncResult<()> {
        self.layer_mut(at)?.timing = timing;
        Ok(())
    }

    fn add_time_remap(&mut self, at: ColumnRef<'_>) -> SyncResult<()> {
        self.layer_mut(at)?.time_remap = Some(Curve::default());
        Ok(())
    }

    fn set_values_at_times(
        &mut self,
        at: ColumnRef<'_>,
        property: PropertyKind,
        times: &[f64],
        values: &[f64],
    ) -> SyncResult<()> {
        if times.len() != values.len() {
            return Err(SyncError::host(
                at.group,
                at.column,
                format!("{} times but {} values", times.len(), values.len()),
            ));
        }
        self.property_mut(at, property)?
            .set_values_at_times(times, values);
        Ok(())
    }

    fn key_count(&self, at: ColumnRef<'_>, property: PropertyKind) -> SyncResult<usize> {
        let layer = self
            .comp(at)?
            .layers
            .first()
            .ok_or_else(|| SyncError::host(at.group, at.column, "composition has no layer"))?;
        match property {
            PropertyKind::Opacity => Ok(layer.opacity.keys.len()),
            PropertyKind::SourceFrame => layer
                .time_remap
                .as_ref()
                .map(|c| c.keys.len())
                .ok_or_else(|| SyncError::host(at.group, at.column, "layer has no time remap")),
        }
    }

    fn set_key_hold(
        &mut self,
        at: ColumnRef<'_>,
        property: PropertyKind,
        key: usize,
    ) -> SyncResult<()> {
        let curve = self.property_mut(at, property)?;
        let k = curve
            .keys
            .get_mut(key)
            .ok_or_else(|| SyncError::host(at.group, at.column, format!("no key {key}")))?;
        k.in_interp = Interpolation::Hold;
        k.out_interp = Interpolation::Hold;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/memory.rs"]
mod tests;
