use crate::{foundation::core::FrameRate, timesheet::model::ExposureEvent};

/// Source-frame value meaning "sample nothing".
pub const NO_SOURCE: f64 = -1.0;

pub const OPACITY_HIDDEN: f64 = 0.0;
pub const OPACITY_VISIBLE: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Interpolation {
    Linear,
    Hold,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveKey {
    pub time: f64, // seconds
    pub value: f64,
    pub in_interp: Interpolation,
    pub out_interp: Interpolation,
}

/// Keys of one animated property, in the order they were set.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Curve {
    pub keys: Vec<CurveKey>,
}

impl Curve {
    /// Append keys from parallel time/value slices. New keys interpolate linearly.
    pub fn set_values_at_times(&mut self, times: &[f64], values: &[f64]) {
        debug_assert_eq!(times.len(), values.len());
        self.keys
            .extend(times.iter().zip(values).map(|(&time, &value)| CurveKey {
                time,
                value,
                in_interp: Interpolation::Linear,
                out_interp: Interpolation::Linear,
            }));
    }

    /// Force step interpolation on both sides of every key.
    pub fn hold_all(&mut self) {
        for k in &mut self.keys {
            k.in_interp = Interpolation::Hold;
            k.out_interp = Interpolation::Hold;
        }
    }

    pub fn is_held(&self) -> bool {
        self.keys
            .iter()
            .all(|k| k.in_interp == Interpolation::Hold && k.out_interp == Interpolation::Hold)
    }

    pub fn points(&self) -> Vec<(f64, f64)> {
        self.keys.iter().map(|k| (k.time, k.value)).collect()
    }

    /// Value in effect at `time` under hold semantics; the first key holds backward.
    pub fn sample_hold(&self, time: f64) -> Option<f64> {
        let idx = self.keys.partition_point(|k| k.time <= time);
        match idx {
            0 => self.keys.first().map(|k| k.value),
            i => Some(self.keys[i - 1].value),
        }
    }
}

/// Parallel time/value arrays ready to hand to a host property.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeySeries {
    pub times: Vec<f64>,
    pub values: Vec<f64>,
}

impl KeySeries {
    fn push(&mut self, time: f64, value: f64) {
        self.times.push(time);
        self.values.push(value);
    }
}

/// Remap keys: one per event, `-1` for empty cells, otherwise the 0-indexed source frame.
///
/// No key is added before the first event; hosts hold the first key backward.
pub fn source_frame_series(exposures: &[ExposureEvent], rate: FrameRate) -> KeySeries {
    let mut s = KeySeries::default();
    for e in exposures {
        let value = match e.value {
            Some(cel) => f64::from(cel.source_ordinal()),
            None => NO_SOURCE,
        };
        s.push(rate.frames_to_secs(e.frame), value);
    }
    s
}

/// Opacity keys: hidden at time 0 unless frame 0 is authored, then 0/100 per event.
pub fn opacity_series(exposures: &[ExposureEvent], rate: FrameRate) -> KeySeries {
    let mut s = KeySeries::default();
    if exposures.first().is_none_or(|e| e.frame > 0) {
        s.push(0.0, OPACITY_HIDDEN);
    }
    for e in exposures {
        let value = if e.value.is_some() {
            OPACITY_VISIBLE
        } else {
            OPACITY_HIDDEN
        };
        s.push(rate.frames_to_secs(e.frame), value);
    }
    s
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColumnCurves {
    pub source_frame: Curve,
    pub opacity: Curve,
}

/// Build both stepped curves for one column.
///
/// Keys are set first and converted to hold in a separate pass, the same order a host applies
/// them in.
pub fn synthesize_column(exposures: &[ExposureEvent], rate: FrameRate) -> ColumnCurves {
    let remap = source_frame_series(exposures, rate);
    let opacity = opacity_series(exposures, rate);

    let mut curves = ColumnCurves::default();
    curves
        .source_frame
        .set_values_at_times(&remap.times, &remap.values);
    curves
        .opacity
        .set_values_at_times(&opacity.times, &opacity.values);

    curves.source_frame.hold_all();
    curves.opacity.hold_all();
    curves
}

#[cfg(test)]
#[path = "../../tests/unit/curves/synth.rs"]
mod tests;
