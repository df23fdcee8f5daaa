use crate::foundation::error::{SyncError, SyncResult};

/// Composition frame rate in frames per second.
///
/// Hosts commonly report fractional rates (23.976, 29.97), so this is a float rather than a
/// rational like a timeline fps.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FrameRate(f64);

impl FrameRate {
    pub const FILM: Self = Self(24.0);

    pub fn new(fps: f64) -> SyncResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(SyncError::Other(anyhow::anyhow!(
                "frame rate must be a finite number > 0, got {fps}"
            )));
        }
        Ok(Self(fps))
    }

    pub fn as_f64(self) -> f64 {
        self.0
    }

    pub fn frames_to_secs(self, frames: u32) -> f64 {
        f64::from(frames) / self.0
    }
}

impl TryFrom<f64> for FrameRate {
    type Error = SyncError;

    fn try_from(v: f64) -> SyncResult<Self> {
        Self::new(v)
    }
}

impl From<FrameRate> for f64 {
    fn from(r: FrameRate) -> f64 {
        r.0
    }
}
