use crate::foundation::{
    core::{Canvas, DurationMs, Rgba8},
    error::{CubistError, CubistResult},
};

/// Engine-level configuration. Defaults are the fixed production
/// constants; none of these vary per navigation call.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Output raster size of transition frames.
    pub canvas: Canvas,
    /// Page base color; also the opaque fill behind captured snapshots.
    pub background: Rgba8,
    /// Material for cube faces without a snapshot.
    pub placeholder: Rgba8,
    /// Scale applied to captured section rasters.
    pub snapshot_scale: f64,
    /// Bound on waiting for a section's images to decode during warm-up.
    pub decode_timeout: DurationMs,
    /// Pause between decode-readiness polls.
    pub decode_poll_interval: DurationMs,
    /// Fixed length of the cube rotation.
    pub transition_duration: DurationMs,
    /// Camera distance from the cube center, in cube units.
    pub perspective_distance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 1280,
                height: 720,
            },
            background: Rgba8::opaque(18, 20, 28),
            placeholder: Rgba8::opaque(46, 52, 64),
            snapshot_scale: crate::snapshot::capture::SNAPSHOT_SCALE,
            decode_timeout: crate::snapshot::capture::DECODE_TIMEOUT,
            decode_poll_interval: crate::snapshot::capture::DECODE_POLL_INTERVAL,
            transition_duration: crate::animation::pose::TRANSITION_DURATION,
            perspective_distance: 3.0,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> CubistResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(CubistError::validation("canvas must be non-empty"));
        }
        if !self.snapshot_scale.is_finite()
            || self.snapshot_scale <= 0.0
            || self.snapshot_scale > 1.0
        {
            return Err(CubistError::validation(
                "snapshot_scale must be in (0, 1]",
            ));
        }
        if self.transition_duration.0 == 0 {
            return Err(CubistError::validation("transition_duration must be > 0"));
        }
        if self.decode_poll_interval.0 == 0 {
            return Err(CubistError::validation("decode_poll_interval must be > 0"));
        }
        if !self.perspective_distance.is_finite() || self.perspective_distance < 1.5 {
            return Err(CubistError::validation(
                "perspective_distance must be >= 1.5 to keep the cube in front of the camera",
            ));
        }
        Ok(())
    }
}
