//! Configuration for sampling, motion and stage presentation.
//!
//! `Default` reproduces the stock look; every field carries a serde
//! default so adapters can pass partial JSON.

use serde::{Deserialize, Serialize};

use crate::ease::Ease;
use crate::error::ShatterError;

/// One sampling band around the focal point.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub radius: f32,
    pub count: u32,
}

impl Ring {
    pub const fn new(radius: f32, count: u32) -> Self {
        Self { radius, count }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub rings: Vec<Ring>,
    /// Jitter half-width as a fraction of the ring radius.
    pub variance_factor: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            rings: vec![
                Ring::new(50.0, 12),
                Ring::new(150.0, 12),
                Ring::new(300.0, 12),
                Ring::new(1200.0, 12),
            ],
            variance_factor: 0.25,
        }
    }
}

impl SamplingConfig {
    /// Vertex count of a sampled buffer: the focal point plus every ring point.
    pub fn vertex_count(&self) -> usize {
        1 + self.rings.iter().map(|r| r.count as usize).sum::<usize>()
    }
}

/// Per-fragment motion. All times are in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Start delay per unit of centroid distance from the focal point.
    pub delay_per_unit: f32,
    /// Multiplicative jitter applied to the delay, `[min, max)`.
    pub delay_jitter: [f32; 2],
    /// Magnitude of the X rotation; sign follows the vertical direction.
    pub rotation_x: f32,
    /// Magnitude of the Y rotation; sign is opposite to the horizontal direction.
    pub rotation_y: f32,
    /// Final depth translation.
    pub depth: f32,
    pub motion_duration: f32,
    pub motion_ease: Ease,
    /// Local time at which the fade starts.
    pub fade_start: f32,
    pub fade_duration: f32,
    pub fade_ease: Ease,
    /// Pause between repeats of the master timeline.
    pub repeat_delay: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            delay_per_unit: 0.003,
            delay_jitter: [0.9, 1.1],
            rotation_x: 30.0,
            rotation_y: 90.0,
            depth: -500.0,
            motion_duration: 1.0,
            motion_ease: Ease::CUBIC_IN,
            fade_start: 0.6,
            fade_duration: 0.4,
            fade_ease: Ease::POWER2_OUT,
            repeat_delay: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Perspective distance of the container, used for depth projection.
    pub perspective: f32,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self { perspective: 500.0 }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShatterConfig {
    pub sampling: SamplingConfig,
    pub motion: MotionConfig,
    pub stage: StageConfig,
}

fn finite(field: &'static str, value: f32) -> Result<f32, ShatterError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ShatterError::InvalidConfigValue { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<f32, ShatterError> {
    if finite(field, value)? < 0.0 {
        return Err(ShatterError::InvalidConfigValue { field, value });
    }
    Ok(value)
}

fn positive(field: &'static str, value: f32) -> Result<f32, ShatterError> {
    if finite(field, value)? <= 0.0 {
        return Err(ShatterError::InvalidConfigValue { field, value });
    }
    Ok(value)
}

impl ShatterConfig {
    /// Parse JSON (partial objects allowed) and validate.
    pub fn from_json_str(s: &str) -> Result<Self, ShatterError> {
        let cfg: ShatterConfig =
            serde_json::from_str(s).map_err(|e| ShatterError::ConfigParse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ShatterError> {
        for (index, ring) in self.sampling.rings.iter().enumerate() {
            if !ring.radius.is_finite() || ring.radius < 0.0 {
                return Err(ShatterError::InvalidRing {
                    index,
                    reason: format!("radius must be finite and >= 0, got {}", ring.radius),
                });
            }
        }
        non_negative("sampling.variance_factor", self.sampling.variance_factor)?;

        let m = &self.motion;
        non_negative("motion.delay_per_unit", m.delay_per_unit)?;
        let [lo, hi] = m.delay_jitter;
        non_negative("motion.delay_jitter[0]", lo)?;
        if finite("motion.delay_jitter[1]", hi)? < lo {
            return Err(ShatterError::InvalidConfigValue {
                field: "motion.delay_jitter[1]",
                value: hi,
            });
        }
        finite("motion.rotation_x", m.rotation_x)?;
        finite("motion.rotation_y", m.rotation_y)?;
        finite("motion.depth", m.depth)?;
        positive("motion.motion_duration", m.motion_duration)?;
        non_negative("motion.fade_start", m.fade_start)?;
        positive("motion.fade_duration", m.fade_duration)?;
        non_negative("motion.repeat_delay", m.repeat_delay)?;
        m.motion_ease.check()?;
        m.fade_ease.check()?;
        positive("stage.perspective", self.stage.perspective)?;
        Ok(())
    }

    pub fn to_json_string(&self) -> Result<String, ShatterError> {
        serde_json::to_string_pretty(self).map_err(|e| ShatterError::ConfigParse(e.to_string()))
    }
}
