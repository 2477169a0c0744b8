//! Per-fragment animation planning: start delay, rotation, stacking order and
//! the fragment's own sub-timeline.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::MotionConfig;
use crate::fragment::Fragment;
use crate::geom::{random_range, sign, Point};
use crate::ids::FragmentId;
use crate::timeline::{Property, Timeline};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationEntry {
    pub fragment: FragmentId,
    /// Distance from the fragment centroid to the focal point.
    pub distance: f32,
    /// Offset of the sub-timeline inside the master timeline.
    pub delay: f32,
    pub rotation_x: f32,
    pub rotation_y: f32,
    /// Stacking order: further fragments draw on top.
    pub z_index: u32,
}

/// Delay before jitter; monotonic non-decreasing in `distance`.
#[inline]
pub fn base_delay(distance: f32, motion: &MotionConfig) -> f32 {
    distance * motion.delay_per_unit
}

/// Rotation pair from the centroid-minus-focus vector `(dx, dy)`.
#[inline]
pub fn rotation_for(dx: f32, dy: f32, motion: &MotionConfig) -> (f32, f32) {
    (motion.rotation_x * sign(dy), -motion.rotation_y * sign(dx))
}

/// Plan one fragment against the focal point. Consumes one jitter sample.
pub fn plan_entry<R: Rng + ?Sized>(
    fragment: &Fragment,
    focus: Point,
    motion: &MotionConfig,
    rng: &mut R,
) -> AnimationEntry {
    let d = fragment.centroid.sub(focus);
    let distance = d.length();
    let (rotation_x, rotation_y) = rotation_for(d.x, d.y, motion);
    let [lo, hi] = motion.delay_jitter;
    let delay = base_delay(distance, motion) * random_range(rng, lo, hi);
    AnimationEntry {
        fragment: fragment.id,
        distance,
        delay,
        rotation_x,
        rotation_y,
        z_index: distance.floor() as u32,
    }
}

/// Sub-timeline for one fragment: recede in depth while rotating, fading out
/// near the end of the motion.
pub fn fragment_timeline(entry: &AnimationEntry, motion: &MotionConfig) -> Timeline {
    let id = entry.fragment;
    let mut tl = Timeline::new();
    tl.to_at(id, Property::TranslateZ, motion.depth, motion.motion_duration, motion.motion_ease, 0.0)
        .to_at(id, Property::RotationX, entry.rotation_x, motion.motion_duration, motion.motion_ease, 0.0)
        .to_at(id, Property::RotationY, entry.rotation_y, motion.motion_duration, motion.motion_ease, 0.0)
        .to_at(id, Property::Opacity, 0.0, motion.fade_duration, motion.fade_ease, motion.fade_start);
    tl
}
