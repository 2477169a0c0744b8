//! Output contracts from the scheduler.
//!
//! Outputs carry the per-fragment poses for this tick and a separate list of
//! lifecycle events. Adapters apply poses to their surfaces, then process the
//! events (events that end a cycle mean the fragments are already detached).

use serde::{Deserialize, Serialize};

use crate::geom::Point;
use crate::ids::{CycleId, FragmentId};
use crate::state::Phase;
use crate::timeline::Property;

/// Animated transform and opacity of one fragment.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FragmentPose {
    pub translate_z: f32,
    /// Degrees.
    pub rotation_x: f32,
    /// Degrees.
    pub rotation_y: f32,
    pub opacity: f32,
}

impl Default for FragmentPose {
    fn default() -> Self {
        Self {
            translate_z: Property::TranslateZ.rest_value(),
            rotation_x: Property::RotationX.rest_value(),
            rotation_y: Property::RotationY.rest_value(),
            opacity: Property::Opacity.rest_value(),
        }
    }
}

impl FragmentPose {
    #[inline]
    pub fn set(&mut self, property: Property, value: f32) {
        match property {
            Property::TranslateZ => self.translate_z = value,
            Property::RotationX => self.rotation_x = value,
            Property::RotationY => self.rotation_y = value,
            Property::Opacity => self.opacity = value,
        }
    }

    #[inline]
    pub fn get(&self, property: Property) -> f32 {
        match property {
            Property::TranslateZ => self.translate_z,
            Property::RotationX => self.rotation_x,
            Property::RotationY => self.rotation_y,
            Property::Opacity => self.opacity,
        }
    }

    /// Apparent scale under a container perspective of `perspective`
    /// (1.0 at depth zero, shrinking as the fragment recedes).
    pub fn perspective_scale(&self, perspective: f32) -> f32 {
        let denom = perspective - self.translate_z;
        if perspective <= 0.0 || denom <= 0.0 {
            return 1.0;
        }
        perspective / denom
    }

    /// CSS transform string for DOM adapters.
    pub fn css_transform(&self) -> String {
        format!(
            "translateZ({}px) rotateX({}deg) rotateY({}deg)",
            self.translate_z, self.rotation_x, self.rotation_y
        )
    }
}

/// One fragment's pose this tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Change {
    pub fragment: FragmentId,
    pub pose: FragmentPose,
}

/// Discrete lifecycle signals emitted by triggers and ticks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ShatterEvent {
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    CycleStarted {
        cycle: CycleId,
        focus: Point,
        fragments: usize,
        /// Length of one run-through of the master timeline.
        duration: f32,
    },
    /// A new trigger preempted the cycle; its fragments were torn down.
    CycleInterrupted {
        cycle: CycleId,
    },
    CycleCompleted {
        cycle: CycleId,
    },
    /// Triangulation produced nothing to animate.
    EmptyTriangulation {
        cycle: CycleId,
        vertices: usize,
    },
    /// Zero-area fragment (collinear or coincident vertices); still animated.
    DegenerateFragment {
        cycle: CycleId,
        fragment: FragmentId,
    },
    /// Triangles referencing vertices outside the buffer were discarded.
    InvalidTriangles {
        cycle: CycleId,
        dropped: usize,
    },
}

/// Outputs returned by the scheduler's `trigger` and `update`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub events: Vec<ShatterEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: ShatterEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }

    /// Phase transitions recorded in this output, in order.
    pub fn transitions(&self) -> Vec<(Phase, Phase)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ShatterEvent::PhaseChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}
