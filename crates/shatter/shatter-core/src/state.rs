//! Session state owned and mutated exclusively by the scheduler.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::fragment::Fragment;
use crate::geom::Point;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Sampling,
    Animating,
    Completing,
}

/// Everything one shatter cycle needs. Outside of a cycle the fragment set
/// and both buffers are empty.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub focus: Point,
    pub color: Rgba,
    pub vertices: Vec<Point>,
    pub indices: Vec<usize>,
    pub fragments: Vec<Fragment>,
    pub is_animating: bool,
    pub phase: Phase,
}

impl SessionState {
    pub fn new(focus: Point, color: Rgba) -> Self {
        Self {
            focus,
            color,
            vertices: Vec::new(),
            indices: Vec::new(),
            fragments: Vec::new(),
            is_animating: false,
            phase: Phase::Idle,
        }
    }

    /// Drop all per-cycle data and disarm the animating flag.
    pub fn clear_cycle(&mut self) {
        self.fragments.clear();
        self.vertices.clear();
        self.indices.clear();
        self.is_animating = false;
    }

    /// True when no per-cycle data is held.
    pub fn is_clean(&self) -> bool {
        !self.is_animating
            && self.fragments.is_empty()
            && self.vertices.is_empty()
            && self.indices.is_empty()
    }
}
