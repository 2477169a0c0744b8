//! Shatter Core (renderer-agnostic)
//!
//! Fragment generation and animation scheduling for the shatter effect: a ring
//! of jittered points is sampled around a focal point, triangulated into
//! fragments, and every fragment is driven outward by a delay-offset timeline
//! until the cycle tears itself down and re-arms. Rendering backends attach to
//! the [`Stage`] seam and consume the per-frame [`Outputs`].

pub mod color;
pub mod config;
pub mod ease;
pub mod error;
pub mod fragment;
pub mod geom;
pub mod ids;
pub mod outputs;
pub mod sampler;
pub mod schedule;
pub mod scheduler;
pub mod stage;
pub mod state;
pub mod surface;
pub mod timeline;
pub mod triangulate;

// Re-exports for consumers (adapters)
pub use color::Rgba;
pub use config::{MotionConfig, Ring, SamplingConfig, ShatterConfig, StageConfig};
pub use ease::Ease;
pub use error::ShatterError;
pub use fragment::Fragment;
pub use geom::{BoundingBox, Point, Viewport};
pub use ids::{CycleId, FragmentId};
pub use outputs::{Change, FragmentPose, Outputs, ShatterEvent};
pub use sampler::sample_points;
pub use schedule::AnimationEntry;
pub use scheduler::ShatterScheduler;
pub use stage::{DisplayList, Layer, LayerInfo, Stage};
pub use state::{Phase, SessionState};
pub use surface::Surface;
pub use timeline::{Playback, Property, Repeat, Timeline, TimelineSignal, Tween};
pub use triangulate::{DelaunayTriangulator, Triangulator};
