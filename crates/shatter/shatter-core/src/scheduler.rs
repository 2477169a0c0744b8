//! Shatter scheduler: sample → triangulate → build fragments → animate →
//! tear down, as an explicit `Idle / Sampling / Animating / Completing`
//! state machine over a [`SessionState`] it owns exclusively.
//!
//! Everything geometric runs synchronously inside [`ShatterScheduler::trigger`];
//! only the timeline is time-driven, advanced by the host through
//! [`ShatterScheduler::update`]. A trigger during `Animating` cancels the
//! current cycle (its own timeline only) and tears it down before sampling.

use hashbrown::HashMap;
use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::Rgba;
use crate::config::ShatterConfig;
use crate::error::ShatterError;
use crate::fragment::Fragment;
use crate::geom::{Point, Viewport};
use crate::ids::{CycleId, FragmentId, IdAllocator};
use crate::outputs::{Change, FragmentPose, Outputs, ShatterEvent};
use crate::sampler::sample_points;
use crate::schedule::{fragment_timeline, plan_entry, AnimationEntry};
use crate::stage::Stage;
use crate::state::{Phase, SessionState};
use crate::timeline::{Playback, Repeat, Timeline, TimelineSignal};
use crate::triangulate::{DelaunayTriangulator, Triangulator};

#[derive(Debug)]
pub struct ShatterScheduler<T = DelaunayTriangulator, R = StdRng> {
    cfg: ShatterConfig,
    viewport: Viewport,
    triangulator: T,
    rng: R,
    ids: IdAllocator,
    state: SessionState,
    cycle: Option<CycleId>,
    playback: Option<Playback>,
    entries: Vec<AnimationEntry>,
    outputs: Outputs,
}

impl ShatterScheduler<DelaunayTriangulator, StdRng> {
    /// Scheduler with the default triangulator and an entropy-seeded RNG.
    pub fn new(cfg: ShatterConfig, viewport: Viewport) -> Result<Self, ShatterError> {
        Self::with_parts(cfg, viewport, DelaunayTriangulator::default(), StdRng::from_entropy())
    }

    /// Deterministic scheduler for tests and replays.
    pub fn with_seed(cfg: ShatterConfig, viewport: Viewport, seed: u64) -> Result<Self, ShatterError> {
        Self::with_parts(
            cfg,
            viewport,
            DelaunayTriangulator::default(),
            StdRng::seed_from_u64(seed),
        )
    }
}

impl<T: Triangulator, R: Rng> ShatterScheduler<T, R> {
    pub fn with_parts(
        cfg: ShatterConfig,
        viewport: Viewport,
        triangulator: T,
        rng: R,
    ) -> Result<Self, ShatterError> {
        cfg.validate()?;
        Ok(Self {
            state: SessionState::new(viewport.center(), Rgba::default()),
            cfg,
            viewport,
            triangulator,
            rng,
            ids: IdAllocator::new(),
            cycle: None,
            playback: None,
            entries: Vec::new(),
            outputs: Outputs::default(),
        })
    }

    pub fn config(&self) -> &ShatterConfig {
        &self.cfg
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Resize the clamping area used by the next trigger.
    pub fn set_viewport(&mut self, width: f32, height: f32) -> Result<(), ShatterError> {
        self.viewport = Viewport::new(width, height)?;
        Ok(())
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.state.is_animating
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.state.fragments
    }

    pub fn entries(&self) -> &[AnimationEntry] {
        &self.entries
    }

    pub fn current_cycle(&self) -> Option<CycleId> {
        self.cycle
    }

    pub fn playback(&self) -> Option<&Playback> {
        self.playback.as_ref()
    }

    /// Start a shatter cycle at `focus` filled with `color`. Always accepted.
    ///
    /// `focus` may lie anywhere; fragment surfaces are clipped to the viewport,
    /// so a far off-screen focus never allocates past the viewport's pixels.
    pub fn trigger(&mut self, focus: Point, color: Rgba, stage: &mut dyn Stage) -> &Outputs {
        self.outputs.clear();
        if self.state.phase == Phase::Animating {
            self.interrupt(stage);
        }

        let cycle = self.ids.alloc_cycle();
        self.cycle = Some(cycle);
        self.set_phase(Phase::Sampling);
        self.state.focus = focus;
        self.state.color = color;
        self.state.vertices = sample_points(
            focus,
            self.viewport,
            &self.cfg.sampling.rings,
            self.cfg.sampling.variance_factor,
            &mut self.rng,
        );
        let raw = self.triangulator.triangulate(&self.state.vertices);
        self.state.indices = self.checked_indices(cycle, raw);
        debug!(
            "shatter cycle {:?}: {} vertices, {} triangles at ({}, {})",
            cycle,
            self.state.vertices.len(),
            self.state.indices.len() / 3,
            focus.x,
            focus.y
        );

        if self.state.indices.is_empty() {
            self.outputs.push_event(ShatterEvent::EmptyTriangulation {
                cycle,
                vertices: self.state.vertices.len(),
            });
            self.finish(stage);
            return &self.outputs;
        }

        let mut fragments = Vec::with_capacity(self.state.indices.len() / 3);
        for tri in self.state.indices.chunks_exact(3) {
            let [v0, v1, v2] = [tri[0], tri[1], tri[2]].map(|i| self.state.vertices[i]);
            let id = self.ids.alloc_fragment();
            let fragment = Fragment::new_clipped(id, v0, v1, v2, color, self.viewport);
            if fragment.is_degenerate() {
                self.outputs.push_event(ShatterEvent::DegenerateFragment {
                    cycle,
                    fragment: fragment.id,
                });
            }
            fragments.push(fragment);
        }

        let mut master = Timeline::new();
        self.entries.clear();
        for fragment in &fragments {
            let entry = plan_entry(fragment, focus, &self.cfg.motion, &mut self.rng);
            master.add(fragment_timeline(&entry, &self.cfg.motion), entry.delay);
            stage.attach(fragment, entry.z_index);
            self.entries.push(entry);
        }
        let duration = master.duration();
        self.playback = Some(Playback::new(
            master,
            Repeat::Infinite,
            self.cfg.motion.repeat_delay,
        ));
        self.state.fragments = fragments;
        self.state.is_animating = true;
        self.set_phase(Phase::Animating);
        self.outputs.push_event(ShatterEvent::CycleStarted {
            cycle,
            focus,
            fragments: self.state.fragments.len(),
            duration,
        });
        &self.outputs
    }

    /// Trigger at the centre of the viewport (the initial shatter on start).
    pub fn trigger_centered(&mut self, color: Rgba, stage: &mut dyn Stage) -> &Outputs {
        let centre = self.viewport.center();
        self.trigger(centre, color, stage)
    }

    /// Cancel the running cycle, if any, tearing its fragments down.
    pub fn cancel(&mut self, stage: &mut dyn Stage) -> &Outputs {
        self.outputs.clear();
        if self.state.phase == Phase::Animating {
            self.interrupt(stage);
        }
        &self.outputs
    }

    /// Advance the cycle by `dt` seconds, emitting one pose per live fragment.
    /// The first completed run-through ends the cycle; the timeline's implicit
    /// repeat is discarded.
    pub fn update(&mut self, dt: f32, stage: &mut dyn Stage) -> &Outputs {
        self.outputs.clear();
        if self.state.phase != Phase::Animating {
            return &self.outputs;
        }
        let Some(playback) = self.playback.as_mut() else {
            return &self.outputs;
        };
        let signals = playback.advance(dt);
        let completed = signals
            .iter()
            .any(|s| matches!(s, TimelineSignal::RunCompleted { .. }));
        if completed {
            playback.clear();
            if let Some(cycle) = self.cycle {
                self.outputs.push_event(ShatterEvent::CycleCompleted { cycle });
            }
            self.finish(stage);
            return &self.outputs;
        }

        let index: HashMap<FragmentId, usize> = self
            .state
            .fragments
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id, i))
            .collect();
        let mut poses = vec![FragmentPose::default(); self.state.fragments.len()];
        playback.sample(&mut |tween, value| {
            if let Some(&i) = index.get(&tween.target) {
                poses[i].set(tween.property, value);
            }
        });
        trace!(
            "shatter tick dt={dt} local={} fragments={}",
            playback.local_time(),
            poses.len()
        );
        for (fragment, pose) in self.state.fragments.iter().zip(poses) {
            self.outputs.push_change(Change {
                fragment: fragment.id,
                pose,
            });
        }
        &self.outputs
    }

    /// Drop triples that reference vertices outside the buffer, and any
    /// trailing partial triple.
    fn checked_indices(&mut self, cycle: CycleId, raw: Vec<usize>) -> Vec<usize> {
        let n = self.state.vertices.len();
        let chunks = raw.chunks_exact(3);
        let ragged = usize::from(!chunks.remainder().is_empty());
        let mut dropped = ragged;
        let mut out = Vec::with_capacity(raw.len());
        for tri in chunks {
            if tri.iter().all(|&i| i < n) {
                out.extend_from_slice(tri);
            } else {
                dropped += 1;
            }
        }
        if dropped > 0 {
            warn!("triangulation returned {dropped} invalid triangle(s) for {n} vertices; dropped");
            self.outputs
                .push_event(ShatterEvent::InvalidTriangles { cycle, dropped });
        }
        out
    }

    /// Halt the running timeline and tear down synchronously.
    fn interrupt(&mut self, stage: &mut dyn Stage) {
        if let Some(playback) = self.playback.as_mut() {
            playback.clear();
        }
        if let Some(cycle) = self.cycle {
            debug!("shatter cycle {cycle:?} interrupted");
            self.outputs
                .push_event(ShatterEvent::CycleInterrupted { cycle });
        }
        self.finish(stage);
    }

    /// `Completing` → `Idle`: detach surfaces and clear all per-cycle state.
    fn finish(&mut self, stage: &mut dyn Stage) {
        self.set_phase(Phase::Completing);
        for fragment in &self.state.fragments {
            stage.detach(fragment.id);
        }
        self.state.clear_cycle();
        self.entries.clear();
        self.playback = None;
        self.set_phase(Phase::Idle);
    }

    fn set_phase(&mut self, to: Phase) {
        let from = self.state.phase;
        if from == to {
            return;
        }
        debug!("shatter phase {from:?} -> {to:?}");
        self.state.phase = to;
        self.outputs
            .push_event(ShatterEvent::PhaseChanged { from, to });
    }
}
