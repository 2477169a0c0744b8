//! Minimal nestable timeline: property tweens with start offsets, durations
//! and eases, plus a [`Playback`] head that handles repeats, the pause between
//! repeats, run-completion signals (folded to one per step), and an immediate clear.
//!
//! Time is in seconds. Tweens are "to" tweens from a known start value;
//! properties rest at [`Property::rest_value`] until their tween starts.

use serde::{Deserialize, Serialize};

use crate::ease::Ease;
use crate::ids::FragmentId;

/// Animated fragment property.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    TranslateZ,
    RotationX,
    RotationY,
    Opacity,
}

impl Property {
    /// Value held before any tween on this property has started.
    #[inline]
    pub fn rest_value(self) -> f32 {
        match self {
            Property::Opacity => 1.0,
            Property::TranslateZ | Property::RotationX | Property::RotationY => 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    pub target: FragmentId,
    pub property: Property,
    pub from: f32,
    pub to: f32,
    /// Start time relative to the owning timeline.
    pub start: f32,
    pub duration: f32,
    pub ease: Ease,
}

impl Tween {
    #[inline]
    pub fn end(&self) -> f32 {
        self.start + self.duration.max(0.0)
    }

    /// Value at timeline-local time `t`, or `None` before the tween starts.
    pub fn value_at(&self, t: f32) -> Option<f32> {
        if t < self.start {
            return None;
        }
        let u = if self.duration > 0.0 {
            (t - self.start) / self.duration
        } else {
            1.0
        };
        Some(self.from + (self.to - self.from) * self.ease.apply(u))
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Entry {
    Tween(Tween),
    Nested { offset: f32, timeline: Timeline },
}

impl Entry {
    fn end(&self) -> f32 {
        match self {
            Entry::Tween(t) => t.end(),
            Entry::Nested { offset, timeline } => offset + timeline.duration(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timeline {
    entries: Vec<Entry>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tween `property` of `target` from its rest value to `to`, starting at `at`.
    pub fn to_at(
        &mut self,
        target: FragmentId,
        property: Property,
        to: f32,
        duration: f32,
        ease: Ease,
        at: f32,
    ) -> &mut Self {
        self.tween(Tween {
            target,
            property,
            from: property.rest_value(),
            to,
            start: at,
            duration,
            ease,
        })
    }

    /// Like [`Timeline::to_at`], appended at the current end of the timeline.
    pub fn to(
        &mut self,
        target: FragmentId,
        property: Property,
        to: f32,
        duration: f32,
        ease: Ease,
    ) -> &mut Self {
        let at = self.duration();
        self.to_at(target, property, to, duration, ease, at)
    }

    pub fn tween(&mut self, tween: Tween) -> &mut Self {
        self.entries.push(Entry::Tween(tween));
        self
    }

    /// Nest `child` so that its local time zero lands at `at`.
    pub fn add(&mut self, child: Timeline, at: f32) -> &mut Self {
        self.entries.push(Entry::Nested {
            offset: at,
            timeline: child,
        });
        self
    }

    /// End time of the latest entry; zero when empty.
    pub fn duration(&self) -> f32 {
        self.entries.iter().map(Entry::end).fold(0.0, f32::max)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of tweens, counting through nested timelines.
    pub fn tween_count(&self) -> usize {
        self.entries
            .iter()
            .map(|e| match e {
                Entry::Tween(_) => 1,
                Entry::Nested { timeline, .. } => timeline.tween_count(),
            })
            .sum()
    }

    /// Visit every tween that has started by local time `t`, with its value,
    /// in insertion order. Later visits for the same property take precedence.
    pub fn sample(&self, t: f32, visit: &mut dyn FnMut(&Tween, f32)) {
        for entry in &self.entries {
            match entry {
                Entry::Tween(tw) => {
                    if let Some(v) = tw.value_at(t) {
                        visit(tw, v);
                    }
                }
                Entry::Nested { offset, timeline } => {
                    if t >= *offset {
                        timeline.sample(t - offset, visit);
                    }
                }
            }
        }
    }

    /// Earliest start time of any tween targeting `target`, if present.
    pub fn start_of(&self, target: FragmentId) -> Option<f32> {
        let mut best: Option<f32> = None;
        for entry in &self.entries {
            let found = match entry {
                Entry::Tween(tw) if tw.target == target => Some(tw.start),
                Entry::Tween(_) => None,
                Entry::Nested { offset, timeline } => timeline.start_of(target).map(|s| s + offset),
            };
            if let Some(s) = found {
                best = Some(best.map_or(s, |b: f32| b.min(s)));
            }
        }
        best
    }
}

/// How many times a playback runs after the first run-through.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Repeat {
    Count(u32),
    Infinite,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelineSignal {
    /// Run-throughs ended during one step (fires before the pause). `iteration`
    /// is the index of the first of them; `runs` is how many ended.
    RunCompleted { iteration: u32, runs: u32 },
    /// All repeats are exhausted; the playback is halted.
    Finished,
}

/// Playhead over a top-level timeline.
#[derive(Clone, Debug)]
pub struct Playback {
    timeline: Timeline,
    repeat: Repeat,
    repeat_delay: f32,
    elapsed: f64,
    runs_completed: u32,
    halted: bool,
}

impl Playback {
    pub fn new(timeline: Timeline, repeat: Repeat, repeat_delay: f32) -> Self {
        Self {
            timeline,
            repeat,
            repeat_delay: repeat_delay.max(0.0),
            elapsed: 0.0,
            runs_completed: 0,
            halted: false,
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed as f32
    }

    #[inline]
    pub fn runs_completed(&self) -> u32 {
        self.runs_completed
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        !self.halted
    }

    /// Total run-throughs ended by the current playhead, saturating at `u32::MAX`.
    fn runs_ended(&self, duration: f64, period: f64) -> u32 {
        if self.elapsed < duration {
            0
        } else if period <= 0.0 {
            // Zero-length without a pause: one run per call.
            self.runs_completed.saturating_add(1)
        } else {
            // Float-to-int casts saturate; infinity lands on u32::MAX.
            (((self.elapsed - duration) / period).floor() as u32).saturating_add(1)
        }
    }

    /// Advance by `dt`. Every run-through that ended in the step is folded into
    /// one [`TimelineSignal::RunCompleted`], so the cost is constant whatever
    /// the step size. Non-finite or huge steps saturate the run count.
    pub fn advance(&mut self, dt: f32) -> Vec<TimelineSignal> {
        let mut signals = Vec::new();
        if self.halted {
            return signals;
        }
        if dt > 0.0 {
            self.elapsed += f64::from(dt);
        }
        let duration = f64::from(self.timeline.duration());
        let period = duration + f64::from(self.repeat_delay);

        let mut ended = self.runs_ended(duration, period);
        if let Repeat::Count(n) = self.repeat {
            ended = ended.min(n.saturating_add(1));
        }
        if ended <= self.runs_completed {
            return signals;
        }
        signals.push(TimelineSignal::RunCompleted {
            iteration: self.runs_completed,
            runs: ended - self.runs_completed,
        });
        self.runs_completed = ended;
        if let Repeat::Count(n) = self.repeat {
            if ended > n {
                signals.push(TimelineSignal::Finished);
                self.halted = true;
            }
        }
        signals
    }

    /// Timeline-local time of the playhead. Holds the end state during the
    /// pause between repeats and once finished.
    pub fn local_time(&self) -> f32 {
        let duration = self.timeline.duration();
        if self.halted {
            return duration;
        }
        let period = f64::from(duration) + f64::from(self.repeat_delay);
        if period <= 0.0 || !self.elapsed.is_finite() {
            return duration;
        }
        ((self.elapsed % period) as f32).min(duration)
    }

    /// Sample the timeline at the current playhead.
    pub fn sample(&self, visit: &mut dyn FnMut(&Tween, f32)) {
        self.timeline.sample(self.local_time(), visit);
    }

    /// Halt immediately and drop every scheduled tween.
    pub fn clear(&mut self) {
        self.timeline = Timeline::new();
        self.halted = true;
    }
}
