//! Replays the shared trigger/advance scenarios from the fixtures manifest.

use serde::Deserialize;
use shatter_core::{
    DisplayList, Outputs, Phase, Point, Rgba, ShatterConfig, ShatterEvent, ShatterScheduler,
    Viewport,
};

#[derive(Debug, Deserialize)]
struct Scenario {
    viewport: [f32; 2],
    seed: u64,
    steps: Vec<Step>,
    expect: Expect,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Step {
    Trigger { x: f32, y: f32, color: String },
    Advance { seconds: f32, dt: f32 },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Expect {
    phase: Option<Phase>,
    attached: Option<usize>,
    color: Option<String>,
    cycles_started: Option<usize>,
    cycles_completed: Option<usize>,
    cycles_interrupted: Option<usize>,
    empty_triangulations: Option<usize>,
}

#[derive(Debug, Default)]
struct Tally {
    started: usize,
    completed: usize,
    interrupted: usize,
    empty: usize,
}

impl Tally {
    fn record(&mut self, out: &Outputs) {
        for event in &out.events {
            match event {
                ShatterEvent::CycleStarted { .. } => self.started += 1,
                ShatterEvent::CycleCompleted { .. } => self.completed += 1,
                ShatterEvent::CycleInterrupted { .. } => self.interrupted += 1,
                ShatterEvent::EmptyTriangulation { .. } => self.empty += 1,
                _ => {}
            }
        }
    }
}

fn run(name: &str) {
    let scenario: Scenario = shatter_test_fixtures::scenarios::load(name)
        .unwrap_or_else(|e| panic!("load scenario {name}: {e:#}"));
    let cfg = match shatter_test_fixtures::scenarios::config_json(name).expect("config lookup") {
        Some(json) => ShatterConfig::from_json_str(&json).expect("scenario config"),
        None => ShatterConfig::default(),
    };
    let [w, h] = scenario.viewport;
    let viewport = Viewport::new(w, h).expect("scenario viewport");
    let mut s = ShatterScheduler::with_seed(cfg, viewport, scenario.seed).expect("scheduler");
    let mut stage = DisplayList::new();
    let mut tally = Tally::default();

    for step in &scenario.steps {
        match step {
            Step::Trigger { x, y, color } => {
                let color: Rgba = color.parse().expect("scenario color");
                let out = s.trigger(Point::new(*x, *y), color, &mut stage);
                tally.record(out);
            }
            Step::Advance { seconds, dt } => {
                assert!(*dt > 0.0, "{name}: dt must be positive");
                let mut t = 0.0;
                while t < *seconds {
                    let out = s.update(*dt, &mut stage);
                    tally.record(out);
                    t += dt;
                }
            }
        }
    }

    let e = &scenario.expect;
    if let Some(phase) = e.phase {
        assert_eq!(s.phase(), phase, "{name}: phase");
    }
    if let Some(attached) = e.attached {
        assert_eq!(stage.len(), attached, "{name}: attached surfaces");
    }
    if let Some(color) = &e.color {
        assert_eq!(&s.state().color.to_hex(), color, "{name}: color");
        for layer in stage.layers_by_depth() {
            assert_eq!(&layer.color, color, "{name}: layer color");
        }
    }
    if let Some(n) = e.cycles_started {
        assert_eq!(tally.started, n, "{name}: cycles started");
    }
    if let Some(n) = e.cycles_completed {
        assert_eq!(tally.completed, n, "{name}: cycles completed");
    }
    if let Some(n) = e.cycles_interrupted {
        assert_eq!(tally.interrupted, n, "{name}: cycles interrupted");
    }
    if let Some(n) = e.empty_triangulations {
        assert_eq!(tally.empty, n, "{name}: empty triangulations");
    }

    // Attached surfaces always mirror the live fragment set.
    assert_eq!(stage.len(), s.fragments().len(), "{name}: stage/fragments");
    if s.phase() == Phase::Idle {
        assert!(s.state().is_clean(), "{name}: idle state must be clean");
    }
}

#[test]
fn every_manifest_scenario_replays() {
    let keys = shatter_test_fixtures::scenarios::keys();
    assert!(!keys.is_empty());
    for key in keys {
        run(&key);
    }
}

#[test]
fn every_manifest_config_parses_and_validates() {
    for key in shatter_test_fixtures::configs::keys() {
        let json = shatter_test_fixtures::configs::json(&key).expect("config json");
        let cfg = ShatterConfig::from_json_str(&json)
            .unwrap_or_else(|e| panic!("config {key}: {e}"));
        cfg.validate().expect("validated");
    }
}

#[test]
fn single_ring_config_is_deterministic() {
    let json = shatter_test_fixtures::configs::json("single-ring").expect("single-ring");
    let cfg = ShatterConfig::from_json_str(&json).expect("parse");
    assert_eq!(cfg.sampling.vertex_count(), 7);

    let vp = Viewport::new(400.0, 400.0).expect("viewport");
    let mut a = ShatterScheduler::with_seed(cfg.clone(), vp, 1).expect("scheduler");
    let mut b = ShatterScheduler::with_seed(cfg, vp, 99).expect("scheduler");
    let mut sa = DisplayList::new();
    let mut sb = DisplayList::new();
    a.trigger(Point::new(200.0, 200.0), Rgba::default(), &mut sa);
    b.trigger(Point::new(200.0, 200.0), Rgba::default(), &mut sb);
    // No variance and no jitter: the seed has nothing to perturb.
    assert_eq!(a.state().vertices, b.state().vertices);
    assert_eq!(a.entries(), b.entries());
    assert_eq!(a.fragments().len(), 6);
}
