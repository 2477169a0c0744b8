//! Jittered ring sampling around a focal point.

use std::f32::consts::TAU;

use rand::Rng;

use crate::config::Ring;
use crate::geom::{random_range, Point, Viewport};

/// Build a vertex buffer: the focal point (unclamped) at index 0, then
/// `count` jittered points per ring in ring order, each clamped to the viewport.
///
/// Points beyond the viewport collapse onto its border; the outermost ring is
/// expected to do so and yields the dense boundary that lets fragments tile
/// the visible area out to its edges.
pub fn sample_points<R: Rng + ?Sized>(
    focus: Point,
    viewport: Viewport,
    rings: &[Ring],
    variance_factor: f32,
    rng: &mut R,
) -> Vec<Point> {
    let total = 1 + rings.iter().map(|r| r.count as usize).sum::<usize>();
    let mut vertices = Vec::with_capacity(total);
    vertices.push(focus);

    for ring in rings {
        let variance = ring.radius * variance_factor;
        for i in 0..ring.count {
            let theta = (i as f32 / ring.count as f32) * TAU;
            let x = theta.cos() * ring.radius + focus.x + random_range(rng, -variance, variance);
            let y = theta.sin() * ring.radius + focus.y + random_range(rng, -variance, variance);
            vertices.push(Point::new(x, y));
        }
    }

    for v in vertices.iter_mut().skip(1) {
        *v = v.clamped(viewport);
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SamplingConfig;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn zero_variance_places_points_on_the_ring() {
        let mut rng = StdRng::seed_from_u64(1);
        let vp = Viewport::new(1000.0, 1000.0).unwrap();
        let focus = Point::new(500.0, 500.0);
        let pts = sample_points(focus, vp, &[Ring::new(100.0, 4)], 0.0, &mut rng);
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], focus);
        let expected = [(600.0, 500.0), (500.0, 600.0), (400.0, 500.0), (500.0, 400.0)];
        for (p, (ex, ey)) in pts[1..].iter().zip(expected) {
            assert!((p.x - ex).abs() < 1e-3 && (p.y - ey).abs() < 1e-3, "{p:?}");
        }
    }

    #[test]
    fn focal_point_is_not_clamped() {
        let mut rng = StdRng::seed_from_u64(2);
        let vp = Viewport::new(100.0, 100.0).unwrap();
        let focus = Point::new(-4.0, 120.0);
        let pts = sample_points(focus, vp, &SamplingConfig::default().rings, 0.25, &mut rng);
        assert_eq!(pts[0], focus);
        assert!(pts[1..].iter().all(|p| vp.contains(*p)));
    }

    #[test]
    fn jitter_stays_within_variance_before_clamping() {
        let mut rng = StdRng::seed_from_u64(9);
        let vp = Viewport::new(10_000.0, 10_000.0).unwrap();
        let focus = Point::new(5000.0, 5000.0);
        let ring = Ring::new(200.0, 24);
        let pts = sample_points(focus, vp, &[ring], 0.25, &mut rng);
        for (i, p) in pts[1..].iter().enumerate() {
            let theta = (i as f32 / 24.0) * TAU;
            let ideal = Point::new(focus.x + theta.cos() * 200.0, focus.y + theta.sin() * 200.0);
            assert!((p.x - ideal.x).abs() <= 50.0 + 1e-3);
            assert!((p.y - ideal.y).abs() <= 50.0 + 1e-3);
        }
    }
}
