//! Triangulation seam.
//!
//! The scheduler only depends on [`Triangulator`]; [`DelaunayTriangulator`]
//! is the default adapter (incremental Bowyer–Watson with ghost triangles
//! and exact integer predicates).

use crate::geom::Point;

/// Maps a point set to a flat index buffer of triangles.
///
/// Contract: every index is `< points.len()`, the output length is a multiple
/// of three, triangles do not overlap, and their union approximates the convex
/// hull of the input. Fewer than three points yields an empty buffer.
/// Triangle emission order is unspecified.
pub trait Triangulator {
    fn triangulate(&self, points: &[Point]) -> Vec<usize>;
}

impl<F> Triangulator for F
where
    F: Fn(&[Point]) -> Vec<usize>,
{
    fn triangulate(&self, points: &[Point]) -> Vec<usize> {
        self(points)
    }
}

/// Delaunay triangulation.
///
/// Points are snapped to an integer grid spanning `2^resolution_bits` cells
/// across the input's extent; orientation and in-circle tests on that grid are
/// exact, so collinear border points and cocircular rings never produce
/// overlapping or missing triangles. Points sharing a grid cell are
/// triangulated once and referenced through their first occurrence.
/// Non-finite points are ignored.
#[derive(Clone, Debug)]
pub struct DelaunayTriangulator {
    pub resolution_bits: u32,
}

impl Default for DelaunayTriangulator {
    fn default() -> Self {
        Self { resolution_bits: 24 }
    }
}

/// Vertex slot of the point at infinity closing every hull edge.
const GHOST: usize = usize::MAX;

type Cell = (i64, i64);

#[inline]
fn orient(a: Cell, b: Cell, c: Cell) -> i128 {
    let (abx, aby) = ((b.0 - a.0) as i128, (b.1 - a.1) as i128);
    let (acx, acy) = ((c.0 - a.0) as i128, (c.1 - a.1) as i128);
    abx * acy - aby * acx
}

/// Positive when `d` lies strictly inside the circle through `a, b, c`
/// (given `orient(a, b, c) > 0`).
#[inline]
fn incircle(a: Cell, b: Cell, c: Cell, d: Cell) -> i128 {
    let (adx, ady) = ((a.0 - d.0) as i128, (a.1 - d.1) as i128);
    let (bdx, bdy) = ((b.0 - d.0) as i128, (b.1 - d.1) as i128);
    let (cdx, cdy) = ((c.0 - d.0) as i128, (c.1 - d.1) as i128);
    let alift = adx * adx + ady * ady;
    let blift = bdx * bdx + bdy * bdy;
    let clift = cdx * cdx + cdy * cdy;
    alift * (bdx * cdy - cdx * bdy) + blift * (cdx * ady - adx * cdy) + clift * (adx * bdy - bdx * ady)
}

/// `p` collinear with `a -> b` lies strictly between them.
#[inline]
fn strictly_between(a: Cell, b: Cell, p: Cell) -> bool {
    let (abx, aby) = ((b.0 - a.0) as i128, (b.1 - a.1) as i128);
    let dot = (p.0 - a.0) as i128 * abx + (p.1 - a.1) as i128 * aby;
    dot > 0 && dot < abx * abx + aby * aby
}

struct Mesh<'a> {
    cells: &'a [Cell],
    /// Counter-clockwise (`orient > 0`) triangles. A ghost `[a, b, GHOST]`
    /// sits outside hull edge `a -> b`.
    tris: Vec<[usize; 3]>,
}

impl Mesh<'_> {
    /// `p` conflicts with the triangle: strictly inside its circumcircle, or,
    /// for a ghost, strictly outside its hull edge or on the edge's interior.
    fn conflicts(&self, [a, b, c]: [usize; 3], p: usize) -> bool {
        let q = self.cells;
        if c == GHOST {
            let o = orient(q[a], q[b], q[p]);
            o > 0 || (o == 0 && strictly_between(q[a], q[b], q[p]))
        } else {
            incircle(q[a], q[b], q[c], q[p]) > 0
        }
    }

    fn insert(&mut self, p: usize) {
        let mut cavity: Vec<(usize, usize)> = Vec::new();
        let mut kept = Vec::with_capacity(self.tris.len() + 2);
        for &t in &self.tris {
            if self.conflicts(t, p) {
                let [a, b, c] = t;
                cavity.extend_from_slice(&[(a, b), (b, c), (c, a)]);
            } else {
                kept.push(t);
            }
        }
        // Directed edges whose reverse is not in the cavity form its boundary.
        for &(x, y) in &cavity {
            if cavity.contains(&(y, x)) {
                continue;
            }
            kept.push(if x == GHOST {
                [y, p, GHOST]
            } else if y == GHOST {
                [p, x, GHOST]
            } else {
                [x, y, p]
            });
        }
        self.tris = kept;
    }
}

impl DelaunayTriangulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grid cells for the finite points; `None` for the rest.
    fn snap(&self, points: &[Point]) -> Vec<Option<Cell>> {
        let finite = |p: &Point| p.x.is_finite() && p.y.is_finite();
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points.iter().filter(|p| finite(p)) {
            min_x = min_x.min(f64::from(p.x));
            min_y = min_y.min(f64::from(p.y));
            max_x = max_x.max(f64::from(p.x));
            max_y = max_y.max(f64::from(p.y));
        }
        let span = (max_x - min_x).max(max_y - min_y);
        let cells = f64::from(1u32 << self.resolution_bits.clamp(8, 24));
        let scale = if span > 0.0 { cells / span } else { 1.0 };
        points
            .iter()
            .map(|p| {
                finite(p).then(|| {
                    (
                        ((f64::from(p.x) - min_x) * scale).round() as i64,
                        ((f64::from(p.y) - min_y) * scale).round() as i64,
                    )
                })
            })
            .collect()
    }
}

impl Triangulator for DelaunayTriangulator {
    fn triangulate(&self, points: &[Point]) -> Vec<usize> {
        if points.len() < 3 {
            return Vec::new();
        }

        // First occurrence of each distinct cell.
        let mut unique: Vec<usize> = Vec::with_capacity(points.len());
        let mut cells: Vec<Cell> = Vec::with_capacity(points.len());
        for (i, cell) in self.snap(points).into_iter().enumerate() {
            if let Some(cell) = cell {
                if !cells.contains(&cell) {
                    unique.push(i);
                    cells.push(cell);
                }
            }
        }
        let n = cells.len();
        if n < 3 {
            return Vec::new();
        }

        // Seed with the first non-degenerate triangle; all-collinear input has no area.
        let Some(k) = (2..n).find(|&k| orient(cells[0], cells[1], cells[k]) != 0) else {
            return Vec::new();
        };
        let (a, b) = if orient(cells[0], cells[1], cells[k]) > 0 {
            (1, k)
        } else {
            (k, 1)
        };
        let mut mesh = Mesh {
            cells: &cells,
            tris: vec![[0, a, b], [a, 0, GHOST], [b, a, GHOST], [0, b, GHOST]],
        };
        for p in (2..n).filter(|&p| p != k) {
            mesh.insert(p);
        }

        mesh.tris
            .iter()
            .filter(|t| t[2] != GHOST)
            .flat_map(|t| t.map(|v| unique[v]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::cross;

    fn area_sum(points: &[Point], idx: &[usize]) -> f32 {
        idx.chunks(3)
            .map(|t| 0.5 * cross(points[t[0]], points[t[1]], points[t[2]]).abs())
            .sum()
    }

    #[test]
    fn fewer_than_three_points_is_empty() {
        let d = DelaunayTriangulator::new();
        assert!(d.triangulate(&[]).is_empty());
        assert!(d.triangulate(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]).is_empty());
    }

    #[test]
    fn coincident_points_do_not_count_as_distinct() {
        let p = Point::new(4.0, 4.0);
        assert!(DelaunayTriangulator::new().triangulate(&[p, p, p, p]).is_empty());
    }

    #[test]
    fn collinear_input_has_no_triangles() {
        let pts: Vec<Point> = (0..6).map(|i| Point::new(i as f32 * 3.0, 0.0)).collect();
        assert!(DelaunayTriangulator::new().triangulate(&pts).is_empty());
    }

    #[test]
    fn square_splits_into_two_triangles() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let idx = DelaunayTriangulator::new().triangulate(&pts);
        assert_eq!(idx.len(), 6);
        assert!((area_sum(&pts, &idx) - 100.0).abs() < 1e-3);
    }

    #[test]
    fn duplicates_reference_first_occurrence() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(8.0, 0.0),
            Point::new(0.0, 8.0),
            Point::new(8.0, 0.0),
        ];
        let idx = DelaunayTriangulator::new().triangulate(&pts);
        assert_eq!(idx.len(), 3);
        assert!(!idx.contains(&3));
    }

    #[test]
    fn points_along_a_hull_edge_are_fanned_not_stacked() {
        // Apex first, then a row of points on the x axis inserted outward in
        // both directions, so each lands on the extension of a hull edge.
        let mut pts = vec![Point::new(5.0, 0.0), Point::new(5.0, 7.0)];
        pts.extend([6.0, 4.0, 8.0, 2.0, 10.0, 0.0].map(|x| Point::new(x, 0.0)));
        let idx = DelaunayTriangulator::new().triangulate(&pts);
        // Eight points, all on the hull: 2n - 2 - h.
        assert_eq!(idx.len() / 3, 6);
        assert!((area_sum(&pts, &idx) - 0.5 * 10.0 * 7.0).abs() < 1e-3);
    }

    #[test]
    fn interior_point_on_a_hull_edge_splits_it() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(5.0, 0.0),
        ];
        let idx = DelaunayTriangulator::new().triangulate(&pts);
        assert_eq!(idx.len(), 6);
        assert!((area_sum(&pts, &idx) - 50.0).abs() < 1e-3);
    }

    #[test]
    fn non_finite_points_are_skipped() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(f32::NAN, 3.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ];
        let idx = DelaunayTriangulator::new().triangulate(&pts);
        assert_eq!(idx.len(), 3);
        assert!(!idx.contains(&1));
    }

    #[test]
    fn closures_are_triangulators() {
        let fan = |pts: &[Point]| -> Vec<usize> {
            (1..pts.len().saturating_sub(1)).flat_map(|i| [0, i, i + 1]).collect()
        };
        assert_eq!(fan.triangulate(&[Point::default(); 4]), vec![0, 1, 2, 0, 2, 3]);
    }
}
