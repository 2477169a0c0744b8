//! A single triangular shard.

use crate::color::Rgba;
use crate::geom::{cross, BoundingBox, Point, Viewport};
use crate::ids::FragmentId;
use crate::surface::Surface;

/// Triangle tile with its box, centroid and a surface holding only the
/// triangle interior filled with the cycle colour.
///
/// Vertices are copied by value; a fragment never refers back into the
/// vertex buffer it was built from.
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    pub id: FragmentId,
    pub vertices: [Point; 3],
    pub bbox: BoundingBox,
    pub centroid: Point,
    pub color: Rgba,
    surface: Surface,
}

impl Fragment {
    /// Build and render a fragment. Collinear or coincident vertices give a
    /// zero-area fragment whose surface stays empty; construction never fails.
    pub fn new(id: FragmentId, v0: Point, v1: Point, v2: Point, color: Rgba) -> Self {
        Self::build(id, [v0, v1, v2], color, Surface::allocate)
    }

    /// Like [`Fragment::new`], but the surface only covers the part of the
    /// box inside `viewport`. Box, centroid and outline are unaffected.
    pub fn new_clipped(
        id: FragmentId,
        v0: Point,
        v1: Point,
        v2: Point,
        color: Rgba,
        viewport: Viewport,
    ) -> Self {
        Self::build(id, [v0, v1, v2], color, |bbox| {
            Surface::allocate_clipped(bbox, viewport)
        })
    }

    fn build(
        id: FragmentId,
        vertices: [Point; 3],
        color: Rgba,
        allocate: impl FnOnce(&BoundingBox) -> Surface,
    ) -> Self {
        let [v0, v1, v2] = vertices;
        let bbox = BoundingBox::enclosing(&vertices);
        let centroid = Point::new((v0.x + v1.x + v2.x) / 3.0, (v0.y + v1.y + v2.y) / 3.0);
        let mut surface = allocate(&bbox);
        surface.fill_clipped(&vertices, color);
        Self {
            id,
            vertices,
            bbox,
            centroid,
            color,
            surface,
        }
    }

    /// Closed clip outline `v0 -> v1 -> v2 -> v0` in parent coordinates.
    #[inline]
    pub fn outline(&self) -> &[Point; 3] {
        &self.vertices
    }

    #[inline]
    pub fn area(&self) -> f32 {
        0.5 * cross(self.vertices[0], self.vertices[1], self.vertices[2]).abs()
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.area() <= f32::EPSILON
    }

    #[inline]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_triangle_box_and_centroid() {
        let f = Fragment::new(
            FragmentId(0),
            Point::new(0.0, 0.0),
            Point::new(6.0, 0.0),
            Point::new(0.0, 6.0),
            Rgba::rgb(9, 9, 9),
        );
        assert_eq!(f.centroid, Point::new(2.0, 2.0));
        assert_eq!(f.bbox, BoundingBox { x: 0.0, y: 0.0, w: 6.0, h: 6.0 });
        assert_eq!(f.area(), 18.0);
        assert!(!f.is_degenerate());
        assert_eq!((f.surface().width(), f.surface().height()), (6, 6));
        assert!(f.surface().covered_pixels() > 0);
    }

    #[test]
    fn collinear_vertices_are_tolerated() {
        let f = Fragment::new(
            FragmentId(1),
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
            Rgba::rgb(1, 1, 1),
        );
        assert!(f.is_degenerate());
        assert_eq!(f.bbox.h, 0.0);
        assert!(f.surface().is_empty());
        assert_eq!(f.centroid, Point::new(5.0, 0.0));
    }

    #[test]
    fn clipped_surface_covers_only_the_visible_part() {
        let vp = Viewport::new(100.0, 100.0).unwrap();
        let f = Fragment::new_clipped(
            FragmentId(2),
            Point::new(-5000.0, 10.0),
            Point::new(50.0, 10.0),
            Point::new(50.0, 60.0),
            Rgba::rgb(4, 5, 6),
            vp,
        );
        assert_eq!(f.bbox.x, -5000.0);
        assert_eq!(f.surface().origin(), Point::new(0.0, 10.0));
        assert_eq!((f.surface().width(), f.surface().height()), (50, 50));
        assert!(f.surface().covered_pixels() > 0);
    }
}
