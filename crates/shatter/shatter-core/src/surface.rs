//! Offscreen RGBA surface with polygon-clipped solid fills.

use image::RgbaImage;

use crate::color::Rgba;
use crate::geom::{BoundingBox, Point, Viewport};

/// A pixel surface positioned absolutely at `origin` in the parent space.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    origin: Point,
    image: RgbaImage,
}

impl Surface {
    /// Allocate a transparent surface covering `bbox`, rounding its extent up
    /// to whole pixels. A zero-width or zero-height box yields an empty surface.
    pub fn allocate(bbox: &BoundingBox) -> Self {
        let px = |v: f32| if v.is_finite() && v > 0.0 { v.ceil() as u32 } else { 0 };
        Self {
            origin: Point::new(bbox.x, bbox.y),
            image: RgbaImage::new(px(bbox.w), px(bbox.h)),
        }
    }

    /// Like [`Surface::allocate`], but only for the part of `bbox` inside
    /// `[0, W] x [0, H]`. A box entirely off-screen yields an empty surface at
    /// the box origin.
    pub fn allocate_clipped(bbox: &BoundingBox, viewport: Viewport) -> Self {
        let x0 = bbox.x.max(0.0);
        let y0 = bbox.y.max(0.0);
        let x1 = (bbox.x + bbox.w).min(viewport.width);
        let y1 = (bbox.y + bbox.h).min(viewport.height);
        if !(x1 > x0 && y1 > y0) {
            return Self::allocate(&BoundingBox { x: bbox.x, y: bbox.y, w: 0.0, h: 0.0 });
        }
        Self::allocate(&BoundingBox { x: x0, y: y0, w: x1 - x0, h: y1 - y0 })
    }

    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Fill every pixel whose centre lies inside the closed `outline`
    /// (parent coordinates) with `color`; everything else stays untouched.
    pub fn fill_clipped(&mut self, outline: &[Point], color: Rgba) {
        if outline.len() < 3 || self.is_empty() {
            return;
        }
        // Translate the path into surface-local space once.
        let local: Vec<Point> = outline.iter().map(|p| p.sub(self.origin)).collect();
        let fill: image::Rgba<u8> = color.into();
        for (x, y, pixel) in self.image.enumerate_pixels_mut() {
            let centre = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            if polygon_contains(&local, centre) {
                *pixel = fill;
            }
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x < self.width() && y < self.height() {
            Some(Rgba(self.image.get_pixel(x, y).0))
        } else {
            None
        }
    }

    /// Number of non-transparent pixels.
    pub fn covered_pixels(&self) -> usize {
        self.image.pixels().filter(|p| p.0[3] != 0).count()
    }

    /// Row-major RGBA bytes, suitable for `ImageData`.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Even-odd point-in-polygon test.
pub fn polygon_contains(polygon: &[Point], p: Point) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_rounds_up_and_starts_transparent() {
        let s = Surface::allocate(&BoundingBox { x: 2.0, y: 3.0, w: 4.2, h: 1.0 });
        assert_eq!((s.width(), s.height()), (5, 1));
        assert_eq!(s.origin(), Point::new(2.0, 3.0));
        assert_eq!(s.covered_pixels(), 0);
        assert_eq!(s.pixel(0, 0), Some(Rgba::TRANSPARENT));
        assert_eq!(s.pixel(5, 0), None);
    }

    #[test]
    fn clipped_allocation_stays_inside_the_viewport() {
        let vp = Viewport::new(800.0, 600.0).unwrap();
        let s = Surface::allocate_clipped(&BoundingBox { x: -1.0e6, y: 100.0, w: 2.0e6, h: 50.5 }, vp);
        assert_eq!(s.origin(), Point::new(0.0, 100.0));
        assert_eq!((s.width(), s.height()), (800, 51));

        let inside = BoundingBox { x: 2.0, y: 3.0, w: 4.2, h: 1.0 };
        assert_eq!(Surface::allocate_clipped(&inside, vp), Surface::allocate(&inside));

        let off = Surface::allocate_clipped(&BoundingBox { x: -90.0, y: -40.0, w: 50.0, h: 10.0 }, vp);
        assert!(off.is_empty());
        assert_eq!(off.origin(), Point::new(-90.0, -40.0));
    }

    #[test]
    fn zero_extent_is_empty_and_fill_is_a_no_op() {
        let mut s = Surface::allocate(&BoundingBox { x: 0.0, y: 0.0, w: 0.0, h: 7.0 });
        assert!(s.is_empty());
        s.fill_clipped(
            &[Point::new(0.0, 0.0), Point::new(0.0, 3.0), Point::new(0.0, 7.0)],
            Rgba::rgb(1, 2, 3),
        );
        assert_eq!(s.covered_pixels(), 0);
        assert!(s.as_raw().is_empty());
    }

    #[test]
    fn clip_keeps_only_the_triangle_interior() {
        // Lower-left half of a 10x10 square at (100, 100).
        let outline = [
            Point::new(100.0, 100.0),
            Point::new(100.0, 110.0),
            Point::new(110.0, 110.0),
        ];
        let bb = BoundingBox::enclosing(&outline);
        let mut s = Surface::allocate(&bb);
        let red = Rgba::rgb(255, 0, 0);
        s.fill_clipped(&outline, red);
        assert_eq!(s.pixel(0, 9), Some(red));
        assert_eq!(s.pixel(9, 0), Some(Rgba::TRANSPARENT));
        // Pixel centres strictly below the diagonal: 0 + 1 + ... + 9.
        assert_eq!(s.covered_pixels(), 45);
    }

    #[test]
    fn even_odd_square() {
        let sq = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ];
        assert!(polygon_contains(&sq, Point::new(2.0, 2.0)));
        assert!(!polygon_contains(&sq, Point::new(5.0, 2.0)));
    }
}
