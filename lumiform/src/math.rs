//! Geometry kernel: normalized points, step rounding, and the square
//! viewport mapper between [-0.5, 0.5]² and surface pixels.

use crate::color::Color;
use crate::render::{BlendMode, Canvas};

/// A point in the normalized square coordinate space.
///
/// `(0, 0)` is the center of the display square, `x` grows to the right and
/// `y` grows downward; the square spans [-0.5, 0.5] on both axes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A uniformly random point inside the normalized square.
    pub fn random() -> Self {
        Self::new(fastrand::f64() - 0.5, fastrand::f64() - 0.5)
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Self) -> f64 {
        let dist_x = self.x - other.x;
        let dist_y = self.y - other.y;
        (dist_x * dist_x + dist_y * dist_y).sqrt()
    }

    /// Angle of the offset from `other` to `self` (atan2 of the deltas).
    pub fn angle(self, other: Self) -> f64 {
        let dist_x = self.x - other.x;
        let dist_y = self.y - other.y;
        dist_y.atan2(dist_x)
    }

    /// The point clamped into the normalized square.
    pub fn clamped(self) -> Self {
        Self::new(self.x.clamp(-0.5, 0.5), self.y.clamp(-0.5, 0.5))
    }
}

impl From<(f64, f64)> for Point {
    fn from(value: (f64, f64)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}

impl std::ops::Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Rounds `value` to the nearest multiple of `step`.
pub fn round_to_step(value: f64, step: f64) -> f64 {
    step * (value / step + 0.5).floor()
}

/// The largest square that fits the surface, centered with letterbox margins.
///
/// All entity coordinates are normalized to this square; `x`/`y` map them to
/// surface pixels and `normalize` maps pixels back.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Side length of the inscribed square in pixels.
    pub size: f64,
    pub x_center: f64,
    pub y_center: f64,
    pub x_margin: f64,
    pub y_margin: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        let mut viewport = Self::default();

        if width * height > 0.0 {
            viewport.resize(width, height);
        }

        viewport
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        let size = width.min(height);

        self.width = width;
        self.height = height;
        self.size = size;
        self.x_center = 0.5 * width;
        self.y_center = 0.5 * height;
        self.x_margin = 0.5 * (width - size);
        self.y_margin = 0.5 * (height - size);
    }

    /// Maps a normalized x coordinate to surface pixels.
    pub fn x(&self, norm_x: f64) -> f64 {
        self.x_center + norm_x * self.size
    }

    /// Maps a normalized y coordinate to surface pixels.
    pub fn y(&self, norm_y: f64) -> f64 {
        self.y_center + norm_y * self.size
    }

    /// Maps surface pixels back into the normalized space (unclamped).
    pub fn normalize(&self, abs_x: f64, abs_y: f64) -> Point {
        Point::new(
            (abs_x - self.x_center) / self.size,
            (abs_y - self.y_center) / self.size,
        )
    }

    /// Strokes the display frame outline just inside the square.
    pub fn render_frame(&self, canvas: &mut dyn Canvas, color: Color) {
        let line_radius = 5.0;
        let width = self.width - 2.0 * (self.x_margin + line_radius);
        let height = self.height - 2.0 * (self.y_margin + line_radius);

        canvas.set_stroke_color(color);
        canvas.set_line_width(10.0);
        canvas.set_alpha(1.0);
        canvas.set_blend_mode(BlendMode::SourceOver);
        canvas.stroke_rect(
            self.x_margin + line_radius,
            self.y_margin + line_radius,
            width,
            height,
        );
    }

    /// Masks the letterbox margins outside the square.
    pub fn render_margins(&self, canvas: &mut dyn Canvas, color: Color) {
        canvas.set_fill_color(color);
        canvas.set_alpha(1.0);
        canvas.set_blend_mode(BlendMode::SourceOver);

        if self.x_margin > 0.0 {
            canvas.fill_rect(0.0, 0.0, self.x_margin, self.height);
            canvas.fill_rect(self.width - self.x_margin, 0.0, self.x_margin, self.height);
        }

        if self.y_margin > 0.0 {
            canvas.fill_rect(0.0, 0.0, self.width, self.y_margin);
            canvas.fill_rect(0.0, self.height - self.y_margin, self.width, self.y_margin);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn point_distance_and_angle() {
        let a = Point::new(0.3, 0.4);
        let b = Point::ZERO;

        assert!((a.distance(b) - 0.5).abs() < 1e-12);
        assert!((b.angle(a) - (-0.4f64).atan2(-0.3)).abs() < 1e-12);
    }

    #[test]
    fn clamped_stays_in_square() {
        let p = Point::new(0.7, -1.3).clamped();
        assert_eq!(p, Point::new(0.5, -0.5));
    }

    #[test]
    fn round_to_step_lands_on_multiples() {
        let step = PI / 24.0;

        for value in [-1.3, -0.2, 0.0, 0.17, 0.7854, 2.0] {
            let snapped = round_to_step(value, step);
            let remainder = (snapped / step) - (snapped / step).round();
            assert!(remainder.abs() < 1e-9, "{snapped} is not a multiple of {step}");
            assert!((snapped - value).abs() <= 0.5 * step + 1e-9);
        }
    }

    #[test]
    fn viewport_letterboxes_landscape_surfaces() {
        let viewport = Viewport::new(1920.0, 1080.0);

        assert_eq!(viewport.size, 1080.0);
        assert_eq!(viewport.x_margin, 420.0);
        assert_eq!(viewport.y_margin, 0.0);
        assert_eq!(viewport.x(0.0), 960.0);
        assert_eq!(viewport.y(0.5), 1080.0);
    }

    #[test]
    fn normalize_inverts_mapping() {
        let viewport = Viewport::new(800.0, 1200.0);
        let p = viewport.normalize(viewport.x(0.25), viewport.y(-0.4));

        assert!((p.x - 0.25).abs() < 1e-12);
        assert!((p.y + 0.4).abs() < 1e-12);
    }
}
