//! Capability interface over the external 2D drawing surface.
//!
//! The engine never touches pixels itself; it issues path, transform, clip
//! and blend commands against this trait, and the embedding application
//! provides the backend. [`super::RecordingCanvas`] is the in-repo backend.

use crate::color::Color;

/// Pixel blend modes the compositor relies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// Ordinary alpha-over compositing.
    SourceOver,
    /// Additive "screen" compositing, used for all light contributions.
    Screen,
}

/// The drawing operations assumed available from the display surface:
/// filled/stroked path primitives, an affine transform stack, clip-to-path,
/// alpha and blend state, and black-fading radial gradient fills.
///
/// Transform, clip, style and blend state are saved by `save` and restored
/// by `restore`, like a 2D canvas context.
pub trait Canvas {
    fn save(&mut self);
    fn restore(&mut self);

    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, angle: f64);
    fn scale(&mut self, x: f64, y: f64);

    fn set_blend_mode(&mut self, mode: BlendMode);
    fn set_alpha(&mut self, alpha: f64);
    fn set_fill_color(&mut self, color: Color);
    /// Fill with a radial gradient running from `inner` on the start circle
    /// to black on the end circle.
    #[allow(clippy::too_many_arguments)]
    fn set_fill_radial_gradient(
        &mut self,
        x0: f64,
        y0: f64,
        r0: f64,
        x1: f64,
        y1: f64,
        r1: f64,
        inner: Color,
    );
    fn set_stroke_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64);
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn close_path(&mut self);

    fn fill(&mut self);
    fn stroke(&mut self);
    /// Intersects the clip region with the current path.
    fn clip(&mut self);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
}

/// Capability interface for anything the frame loop drives.
pub trait Renderable {
    /// Advances internal state by `dt` seconds of wall-clock time.
    fn update(&mut self, dt: f64);

    /// Draws the current state onto the surface.
    fn render(&mut self, canvas: &mut dyn Canvas);
}
