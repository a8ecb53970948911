//! Headless canvas backend that records draw commands.
//!
//! Each command is captured in the local coordinates it was issued in,
//! together with the affine transform in effect at that moment, so replay
//! backends and tests can resolve surface positions without re-running the
//! transform stack.

use glam::{DAffine2, DVec2};

use super::canvas::{BlendMode, Canvas};
use crate::color::Color;

/// A draw command captured by [`RecordingCanvas`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    BlendMode(BlendMode),
    Alpha(f64),
    FillColor(Color),
    FillGradient {
        x0: f64,
        y0: f64,
        r0: f64,
        x1: f64,
        y1: f64,
        r1: f64,
        inner: Color,
    },
    StrokeColor(Color),
    LineWidth(f64),
    BeginPath,
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    ClosePath,
    Fill,
    Stroke,
    Clip,
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    StrokeRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// A recorded command plus the transform it was issued under.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub op: DrawOp,
    pub transform: DAffine2,
}

impl Recorded {
    /// Resolves a point from the command's local space to surface pixels.
    pub fn to_surface(&self, x: f64, y: f64) -> DVec2 {
        self.transform.transform_point2(DVec2::new(x, y))
    }
}

/// Canvas implementation that records commands instead of rasterizing.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    ops: Vec<Recorded>,
    transform: DAffine2,
    stack: Vec<DAffine2>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            transform: DAffine2::IDENTITY,
            stack: Vec::new(),
        }
    }

    /// All commands recorded so far, in issue order.
    pub fn ops(&self) -> &[Recorded] {
        &self.ops
    }

    /// The transform currently in effect.
    pub fn transform(&self) -> DAffine2 {
        self.transform
    }

    /// Drops all recorded commands and resets the transform stack.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.stack.clear();
        self.transform = DAffine2::IDENTITY;
    }

    fn push(&mut self, op: DrawOp) {
        self.ops.push(Recorded {
            op,
            transform: self.transform,
        });
    }
}

impl Canvas for RecordingCanvas {
    fn save(&mut self) {
        self.stack.push(self.transform);
        self.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        if let Some(transform) = self.stack.pop() {
            self.transform = transform;
        }
        self.push(DrawOp::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.transform *= DAffine2::from_translation(DVec2::new(x, y));
    }

    fn rotate(&mut self, angle: f64) {
        self.transform *= DAffine2::from_angle(angle);
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.transform *= DAffine2::from_scale(DVec2::new(x, y));
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.push(DrawOp::BlendMode(mode));
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.push(DrawOp::Alpha(alpha));
    }

    fn set_fill_color(&mut self, color: Color) {
        self.push(DrawOp::FillColor(color));
    }

    fn set_fill_radial_gradient(
        &mut self,
        x0: f64,
        y0: f64,
        r0: f64,
        x1: f64,
        y1: f64,
        r1: f64,
        inner: Color,
    ) {
        self.push(DrawOp::FillGradient {
            x0,
            y0,
            r0,
            x1,
            y1,
            r1,
            inner,
        });
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.push(DrawOp::StrokeColor(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.push(DrawOp::LineWidth(width));
    }

    fn begin_path(&mut self) {
        self.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.push(DrawOp::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.push(DrawOp::LineTo { x, y });
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        self.push(DrawOp::Arc {
            x,
            y,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
        });
    }

    fn close_path(&mut self) {
        self.push(DrawOp::ClosePath);
    }

    fn fill(&mut self) {
        self.push(DrawOp::Fill);
    }

    fn stroke(&mut self) {
        self.push(DrawOp::Stroke);
    }

    fn clip(&mut self) {
        self.push(DrawOp::Clip);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push(DrawOp::StrokeRect {
            x,
            y,
            width,
            height,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transforms_compose_in_issue_order() {
        let mut canvas = RecordingCanvas::new();
        canvas.translate(10.0, 0.0);
        canvas.scale(2.0, 2.0);
        canvas.move_to(1.0, 1.0);

        let recorded = canvas.ops().last().unwrap();
        let surface = recorded.to_surface(1.0, 1.0);
        assert!((surface.x - 12.0).abs() < 1e-12);
        assert!((surface.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn restore_pops_the_transform_stack() {
        let mut canvas = RecordingCanvas::new();
        canvas.save();
        canvas.translate(5.0, 5.0);
        canvas.restore();
        canvas.rect(0.0, 0.0, 1.0, 1.0);

        let recorded = canvas.ops().last().unwrap();
        let surface = recorded.to_surface(0.0, 0.0);
        assert_eq!(surface, DVec2::ZERO);
    }

    #[test]
    fn rotation_matches_glam() {
        let mut canvas = RecordingCanvas::new();
        canvas.rotate(0.4);
        canvas.line_to(1.0, 0.0);

        let recorded = canvas.ops().last().unwrap();
        let surface = recorded.to_surface(1.0, 0.0);
        assert!((surface.x - 0.4f64.cos()).abs() < 1e-12);
        assert!((surface.y - 0.4f64.sin()).abs() < 1e-12);
    }
}
