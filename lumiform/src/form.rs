//! The form entity: a shaped aperture with two sliding shutters.
//!
//! A form is drawn in two very different ways: on the display it is the
//! silhouette a light shines through (`render_occluded` and friends), on the
//! owning controller it is an editing interface with visible shutters
//! (`render_interface`).

use std::f64::consts::PI;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;
use crate::gesture::InteractionMode;
use crate::math::Viewport;
use crate::render::{BlendMode, Canvas};

/// The aperture silhouette shapes, all sized to cover comparable area at
/// equal `size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormShape {
    Circle,
    Square,
    Triangle,
    Rightangle,
    Cross,
}

/// Error parsing a form shape name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown form shape {0:?}")]
pub struct ParseShapeError(String);

impl FromStr for FormShape {
    type Err = ParseShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "circle" => Ok(Self::Circle),
            "square" => Ok(Self::Square),
            "triangle" => Ok(Self::Triangle),
            "rightangle" => Ok(Self::Rightangle),
            "cross" => Ok(Self::Cross),
            _ => Err(ParseShapeError(s.into())),
        }
    }
}

/// One of the two occluding shutter edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShutterSide {
    Left,
    Right,
}

impl ShutterSide {
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// A shaped aperture with position, size, rotation, an inclined shutter
/// axis and two independent shutter closure distances.
#[derive(Clone, Copy, Debug)]
pub struct Form {
    pub shape: FormShape,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    /// Rotation of the shape itself, in radians.
    pub rotation: f64,
    /// Inclination of the shutter axis, in radians.
    pub shutter_incl: f64,
    /// How far the left edge has slid inward; 0 is fully open.
    pub left_shutter: f64,
    pub right_shutter: f64,
}

impl Form {
    pub fn new(shape: FormShape) -> Self {
        Self {
            shape,
            x: 0.0,
            y: 0.0,
            size: 1.0,
            rotation: 0.0,
            shutter_incl: 0.0,
            left_shutter: 0.0,
            right_shutter: 0.0,
        }
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn set_size_and_rotation(&mut self, size: f64, rotation: f64) {
        self.size = size;
        self.rotation = rotation;
    }

    pub fn set_shutter_incl(&mut self, incl: f64) {
        self.shutter_incl = incl;
    }

    pub fn set_left_shutter(&mut self, dist: f64) {
        self.left_shutter = dist;
    }

    pub fn set_right_shutter(&mut self, dist: f64) {
        self.right_shutter = dist;
    }

    fn trace_core(&self, canvas: &mut dyn Canvas, scale: f64) {
        let size = scale * self.size;

        match self.shape {
            FormShape::Circle => {
                let radius = 0.5 * size;
                canvas.begin_path();
                canvas.arc(0.0, 0.0, radius, 0.0, 2.0 * PI);
            }
            FormShape::Square => {
                // side of the square with the same area as the unit circle
                let width = size * 0.886226925452758;
                let offset = -0.5 * width;
                canvas.begin_path();
                canvas.rect(offset, offset, width, width);
            }
            FormShape::Triangle => {
                let radius = 0.5 * size;
                let x_bottom = 0.43301270189221935 * size;
                let y_bottom = 0.25 * size;
                canvas.begin_path();
                canvas.move_to(0.0, -radius);
                canvas.line_to(-x_bottom, y_bottom);
                canvas.line_to(x_bottom, y_bottom);
                canvas.close_path();
            }
            FormShape::Rightangle => {
                let radius = 0.5 * size;
                let x_top = -0.22360679774997894 * size;
                let y_top = -0.44721359549995804 * size;
                canvas.begin_path();
                canvas.move_to(x_top, y_top);
                canvas.line_to(-radius, 0.0);
                canvas.line_to(radius, 0.0);
                canvas.close_path();
            }
            FormShape::Cross => {
                let radius = 0.5 * size;
                let corner = 0.125 * size;
                canvas.begin_path();
                canvas.move_to(-corner, -radius);
                canvas.line_to(-corner, -corner);
                canvas.line_to(-radius, -corner);
                canvas.line_to(-radius, corner);
                canvas.line_to(-corner, corner);
                canvas.line_to(-corner, radius);
                canvas.line_to(corner, radius);
                canvas.line_to(corner, corner);
                canvas.line_to(radius, corner);
                canvas.line_to(radius, -corner);
                canvas.line_to(corner, -corner);
                canvas.line_to(corner, -radius);
                canvas.close_path();
            }
        }
    }

    /// Traces the shape path at `scale * size` and fills or strokes it.
    pub fn render_core(&self, canvas: &mut dyn Canvas, scale: f64, fill: bool) {
        self.trace_core(canvas, scale);

        if fill {
            canvas.fill();
        } else {
            canvas.stroke();
        }
    }

    /// Fills one shutter as an occluding quad sliding along the inclined
    /// axis, in unit-square local coordinates.
    pub fn render_shutter(&self, canvas: &mut dyn Canvas, scale: f64, side: ShutterSide) {
        let x_top = 0.5 * self.shutter_incl.tan();
        let opening = match side {
            ShutterSide::Left => -self.left_shutter,
            ShutterSide::Right => self.right_shutter,
        };
        let angle = self.shutter_incl.atan();
        let shift = 0.5 * scale * self.size * opening / angle.cos();

        canvas.begin_path();
        canvas.move_to(shift + x_top, -0.5);
        canvas.line_to(shift - x_top, 0.5);

        match side {
            ShutterSide::Left => {
                canvas.line_to(shift - 0.5, 0.5);
                canvas.line_to(shift - 0.5, -0.5);
            }
            ShutterSide::Right => {
                canvas.line_to(shift + 0.5, 0.5);
                canvas.line_to(shift + 0.5, -0.5);
            }
        }

        canvas.close_path();
        canvas.fill();
    }

    /// Strokes the shutter axis across the unit square.
    pub fn render_shutter_line(&self, canvas: &mut dyn Canvas) {
        let x_top = 0.5 * self.shutter_incl.tan();

        canvas.begin_path();
        canvas.move_to(x_top, -0.5);
        canvas.line_to(-x_top, 0.5);
        canvas.stroke();
    }

    /// Renders the controller-local editing view: translucent core, both
    /// shutters and the shutter axis, with the active interaction
    /// highlighted.
    pub fn render_interface(
        &self,
        canvas: &mut dyn Canvas,
        viewport: &Viewport,
        scale: f64,
        mode: InteractionMode,
    ) {
        canvas.save();

        canvas.translate(viewport.x_center, viewport.y_center);
        canvas.scale(viewport.size, viewport.size);
        canvas.set_blend_mode(BlendMode::SourceOver);

        canvas.set_fill_color(if mode == InteractionMode::Resize {
            Color::WHITE
        } else {
            Color::gray(0.667)
        });
        canvas.set_alpha(0.5);
        canvas.rotate(self.rotation);
        self.render_core(canvas, scale, true);
        canvas.rotate(-self.rotation);

        canvas.set_fill_color(if mode == InteractionMode::LeftShutter {
            Color::gray(0.267)
        } else {
            Color::gray(0.133)
        });
        canvas.set_alpha(0.8);
        self.render_shutter(canvas, scale, ShutterSide::Left);

        canvas.set_fill_color(if mode == InteractionMode::RightShutter {
            Color::gray(0.267)
        } else {
            Color::gray(0.133)
        });
        self.render_shutter(canvas, scale, ShutterSide::Right);

        let incl_active = mode == InteractionMode::ShutterIncl;
        canvas.set_stroke_color(if incl_active {
            Color::WHITE
        } else {
            Color::gray(0.667)
        });
        let line_width = if incl_active { 5.0 } else { 3.0 };
        canvas.set_line_width(line_width / viewport.size);
        canvas.set_alpha(0.5);
        self.render_shutter_line(canvas);

        canvas.restore();
    }

    /// Renders the shutter-occluded silhouette at an explicit surface
    /// position.
    ///
    /// The canvas is rotated into the shutter frame to clip the open band,
    /// then counter-rotated into the shape frame before filling. The
    /// shutter axis and the shape rotation are independent degrees of
    /// freedom; the clip must happen in the shutter frame and the fill in
    /// the shape frame, in that order.
    #[allow(clippy::too_many_arguments)]
    pub fn render_occluded(
        &self,
        canvas: &mut dyn Canvas,
        viewport: &Viewport,
        x: f64,
        y: f64,
        scale: f64,
        color: Color,
        opacity: f64,
    ) {
        canvas.save();

        canvas.set_blend_mode(BlendMode::Screen);

        canvas.translate(x, y);
        canvas.scale(viewport.size, viewport.size);

        let shutter_angle = self.shutter_incl.atan();
        canvas.rotate(shutter_angle);

        let adapt = 0.5 * scale * self.size;
        let left = -adapt * self.left_shutter;
        let width = adapt * (self.left_shutter + self.right_shutter);

        canvas.begin_path();
        canvas.rect(left, -0.5, width, 1.0);
        canvas.clip();

        canvas.rotate(self.rotation - shutter_angle);

        canvas.set_fill_color(color);
        canvas.set_alpha(opacity);
        self.render_core(canvas, scale, true);

        canvas.restore();
    }

    /// Renders the occluded silhouette at the form's own position.
    pub fn render_result(
        &self,
        canvas: &mut dyn Canvas,
        viewport: &Viewport,
        scale: f64,
        color: Color,
        opacity: f64,
    ) {
        let x = viewport.x(self.x);
        let y = viewport.y(self.y);

        self.render_occluded(canvas, viewport, x, y, scale, color, opacity);
    }

    /// Strokes the un-occluded shape outline at the form's position.
    pub fn render_border(
        &self,
        canvas: &mut dyn Canvas,
        viewport: &Viewport,
        scale: f64,
        color: Color,
        opacity: f64,
    ) {
        let x = viewport.x(self.x);
        let y = viewport.y(self.y);

        canvas.save();

        canvas.set_blend_mode(BlendMode::Screen);

        canvas.translate(x, y);
        canvas.scale(viewport.size, viewport.size);
        canvas.rotate(self.rotation);

        canvas.set_line_width(1.0 / viewport.size);
        canvas.set_stroke_color(color);
        canvas.set_alpha(opacity);
        self.render_core(canvas, scale, false);

        canvas.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawOp, RecordingCanvas};
    use glam::{DAffine2, DVec2};

    fn clip_rect(canvas: &RecordingCanvas) -> (f64, f64) {
        canvas
            .ops()
            .iter()
            .find_map(|recorded| match recorded.op {
                DrawOp::Rect { x, width, .. } => Some((x, width)),
                _ => None,
            })
            .expect("no clip rect recorded")
    }

    #[test]
    fn aperture_width_scales_with_shutter_opening() {
        let mut form = Form::new(FormShape::Circle);
        form.left_shutter = 0.5;
        form.right_shutter = 0.5;

        let viewport = Viewport::new(1000.0, 1000.0);
        let mut canvas = RecordingCanvas::new();
        let form_ratio = 0.1;
        form.render_result(&mut canvas, &viewport, form_ratio, Color::WHITE, 0.2);

        let (left, width) = clip_rect(&canvas);
        let expected = 0.5 * form.size * form_ratio * (form.left_shutter + form.right_shutter);
        assert!((width - expected).abs() < 1e-12);
        assert!((left + 0.5 * form.size * form_ratio * form.left_shutter).abs() < 1e-12);
    }

    #[test]
    fn clip_happens_in_shutter_frame_and_fill_in_shape_frame() {
        let mut form = Form::new(FormShape::Circle);
        form.shutter_incl = 0.3;
        form.rotation = 1.0;
        form.left_shutter = 0.7;
        form.right_shutter = 0.2;

        let viewport = Viewport::new(600.0, 600.0);
        let mut canvas = RecordingCanvas::new();
        form.render_occluded(&mut canvas, &viewport, 300.0, 300.0, 0.1, Color::WHITE, 1.0);

        let shutter_angle = form.shutter_incl.atan();
        let base = DAffine2::from_translation(DVec2::new(300.0, 300.0))
            * DAffine2::from_scale(DVec2::splat(600.0));

        let rect_transform = canvas
            .ops()
            .iter()
            .find_map(|r| matches!(r.op, DrawOp::Rect { .. }).then_some(r.transform))
            .unwrap();
        let expected_clip = base * DAffine2::from_angle(shutter_angle);
        assert!(rect_transform.abs_diff_eq(expected_clip, 1e-9));

        let core_transform = canvas
            .ops()
            .iter()
            .find_map(|r| matches!(r.op, DrawOp::Arc { .. }).then_some(r.transform))
            .unwrap();
        let expected_fill = base * DAffine2::from_angle(form.rotation);
        assert!(core_transform.abs_diff_eq(expected_fill, 1e-9));
    }

    #[test]
    fn shape_names_parse_and_serialize() {
        let shape: FormShape = "rightangle".parse().unwrap();
        assert_eq!(shape, FormShape::Rightangle);
        assert_eq!(serde_json::to_string(&shape).unwrap(), "\"rightangle\"");
        assert!("blob".parse::<FormShape>().is_err());
    }

    #[test]
    fn cross_path_is_closed_with_twelve_vertices() {
        let form = Form::new(FormShape::Cross);
        let mut canvas = RecordingCanvas::new();
        form.render_core(&mut canvas, 1.0, true);

        let vertices = canvas
            .ops()
            .iter()
            .filter(|r| matches!(r.op, DrawOp::MoveTo { .. } | DrawOp::LineTo { .. }))
            .count();
        assert_eq!(vertices, 12);
        assert!(canvas
            .ops()
            .iter()
            .any(|r| matches!(r.op, DrawOp::ClosePath)));
    }

    #[test]
    fn shutter_quad_shifts_along_the_inclined_axis() {
        let mut form = Form::new(FormShape::Square);
        form.shutter_incl = 0.2;
        form.left_shutter = 0.8;

        let mut canvas = RecordingCanvas::new();
        form.render_shutter(&mut canvas, 1.0, ShutterSide::Left);

        let x_top = 0.5 * form.shutter_incl.tan();
        let shift = -0.5 * form.size * form.left_shutter / form.shutter_incl.atan().cos();
        let first = canvas
            .ops()
            .iter()
            .find_map(|r| match r.op {
                DrawOp::MoveTo { x, y } => Some((x, y)),
                _ => None,
            })
            .unwrap();
        assert!((first.0 - (shift + x_top)).abs() < 1e-12);
        assert_eq!(first.1, -0.5);
    }
}
