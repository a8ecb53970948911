//! Multi-touch gesture interpreter for form controllers.
//!
//! Up to two simultaneous contacts are classified into a single interaction
//! mode. Values computed while touches move are pushed out live; the
//! committed baseline a gesture measures against only changes when a touch
//! of that mode ends.

use std::f64::consts::PI;

use crate::form::{Form, ShutterSide};
use crate::math::{round_to_step, Point};

const DEG_7_5: f64 = PI / 24.0;
const DEG_45: f64 = PI / 4.0;

/// Distance from the form center within which a touch grabs the form.
const MOVE_RADIUS: f64 = 0.1;
/// Half-width of the band around the shutter axis that selects inclination.
const INCL_BAND: f64 = 0.07;
/// Upper bound for shutter closure distances.
const SHUTTER_MAX: f64 = 1.41;

pub type TouchId = u64;

/// The interaction a controller's touches are currently driving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionMode {
    None,
    Move,
    Resize,
    ShutterIncl,
    LeftShutter,
    RightShutter,
    LeftRightShutter,
}

/// A touch role slot: either free or bound to a physical contact.
#[derive(Clone, Copy, Debug, PartialEq)]
enum TouchContact {
    Unbound,
    Bound { id: TouchId, coords: Point },
}

impl TouchContact {
    fn id(&self) -> Option<TouchId> {
        match *self {
            Self::Unbound => None,
            Self::Bound { id, .. } => Some(id),
        }
    }

    fn coords(&self) -> Point {
        match *self {
            Self::Unbound => Point::ZERO,
            Self::Bound { coords, .. } => coords,
        }
    }

    fn set_coords(&mut self, new_coords: Point) {
        if let Self::Bound { coords, .. } = self {
            *coords = new_coords;
        }
    }
}

/// The committed entity values gesture deltas are measured against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormBaseline {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub rotation: f64,
    pub shutter_incl: f64,
    pub left_shutter: f64,
    pub right_shutter: f64,
}

impl From<&Form> for FormBaseline {
    fn from(form: &Form) -> Self {
        Self {
            x: form.x,
            y: form.y,
            size: form.size,
            rotation: form.rotation,
            shutter_incl: form.shutter_incl,
            left_shutter: form.left_shutter,
            right_shutter: form.right_shutter,
        }
    }
}

/// A live value produced by an in-flight gesture, to be pushed to the local
/// entity and emitted over the wire immediately.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureUpdate {
    Position { x: f64, y: f64 },
    SizeRotation { size: f64, rotation: f64 },
    ShutterIncl(f64),
    LeftShutter(f64),
    RightShutter(f64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TouchRole {
    Touch1,
    Touch2,
}

/// Per-controller gesture state machine.
pub struct GestureInterpreter {
    mode: InteractionMode,
    touch1: TouchContact,
    touch2: TouchContact,
    /// atan2 of touch1's bind position, baseline for inclination deltas.
    touch1_angle: f64,
    /// Which side touch1 anchors while a shutter mode is active.
    touch1_shutter: ShutterSide,
    /// Contact separation at touch2 bind time, baseline for resize.
    touch2_dist: f64,
    /// Contact angle at touch2 bind time, baseline for rotation.
    touch2_angle: f64,
    /// Last observed touch position, used to finalize an in-flight gesture
    /// when a second touch promotes the mode.
    last_touch: Point,
    committed: FormBaseline,
}

impl GestureInterpreter {
    pub fn new(committed: FormBaseline) -> Self {
        Self {
            mode: InteractionMode::None,
            touch1: TouchContact::Unbound,
            touch2: TouchContact::Unbound,
            touch1_angle: 0.0,
            touch1_shutter: ShutterSide::Left,
            touch2_dist: 0.0,
            touch2_angle: 0.0,
            last_touch: Point::ZERO,
            committed,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// The committed baseline (the values in effect outside any gesture).
    pub fn committed(&self) -> FormBaseline {
        self.committed
    }

    /// Signed distance from the shutter axis, negative on the left side.
    fn shutter_line_distance(&self, coords: Point) -> f64 {
        coords.x + coords.y * self.committed.shutter_incl.tan()
    }

    pub fn touch_start(&mut self, id: TouchId, coords: Point) -> Vec<GestureUpdate> {
        let coords = coords.clamped();
        let line_distance = self.shutter_line_distance(coords);
        let mut updates = Vec::new();

        if self.touch1.id().is_none() {
            let center = Point::new(self.committed.x, self.committed.y);
            let dist = center.distance(coords);

            self.mode = if dist < MOVE_RADIUS * self.committed.size {
                InteractionMode::Move
            } else if line_distance.abs() < INCL_BAND {
                InteractionMode::ShutterIncl
            } else if line_distance < 0.0 {
                self.touch1_shutter = ShutterSide::Left;
                InteractionMode::LeftShutter
            } else {
                self.touch1_shutter = ShutterSide::Right;
                InteractionMode::RightShutter
            };

            self.touch1 = TouchContact::Bound { id, coords };
            self.touch1_angle = coords.y.atan2(coords.x);
        } else if self.touch2.id().is_none() {
            let opposite_side = (self.mode == InteractionMode::LeftShutter
                && line_distance >= 0.0)
                || (self.mode == InteractionMode::RightShutter && line_distance < 0.0);

            if opposite_side {
                self.mode = InteractionMode::LeftRightShutter;
            } else {
                // finalize the single-touch gesture before re-baselining
                updates = self.apply(self.last_touch, TouchRole::Touch1, true);
                self.mode = InteractionMode::Resize;
            }

            self.touch2 = TouchContact::Bound { id, coords };
            self.touch2_dist = self.touch1.coords().distance(coords);
            self.touch2_angle = self.touch1.coords().angle(coords);
        } else {
            log::debug!("ignoring touch {id}: both contacts already bound");
        }

        self.last_touch = coords;
        updates
    }

    pub fn touch_move(&mut self, id: TouchId, coords: Point) -> Vec<GestureUpdate> {
        let coords = coords.clamped();

        let role = if self.touch1.id() == Some(id) {
            TouchRole::Touch1
        } else if self.touch2.id() == Some(id) {
            TouchRole::Touch2
        } else {
            return Vec::new();
        };

        let updates = self.apply(coords, role, false);
        self.last_touch = coords;
        updates
    }

    pub fn touch_end(&mut self, id: TouchId, coords: Point) -> Vec<GestureUpdate> {
        let coords = coords.clamped();

        let role = if self.touch1.id() == Some(id) {
            TouchRole::Touch1
        } else if self.touch2.id() == Some(id) {
            TouchRole::Touch2
        } else {
            return Vec::new();
        };

        let updates = self.apply(coords, role, true);

        if self.mode != InteractionMode::LeftRightShutter {
            self.touch1 = TouchContact::Unbound;
            self.touch2 = TouchContact::Unbound;
            self.mode = InteractionMode::None;
        } else if role == TouchRole::Touch1 {
            // the remaining contact takes over the first slot and keeps
            // driving its own side
            self.touch1 = self.touch2;
            self.touch2 = TouchContact::Unbound;
            self.touch1_shutter = self.touch1_shutter.opposite();
            self.mode = match self.touch1_shutter {
                ShutterSide::Left => InteractionMode::LeftShutter,
                ShutterSide::Right => InteractionMode::RightShutter,
            };
        } else {
            self.touch2 = TouchContact::Unbound;
            self.mode = match self.touch1_shutter {
                ShutterSide::Left => InteractionMode::LeftShutter,
                ShutterSide::Right => InteractionMode::RightShutter,
            };
        }

        updates
    }

    fn apply(&mut self, coords: Point, role: TouchRole, end: bool) -> Vec<GestureUpdate> {
        match self.mode {
            InteractionMode::None => Vec::new(),
            InteractionMode::Move => vec![self.set_position(coords, end)],
            InteractionMode::Resize => vec![self.set_size_and_rotation(coords, role, end)],
            InteractionMode::ShutterIncl => vec![self.set_shutter_incl(coords, end)],
            InteractionMode::LeftShutter => {
                vec![self.set_left_shutter(coords.x, TouchRole::Touch1, end)]
            }
            InteractionMode::RightShutter => {
                vec![self.set_right_shutter(coords.x, TouchRole::Touch1, end)]
            }
            InteractionMode::LeftRightShutter => {
                let update = match (role, self.touch1_shutter) {
                    (TouchRole::Touch1, ShutterSide::Left) => {
                        self.set_left_shutter(coords.x, TouchRole::Touch1, end)
                    }
                    (TouchRole::Touch2, ShutterSide::Right) => {
                        self.set_left_shutter(coords.x, TouchRole::Touch2, end)
                    }
                    (TouchRole::Touch1, ShutterSide::Right) => {
                        self.set_right_shutter(coords.x, TouchRole::Touch1, end)
                    }
                    (TouchRole::Touch2, ShutterSide::Left) => {
                        self.set_right_shutter(coords.x, TouchRole::Touch2, end)
                    }
                };
                vec![update]
            }
        }
    }

    fn set_position(&mut self, coords: Point, end: bool) -> GestureUpdate {
        let start = self.touch1.coords();
        let x = (self.committed.x + coords.x - start.x).clamp(-0.5, 0.5);
        let y = (self.committed.y + coords.y - start.y).clamp(-0.5, 0.5);

        if end {
            self.committed.x = x;
            self.committed.y = y;
        }

        GestureUpdate::Position { x, y }
    }

    fn set_size_and_rotation(&mut self, coords: Point, role: TouchRole, end: bool) -> GestureUpdate {
        match role {
            TouchRole::Touch1 => self.touch1.set_coords(coords),
            TouchRole::Touch2 => self.touch2.set_coords(coords),
        }

        let dist = self.touch1.coords().distance(self.touch2.coords());
        let size = (self.committed.size + 3.0 * (dist - self.touch2_dist)).clamp(0.5, 2.0);

        let angle = self.touch1.coords().angle(self.touch2.coords());
        let rotation = round_to_step(self.committed.rotation + angle - self.touch2_angle, DEG_7_5);

        if end {
            self.committed.size = size;
            self.committed.rotation = rotation;
        }

        GestureUpdate::SizeRotation { size, rotation }
    }

    fn set_shutter_incl(&mut self, coords: Point, end: bool) -> GestureUpdate {
        let start = self.touch1.coords();

        // Anchors in the lower half snap to 7.5° steps, anchors in the
        // upper half track smoothly; the y pin keeps atan2 stable near the
        // horizontal axis.
        let incl = if start.y < 0.0 {
            let norm_y = coords.y.min(-0.125);
            let angle = norm_y.atan2(coords.x);
            self.committed.shutter_incl + angle - self.touch1_angle
        } else {
            let norm_y = coords.y.max(0.125);
            let angle = norm_y.atan2(coords.x);
            round_to_step(
                self.committed.shutter_incl + angle - self.touch1_angle,
                DEG_7_5,
            )
        };

        let incl = incl.clamp(-DEG_45, DEG_45);

        if end {
            self.committed.shutter_incl = incl;
        }

        GestureUpdate::ShutterIncl(incl)
    }

    fn anchor_x(&self, role: TouchRole) -> f64 {
        match role {
            TouchRole::Touch1 => self.touch1.coords().x,
            TouchRole::Touch2 => self.touch2.coords().x,
        }
    }

    fn set_left_shutter(&mut self, x: f64, anchor: TouchRole, end: bool) -> GestureUpdate {
        let start = self.anchor_x(anchor);
        let dist = (self.committed.left_shutter - 6.0 * (x - start) / self.committed.size)
            .clamp(0.0, SHUTTER_MAX);

        if end {
            self.committed.left_shutter = dist;
        }

        GestureUpdate::LeftShutter(dist)
    }

    fn set_right_shutter(&mut self, x: f64, anchor: TouchRole, end: bool) -> GestureUpdate {
        let start = self.anchor_x(anchor);
        let dist = (self.committed.right_shutter + 6.0 * (x - start) / self.committed.size)
            .clamp(0.0, SHUTTER_MAX);

        if end {
            self.committed.right_shutter = dist;
        }

        GestureUpdate::RightShutter(dist)
    }
}
