//! Adapter from winit touch events to normalized touch events.
//!
//! Controllers consume `(id, x, y)` contacts in the viewport's
//! [-0.5, 0.5] space; this module maps winit's pixel-space touches there.

use winit::event::{Touch, TouchPhase};

use crate::math::{Point, Viewport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchEventKind {
    Start,
    Move,
    End,
}

/// A touch contact event in normalized surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchEvent {
    pub id: u64,
    pub kind: TouchEventKind,
    pub coords: Point,
}

/// Maps physical touch input onto the normalized display square.
pub struct TouchSurface {
    viewport: Viewport,
}

impl TouchSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Viewport::new(width, height),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
    }

    /// Builds a normalized event from raw contact data.
    pub fn event(&self, id: u64, phase: TouchPhase, x: f64, y: f64) -> TouchEvent {
        let kind = match phase {
            TouchPhase::Started => TouchEventKind::Start,
            TouchPhase::Moved => TouchEventKind::Move,
            TouchPhase::Ended | TouchPhase::Cancelled => TouchEventKind::End,
        };

        TouchEvent {
            id,
            kind,
            coords: self.viewport.normalize(x, y),
        }
    }

    /// Adapts a winit window touch event.
    pub fn window_event(&self, touch: &Touch) -> TouchEvent {
        self.event(touch.id, touch.phase, touch.location.x, touch.location.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_touch_maps_to_origin() {
        let surface = TouchSurface::new(800.0, 600.0);
        let event = surface.event(1, TouchPhase::Started, 400.0, 300.0);

        assert_eq!(event.kind, TouchEventKind::Start);
        assert_eq!(event.coords, Point::ZERO);
    }

    #[test]
    fn margins_map_outside_the_square() {
        let surface = TouchSurface::new(800.0, 600.0);
        let event = surface.event(1, TouchPhase::Moved, 0.0, 300.0);

        // the letterbox margin lies beyond the square's left edge
        assert!(event.coords.x < -0.5);
        assert_eq!(event.coords.y, 0.0);
    }

    #[test]
    fn cancelled_contacts_end_the_touch() {
        let surface = TouchSurface::new(400.0, 400.0);
        let event = surface.event(2, TouchPhase::Cancelled, 100.0, 100.0);
        assert_eq!(event.kind, TouchEventKind::End);
    }
}
