//! Lumiform - the optical compositing and gesture engine behind a shared
//! light-and-shutter installation.
//!
//! Handheld controllers each own a colored light or a shaped aperture
//! ("form") and broadcast authoritative state updates; a display process
//! mirrors every entity and composites the simulated optics every frame.
//! Network transport, touch capture and the pixel surface are external;
//! this crate provides the entities, the gesture interpreter, the
//! compositor and the interfaces they meet the outside world on.

pub mod color;
pub mod controller;
pub mod display;
pub mod form;
pub mod gesture;
pub mod input;
pub mod light;
pub mod math;
pub mod messages;
pub mod params;
pub mod render;

pub use crate::color::Color;
pub use crate::controller::{FormController, LightController};
pub use crate::display::Display;
pub use crate::form::{Form, FormShape, ShutterSide};
pub use crate::gesture::{
    FormBaseline, GestureInterpreter, GestureUpdate, InteractionMode, TouchId,
};
pub use crate::input::{TouchEvent, TouchEventKind, TouchSurface};
pub use crate::light::Light;
pub use crate::math::{round_to_step, Point, Viewport};
pub use crate::messages::{ControllerId, Message};
pub use crate::params::{ParamUpdate, PlayingMode, SharedParams};
pub use crate::render::{BlendMode, Canvas, DrawOp, Recorded, RecordingCanvas, Renderable};
