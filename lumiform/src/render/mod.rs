mod canvas;
mod recording;

pub use canvas::{BlendMode, Canvas, Renderable};
pub use recording::{DrawOp, Recorded, RecordingCanvas};
