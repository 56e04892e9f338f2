//! The painter core: a work queue feeding a double-buffered render loop.

pub mod canvas;
pub mod op;
pub mod queue;
pub mod render_loop;

pub use canvas::{BackgroundRect, CanvasState, Figure};
pub use op::{Operation, RawDraw};
pub use queue::WorkQueue;
pub use render_loop::{LoopState, Painter, PainterHandle};
