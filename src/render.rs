//! Rendering collaborators used by the painter core.
//!
//! The render loop only needs three things from the outside world: a way to
//! allocate a blank [`Surface`](backend::Surface) of a fixed size
//! ([`RenderBackend`](backend::RenderBackend)), a way to fill a rectangle of
//! that surface with a colour ([`Surface::fill`](backend::Surface::fill)), and
//! somewhere to hand finished frames to ([`DisplaySink`](sink::DisplaySink)).

pub mod backend;

/// Rendering backends for the painter.
pub mod backends {
    /// Cairo rendering backend
    #[cfg(feature = "backend_cairo")]
    pub mod cairo;
    /// CPU rendering backend writing plain RGBA8 pixels
    pub mod software;
}

mod color;
mod geometry;
pub mod sink;

pub use backend::{PixelFormat, RenderBackend, RgbaImage, Surface, SurfaceSize};
pub use color::Color;
pub use geometry::{FracRect, Rect};
pub use sink::{DisplaySink, Frame};
