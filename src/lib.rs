//! Gosub painter: an ordered, double-buffered render pipeline.
//!
//! Client code posts drawing [`Operation`]s to a [`Painter`]. A dedicated
//! worker applies them, in order, to an off-screen surface; whenever an
//! operation marks a frame boundary the surface is handed to a
//! [`DisplaySink`](render::DisplaySink) and the two surfaces swap roles.
//!
//! Surfaces come from a [`RenderBackend`](render::RenderBackend). The crate
//! ships a CPU backend ([`render::backends::software`]) and, behind the
//! `backend_cairo` feature, a cairo backend.

pub mod config;
pub mod errors;
pub mod painter;
pub mod render;

pub use config::{ConfigError, PainterConfig};
pub use errors::PainterError;
pub use painter::{CanvasState, LoopState, Operation, Painter, PainterHandle};
