//! Drawing operations.
//!
//! An [`Operation`] is an immutable command. The render worker applies it to
//! its working surface with [`Operation::apply`], which returns `true` when the
//! operation marks a frame boundary, meaning the working surface is complete
//! and should be published.
//!
//! | Operation        | Canvas state                        | Frame boundary |
//! |------------------|-------------------------------------|----------------|
//! | `Fill`           | records the background rectangle    | no             |
//! | `Figure`         | appends a figure                    | no             |
//! | `Reset`          | clears rectangle and figures        | yes            |
//! | `Update`         | -                                   | yes            |
//! | `Raw`            | -                                   | no             |
//! | `List`           | each sub-operation in order         | if any is      |
//! | `Move`           | translates every figure, repaints   | no             |
//! | `SetBackground`  | sets background colour, repaints    | no             |
//!
//! # Example
//!
//! Batching several draws into one published frame:
//!
//! ```rust
//! use gosub_painter::painter::Operation;
//! use gosub_painter::render::{Color, FracRect};
//!
//! let frame = Operation::List(vec![
//!     Operation::Reset,
//!     Operation::Fill { rect: FracRect::new(0.25, 0.25, 0.75, 0.75), color: Color::WHITE },
//!     Operation::Figure { x: 0.5, y: 0.5 },
//!     Operation::Update,
//! ]);
//! assert!(frame.is_boundary());
//! ```

use crate::painter::canvas::{BackgroundRect, CanvasState, Figure};
use crate::render::{Color, FracRect, Surface};
use std::fmt;
use std::sync::Arc;

/// User supplied drawing action. It runs on the render worker thread.
///
/// A panic inside the action is not caught: it takes the render worker down,
/// and surfaces as [`PainterError::WorkerPanicked`](crate::errors::PainterError::WorkerPanicked)
/// when the loop is stopped.
#[derive(Clone)]
pub struct RawDraw(Arc<dyn Fn(&mut dyn Surface) + Send + Sync>);

impl RawDraw {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut dyn Surface) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, surface: &mut dyn Surface) {
        (self.0)(surface)
    }
}

impl fmt::Debug for RawDraw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawDraw(..)")
    }
}

#[derive(Clone, Debug)]
pub enum Operation {
    /// Fill a rectangle given in fractions of the surface size.
    Fill { rect: FracRect, color: Color },
    /// Draw the composite figure centred at `(x, y)`, in fractions of the surface size.
    Figure { x: f64, y: f64 },
    /// Clear the surface to the background colour and forget every figure.
    Reset,
    /// Publish the working surface as it is.
    Update,
    /// Run a user supplied drawing action.
    Raw(RawDraw),
    /// Apply every operation in order.
    List(Vec<Operation>),
    /// Translate every figure by `(dx, dy)` fractions and repaint from canvas state.
    Move { dx: f64, dy: f64 },
    /// Change the background colour and repaint from canvas state.
    SetBackground(Color),
}

impl Operation {
    pub fn raw<F>(f: F) -> Self
    where
        F: Fn(&mut dyn Surface) + Send + Sync + 'static,
    {
        Operation::Raw(RawDraw::new(f))
    }

    /// Raw action filling the whole surface with white.
    pub fn white_fill() -> Self {
        Self::raw(|s| {
            let bounds = s.bounds();
            s.fill(bounds, Color::WHITE);
        })
    }

    /// Raw action filling the whole surface with pure green.
    pub fn green_fill() -> Self {
        Self::raw(|s| {
            let bounds = s.bounds();
            s.fill(bounds, Color::GREEN);
        })
    }

    /// Applies the operation to `surface`, updating `canvas` along the way.
    ///
    /// Returns `true` when the operation marks a frame boundary. A list reports
    /// a boundary when any of its members does; every member is applied either way.
    pub fn apply(&self, surface: &mut dyn Surface, canvas: &mut CanvasState) -> bool {
        match self {
            Operation::Fill { rect, color } => {
                let bg_rect = BackgroundRect { rect: *rect, color: *color };
                bg_rect.draw(surface);
                canvas.bg_rect = Some(bg_rect);
                false
            }
            Operation::Figure { x, y } => {
                let fig = Figure::new(*x, *y);
                fig.draw(surface);
                canvas.figures.push(fig);
                false
            }
            Operation::Reset => {
                canvas.clear();
                let bounds = surface.bounds();
                surface.fill(bounds, canvas.background);
                true
            }
            Operation::Update => true,
            Operation::Raw(action) => {
                action.call(surface);
                false
            }
            Operation::List(ops) => {
                let mut ready = false;
                for op in ops {
                    ready |= op.apply(surface, canvas);
                }
                ready
            }
            Operation::Move { dx, dy } => {
                canvas.translate_figures(*dx, *dy);
                canvas.paint(surface);
                false
            }
            Operation::SetBackground(color) => {
                canvas.background = *color;
                canvas.paint(surface);
                false
            }
        }
    }

    /// Whether applying this operation marks a frame boundary, without applying it.
    pub fn is_boundary(&self) -> bool {
        match self {
            Operation::Reset | Operation::Update => true,
            Operation::List(ops) => ops.iter().any(Operation::is_boundary),
            _ => false,
        }
    }
}

impl From<Vec<Operation>> for Operation {
    fn from(ops: Vec<Operation>) -> Self {
        Operation::List(ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painter::canvas::FIGURE_COLOR;
    use crate::render::backends::software::SoftwareSurface;
    use crate::render::{Rect, SurfaceSize};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SIZE: SurfaceSize = SurfaceSize { width: 800, height: 800 };

    fn setup() -> (SoftwareSurface, CanvasState) {
        (SoftwareSurface::new(SIZE), CanvasState::default())
    }

    fn image(s: &SoftwareSurface) -> crate::render::RgbaImage {
        s.snapshot().unwrap()
    }

    #[test]
    fn fill_uses_fractional_rect() {
        let (mut s, mut canvas) = setup();
        let op = Operation::Fill { rect: FracRect::new(0.25, 0.25, 0.5, 0.75), color: Color::WHITE };

        assert!(!op.apply(&mut s, &mut canvas));
        let img = image(&s);
        assert!(img.region_is(Rect::new(200, 200, 400, 600), Color::WHITE));
        assert_eq!(img.pixel(199, 200), Some(Color::TRANSPARENT));
        assert_eq!(img.pixel(400, 200), Some(Color::TRANSPARENT));
        assert!(canvas.bg_rect.is_some());
    }

    #[test]
    fn figure_placement_is_exact() {
        let (mut s, mut canvas) = setup();
        assert!(!Operation::Figure { x: 0.5, y: 0.5 }.apply(&mut s, &mut canvas));

        let bar = Rect::new(300, 375, 500, 425);
        let ext = Rect::new(250, 300, 300, 500);
        let img = image(&s);
        assert!(img.region_is(bar, FIGURE_COLOR));
        assert!(img.region_is(ext, FIGURE_COLOR));

        // every other pixel is untouched
        for y in 0..800 {
            for x in 0..800 {
                if !bar.contains(x, y) && !ext.contains(x, y) {
                    assert_eq!(img.pixel(x as u32, y as u32), Some(Color::TRANSPARENT), "pixel {x},{y}");
                }
            }
        }
        assert_eq!(canvas.figures, vec![Figure::new(0.5, 0.5)]);
    }

    #[test]
    fn reset_fills_background_from_any_state() {
        let (mut s, mut canvas) = setup();
        canvas.background = Color::GREEN;
        Operation::white_fill().apply(&mut s, &mut canvas);
        Operation::Figure { x: 0.1, y: 0.9 }.apply(&mut s, &mut canvas);

        assert!(Operation::Reset.apply(&mut s, &mut canvas));
        let bounds = s.bounds();
        assert!(image(&s).region_is(bounds, Color::GREEN));
        assert!(canvas.figures.is_empty());

        // and again, same result
        assert!(Operation::Reset.apply(&mut s, &mut canvas));
        assert!(image(&s).region_is(bounds, Color::GREEN));
    }

    #[test]
    fn update_has_no_pixel_effect() {
        let (mut s, mut canvas) = setup();
        let before = image(&s);
        assert!(Operation::Update.apply(&mut s, &mut canvas));
        assert_eq!(image(&s), before);
        assert_eq!(canvas, CanvasState::default());
    }

    #[test]
    fn list_ors_boundaries_and_applies_everything() {
        let (mut s, mut canvas) = setup();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = {
            let calls = calls.clone();
            Operation::raw(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };

        // boundary in the middle, not last: still a boundary, and the tail still runs
        let list = Operation::List(vec![counter.clone(), Operation::Update, counter.clone()]);
        assert!(list.is_boundary());
        assert!(list.apply(&mut s, &mut canvas));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let no_boundary = Operation::List(vec![counter.clone(), Operation::Figure { x: 0.5, y: 0.5 }]);
        assert!(!no_boundary.is_boundary());
        assert!(!no_boundary.apply(&mut s, &mut canvas));
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        assert!(!Operation::List(Vec::new()).apply(&mut s, &mut canvas));
    }

    #[test]
    fn move_translates_and_repaints() {
        let (mut s, mut canvas) = setup();
        Operation::Figure { x: 0.5, y: 0.5 }.apply(&mut s, &mut canvas);

        assert!(!Operation::Move { dx: -0.25, dy: 0.0 }.apply(&mut s, &mut canvas));
        assert_eq!(canvas.figures, vec![Figure::new(0.25, 0.5)]);

        let img = image(&s);
        // old position repainted with the background
        assert_eq!(img.pixel(450, 400), Some(Color::BLACK));
        // new bar spans x 100..300
        assert!(img.region_is(Rect::new(100, 375, 300, 425), FIGURE_COLOR));
    }

    #[test]
    fn set_background_repaints_scene() {
        let (mut s, mut canvas) = setup();
        Operation::Figure { x: 0.5, y: 0.5 }.apply(&mut s, &mut canvas);
        assert!(!Operation::SetBackground(Color::WHITE).apply(&mut s, &mut canvas));

        let img = image(&s);
        assert_eq!(canvas.background, Color::WHITE);
        assert_eq!(img.pixel(0, 0), Some(Color::WHITE));
        assert_eq!(img.pixel(400, 400), Some(FIGURE_COLOR));
    }

    #[test]
    fn off_canvas_geometry_is_clipped() {
        let (mut s, mut canvas) = setup();
        let before = image(&s);

        assert!(!Operation::Figure { x: 1.0e10, y: 0.5 }.apply(&mut s, &mut canvas));
        assert!(!Operation::Figure { x: -1.0e10, y: -1.0e10 }.apply(&mut s, &mut canvas));
        assert_eq!(image(&s), before);

        // repeated moves push a visible figure far past the edge
        Operation::Figure { x: 0.5, y: 0.5 }.apply(&mut s, &mut canvas);
        for _ in 0..4 {
            assert!(!Operation::Move { dx: 1.0e10, dy: 0.0 }.apply(&mut s, &mut canvas));
        }
        let bounds = s.bounds();
        assert!(image(&s).region_is(bounds, Color::BLACK));

        let huge = Operation::Fill { rect: FracRect::new(-1.0e10, 0.0, 1.0e10, 1.0), color: Color::GREEN };
        assert!(!huge.apply(&mut s, &mut canvas));
        assert!(image(&s).region_is(bounds, Color::GREEN));
    }

    #[test]
    fn stock_fills() {
        let (mut s, mut canvas) = setup();
        let bounds = s.bounds();
        assert!(!Operation::green_fill().apply(&mut s, &mut canvas));
        assert!(image(&s).region_is(bounds, Color::GREEN));
        assert!(!Operation::white_fill().apply(&mut s, &mut canvas));
        assert!(image(&s).region_is(bounds, Color::WHITE));
    }

    #[test]
    fn raw_draw_debug_is_opaque() {
        assert_eq!(format!("{:?}", Operation::white_fill()), "Raw(RawDraw(..))");
    }
}
