//! Canvas state: the logical record of what should currently be on screen.
//!
//! This is independent of any surface's pixels. It is written only by the
//! render worker while it applies operations, and may be read by other threads
//! through [`Painter::canvas`](crate::painter::Painter::canvas).

use crate::render::{Color, FracRect, Rect, Surface, SurfaceSize};

/// Width of the figure's main bar, in pixels.
pub const BAR_WIDTH: i32 = 200;
/// Height of the figure's main bar, in pixels.
pub const BAR_HEIGHT: i32 = 50;
/// Width of the extension attached to the left of the bar, in pixels.
pub const EXTENSION_WIDTH: i32 = 50;
/// Height of the extension attached to the left of the bar, in pixels.
pub const EXTENSION_HEIGHT: i32 = 200;

/// Colour every figure is drawn in.
pub const FIGURE_COLOR: Color = Color::BLUE;

/// A composite figure centred at a fractional position of the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Figure {
    pub x: f64,
    pub y: f64,
}

impl Figure {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Pixel rectangles of the figure on a surface of `size`: the main bar
    /// first, then the extension to its left.
    pub fn rects(&self, size: SurfaceSize) -> [Rect; 2] {
        let cx = (size.width as f64 * self.x) as i32;
        let cy = (size.height as f64 * self.y) as i32;

        // Far off-canvas centres saturate; the surface clips whatever is left.
        let bar = Rect::new(
            cx.saturating_sub(BAR_WIDTH / 2),
            cy.saturating_sub(BAR_HEIGHT / 2),
            cx.saturating_add(BAR_WIDTH / 2),
            cy.saturating_add(BAR_HEIGHT / 2),
        );
        let extension = Rect::new(
            bar.x0.saturating_sub(EXTENSION_WIDTH),
            cy.saturating_sub(EXTENSION_HEIGHT / 2),
            bar.x0,
            cy.saturating_add(EXTENSION_HEIGHT / 2),
        );
        [bar, extension]
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for rect in self.rects(surface.size()) {
            surface.fill(rect, FIGURE_COLOR);
        }
    }
}

/// A solid rectangle drawn over the background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundRect {
    pub rect: FracRect,
    pub color: Color,
}

impl BackgroundRect {
    pub fn draw(&self, surface: &mut dyn Surface) {
        let rect = self.rect.to_pixels(surface.size());
        surface.fill(rect, self.color);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasState {
    /// Colour the whole canvas is cleared to.
    pub background: Color,
    /// Rectangle drawn on top of the background, if any.
    pub bg_rect: Option<BackgroundRect>,
    /// Figures in the order they were placed.
    pub figures: Vec<Figure>,
}

impl CanvasState {
    pub fn new(background: Color) -> Self {
        Self { background, bg_rect: None, figures: Vec::new() }
    }

    /// Forgets the background rectangle and every figure. The background colour stays.
    pub fn clear(&mut self) {
        self.bg_rect = None;
        self.figures.clear();
    }

    /// Shifts every figure by `(dx, dy)` fractions of the surface.
    pub fn translate_figures(&mut self, dx: f64, dy: f64) {
        for fig in self.figures.iter_mut() {
            fig.x += dx;
            fig.y += dy;
        }
    }

    /// Repaints `surface` from scratch: background, background rectangle, then figures.
    pub fn paint(&self, surface: &mut dyn Surface) {
        let bounds = surface.bounds();
        surface.fill(bounds, self.background);
        if let Some(bg_rect) = &self.bg_rect {
            bg_rect.draw(surface);
        }
        for fig in &self.figures {
            fig.draw(surface);
        }
    }
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}
