use crate::render::backend::{PixelFormat, RenderBackend, RgbaImage, Surface, SurfaceSize};
use crate::render::{Color, Rect};
use anyhow::Result;
use std::any::Any;

/// Cairo backend for rendering using cairo graphics library.
pub struct CairoBackend;

impl CairoBackend {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for CairoBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for CairoBackend {
    fn name(&self) -> &str {
        "CairoBackend"
    }

    /// Will create a new Cairo image surface with the given size.
    fn create_surface(&self, size: SurfaceSize) -> Result<Box<dyn Surface>> {
        Ok(Box::new(CairoSurface::new(size)?))
    }
}

pub struct CairoSurface {
    surface: cairo::ImageSurface,
    size: SurfaceSize,
}

impl CairoSurface {
    fn new(size: SurfaceSize) -> Result<Self> {
        let surface = cairo::ImageSurface::create(
            cairo::Format::ARgb32,
            i32::try_from(size.width)?,
            i32::try_from(size.height)?,
        )?;

        Ok(Self { surface, size })
    }

    #[inline]
    pub fn ctx(&self) -> Result<cairo::Context> {
        Ok(cairo::Context::new(&self.surface)?)
    }

    #[inline]
    pub fn stride(&self) -> i32 {
        self.surface.stride()
    }

    /// The underlying cairo surface, e.g. for painting it onto a window.
    /// Callers must not draw onto it.
    pub fn image_surface(&self) -> &cairo::ImageSurface {
        &self.surface
    }

    fn try_fill(&self, rect: Rect, color: Color) -> Result<()> {
        let cr = self.ctx()?;
        let (r, g, b, a) = color.to_f64();

        // Source, not Over: a fill replaces the pixels underneath
        cr.set_operator(cairo::Operator::Source);
        cr.set_source_rgba(r, g, b, a);
        cr.rectangle(rect.x0 as f64, rect.y0 as f64, rect.width() as f64, rect.height() as f64);
        cr.fill()?;
        Ok(())
    }
}

impl Surface for CairoSurface {
    fn as_any(&self) -> &dyn Any { self }
    fn as_any_mut(&mut self) -> &mut dyn Any { self }
    fn size(&self) -> SurfaceSize { self.size }

    fn fill(&mut self, rect: Rect, color: Color) {
        let rect = rect.intersect(&self.bounds());
        if rect.is_empty() {
            return;
        }
        if let Err(e) = self.try_fill(rect, color) {
            log::error!("CairoSurface: fill of {:?} failed: {}", rect, e);
        }
    }

    fn snapshot(&self) -> Result<RgbaImage> {
        self.surface.flush();

        let mut pixels = Vec::new();
        self.surface.with_data(|data| pixels.extend_from_slice(data))?;

        RgbaImage::from_raw(
            pixels,
            self.size.width,
            self.size.height,
            self.stride() as u32,
            PixelFormat::PreMulArgb32,
        )
    }
}
