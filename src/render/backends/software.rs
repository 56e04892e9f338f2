use crate::render::backend::{PixelFormat, RenderBackend, RgbaImage, Surface, SurfaceSize};
use crate::render::{Color, Rect};
use anyhow::{anyhow, Result};
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};

/// CPU backend that keeps every surface as a plain RGBA8 buffer.
///
/// An optional byte budget makes allocation fail once the surfaces created by
/// this backend would need more memory than allowed.
pub struct SoftwareBackend {
    budget: Option<usize>,
    allocated: AtomicUsize,
}

impl SoftwareBackend {
    /// Creates a backend without an allocation limit.
    pub fn new() -> Self {
        Self { budget: None, allocated: AtomicUsize::new(0) }
    }

    /// Creates a backend that refuses to allocate more than `bytes` in total.
    pub fn with_budget(bytes: usize) -> Self {
        Self { budget: Some(bytes), allocated: AtomicUsize::new(0) }
    }

    /// Total bytes handed out so far.
    pub fn allocated(&self) -> usize {
        self.allocated.load(Ordering::Relaxed)
    }
}

impl Default for SoftwareBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for SoftwareBackend {
    fn name(&self) -> &str {
        "SoftwareBackend"
    }

    fn create_surface(&self, size: SurfaceSize) -> Result<Box<dyn Surface>> {
        let bytes = (size.width as usize)
            .checked_mul(size.height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or_else(|| anyhow!("surface {}x{} overflows", size.width, size.height))?;

        if let Some(budget) = self.budget {
            let used = self.allocated.load(Ordering::Relaxed);
            if used.saturating_add(bytes) > budget {
                return Err(anyhow!(
                    "out of surface memory: {bytes} bytes requested, {} of {budget} available",
                    budget.saturating_sub(used)
                ));
            }
        }
        self.allocated.fetch_add(bytes, Ordering::Relaxed);

        Ok(Box::new(SoftwareSurface::new(size)))
    }
}

pub struct SoftwareSurface {
    /// Size of the surface in pixels.
    size: SurfaceSize,
    /// RGBA8 pixels, row after row, without padding.
    pixels: Vec<u8>,
}

impl SoftwareSurface {
    /// Creates a fully transparent surface.
    pub fn new(size: SurfaceSize) -> Self {
        let len = (size.width as usize) * (size.height as usize) * 4;
        Self { size, pixels: vec![0u8; len] }
    }

    #[inline]
    pub fn stride(&self) -> u32 {
        self.size.width * 4
    }

    /// Cheap read-only borrow of the pixels (no copy).
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let off = (y as usize * self.size.width as usize + x as usize) * 4;
        let px: [u8; 4] = self.pixels[off..off + 4].try_into().ok()?;
        Some(Color::from(px))
    }
}

impl Surface for SoftwareSurface {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn fill(&mut self, rect: Rect, color: Color) {
        let r = rect.intersect(&self.bounds());
        if r.is_empty() {
            return;
        }

        let px = color.to_rgba8();
        let stride = self.stride() as usize;
        for y in r.y0 as usize..r.y1 as usize {
            let row = &mut self.pixels[y * stride..(y + 1) * stride];
            for chunk in row[r.x0 as usize * 4..r.x1 as usize * 4].chunks_exact_mut(4) {
                chunk.copy_from_slice(&px);
            }
        }
    }

    fn snapshot(&self) -> Result<RgbaImage> {
        RgbaImage::from_raw(
            self.pixels.clone(),
            self.size.width,
            self.size.height,
            self.stride(),
            PixelFormat::Rgba8,
        )
    }
}
