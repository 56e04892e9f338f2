use crate::render::{Color, Rect};
use anyhow::{anyhow, Result};
use std::any::Any;
use std::io::Write;

/// Size of a surface in pixels. It's a simple struct to hold width and height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceSize { pub width: u32, pub height: u32 }

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// Straight RGBA, one byte per channel, in memory order R, G, B, A.
    Rgba8,
    /// Cairo's native-endian premultiplied ARGB32.
    PreMulArgb32,
}

/// CPU copy of a surface's pixels.
#[derive(Clone, PartialEq)]
pub struct RgbaImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub format: PixelFormat,
}

impl RgbaImage {
    pub fn from_raw(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        stride: u32,
        format: PixelFormat,
    ) -> Result<Self> {
        if stride < width.saturating_mul(4) {
            return Err(anyhow!("stride {stride} too small for width {width}"));
        }
        if pixels.len() < (height as usize) * (stride as usize) {
            return Err(anyhow!("pixel buffer too small for image dimensions"));
        }

        Ok(Self {
            pixels,
            width,
            height,
            stride,
            format,
        })
    }

    /// Reads a single pixel as a straight (non premultiplied) colour.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let off = (y as usize) * (self.stride as usize) + (x as usize) * 4;
        let px: [u8; 4] = self.pixels.get(off..off + 4)?.try_into().ok()?;

        Some(match self.format {
            PixelFormat::Rgba8 => Color::from(px),
            PixelFormat::PreMulArgb32 => {
                let argb = u32::from_ne_bytes(px);
                let a = (argb >> 24) as u8;
                let unmul = |c: u32| -> u8 {
                    if a == 0 {
                        0
                    } else {
                        (((c & 0xff) * 255 + (a as u32) / 2) / a as u32).min(255) as u8
                    }
                };
                Color::new(unmul(argb >> 16), unmul(argb >> 8), unmul(argb), a)
            }
        })
    }

    /// Returns true when every pixel inside `rect` (clipped to the image) has `color`.
    pub fn region_is(&self, rect: Rect, color: Color) -> bool {
        let r = rect.intersect(&Rect::from_size(SurfaceSize { width: self.width, height: self.height }));
        (r.y0..r.y1).all(|y| (r.x0..r.x1).all(|x| self.pixel(x as u32, y as u32) == Some(color)))
    }

    /// Encodes the image as an 8-bit RGBA PNG.
    pub fn write_png<W: Write>(&self, w: W) -> Result<()> {
        let mut encoder = png::Encoder::new(w, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;

        let mut data = Vec::with_capacity((self.width as usize) * (self.height as usize) * 4);
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.pixel(x, y).unwrap_or(Color::TRANSPARENT);
                data.extend_from_slice(&c.to_rgba8());
            }
        }
        writer.write_image_data(&data)?;
        writer.finish()?;
        Ok(())
    }
}

impl std::fmt::Debug for RgbaImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RgbaImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("len", &self.pixels.len())
            .finish()
    }
}

/// A fixed-size, mutable pixel buffer.
///
/// This is the raster collaborator of the painter: operations draw by filling
/// rectangles, and nothing else. Surfaces live on the render worker thread,
/// so they don't need to be `Send`.
pub trait Surface: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn size(&self) -> SurfaceSize;

    /// The rectangle covering the whole surface.
    fn bounds(&self) -> Rect {
        Rect::from_size(self.size())
    }

    /// Fills `rect` (absolute pixels) with `color`, replacing what was there.
    /// The rectangle is clipped to the surface bounds.
    fn fill(&mut self, rect: Rect, color: Color);

    /// Copies the current pixels out of the surface.
    fn snapshot(&self) -> Result<RgbaImage>;
}

/// Surface allocator. Implementations must be movable to the render worker thread,
/// which is where `create_surface` is called.
pub trait RenderBackend: Send {
    fn name(&self) -> &str;

    /// Create a new blank surface with the given size.
    fn create_surface(&self, size: SurfaceSize) -> Result<Box<dyn Surface>>;
}
