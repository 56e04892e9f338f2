//! Painter configuration.
//!
//! `PainterConfig` controls the fixed properties of a [`Painter`](crate::painter::Painter)
//! render loop: the size of the two surfaces it renders into, the initial background
//! colour of the canvas, and the name given to the render worker thread.
//!
//! The configuration provides sensible defaults via [`Default`] and a fluent
//! [`PainterConfig::builder()`] for customization with validation.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use gosub_painter::config::PainterConfig;
//! let cfg = PainterConfig::default();
//! assert_eq!(cfg.canvas_size.width, 800);
//! assert_eq!(cfg.canvas_size.height, 800);
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use gosub_painter::config::PainterConfig;
//! use gosub_painter::render::Color;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = PainterConfig::builder()
//!     .canvas_size(640, 480)
//!     .background(Color::WHITE)
//!     .worker_name("my-painter")
//!     .build()?; // returns Result<PainterConfig, ConfigError>
//! # Ok(()) }
//! ```
//!
//! # Errors
//!
//! Builder validation returns [`ConfigError`] when the canvas has a zero
//! dimension, when a dimension exceeds [`MAX_CANVAS_DIM`], or when the worker
//! name is empty.

use crate::render::{Color, SurfaceSize};

/// Largest accepted canvas width or height in pixels.
pub const MAX_CANVAS_DIM: u32 = 16_384;

const DEFAULT_WORKER_NAME: &str = "painter-render";

/// Configuration for a single render loop.
#[derive(Debug, Clone, PartialEq)]
pub struct PainterConfig {
    /// Size of both render surfaces. Fixed for the lifetime of a started loop.
    pub canvas_size: SurfaceSize,
    /// Background colour the canvas state starts with.
    pub background: Color,
    /// Name of the render worker thread.
    pub worker_name: String,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self {
            canvas_size: SurfaceSize { width: 800, height: 800 },
            background: Color::BLACK,
            worker_name: DEFAULT_WORKER_NAME.to_string(),
        }
    }
}

impl PainterConfig {
    pub fn builder() -> PainterConfigBuilder {
        PainterConfigBuilder::default()
    }

    /// Checks the configuration without consuming it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self)
    }
}

/// Builder for [`PainterConfig`].
#[derive(Debug, Clone, Default)]
pub struct PainterConfigBuilder {
    inner: PainterConfig,
}

impl PainterConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut PainterConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn canvas_size(self, width: u32, height: u32) -> Self {
        self.map(|c| c.canvas_size = SurfaceSize { width, height })
    }
    pub fn background(self, color: Color) -> Self { self.map(|c| c.background = color) }
    pub fn worker_name<S: Into<String>>(self, name: S) -> Self { self.map(|c| c.worker_name = name.into()) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut PainterConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<PainterConfig, ConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("canvas size {width}x{height} has a zero dimension")]
    ZeroSize { width: u32, height: u32 },
    #[error("canvas size {width}x{height} exceeds the maximum of {max} per side", max = MAX_CANVAS_DIM)]
    TooLarge { width: u32, height: u32 },
    #[error("worker name must not be empty")]
    EmptyWorkerName,
}

fn validate(c: &PainterConfig) -> Result<(), ConfigError> {
    let SurfaceSize { width, height } = c.canvas_size;
    if width == 0 || height == 0 {
        return Err(ConfigError::ZeroSize { width, height });
    }
    if width > MAX_CANVAS_DIM || height > MAX_CANVAS_DIM {
        return Err(ConfigError::TooLarge { width, height });
    }
    if c.worker_name.trim().is_empty() {
        return Err(ConfigError::EmptyWorkerName);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = PainterConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.canvas_size, SurfaceSize { width: 800, height: 800 });
        assert_eq!(cfg.background, Color::BLACK);
        assert_eq!(cfg.worker_name, "painter-render");
    }

    #[test]
    fn builder_applies_values() {
        let cfg = PainterConfig::builder()
            .canvas_size(320, 200)
            .background(Color::GREEN)
            .worker_name("test-worker")
            .build()
            .unwrap();

        assert_eq!(cfg.canvas_size, SurfaceSize { width: 320, height: 200 });
        assert_eq!(cfg.background, Color::GREEN);
        assert_eq!(cfg.worker_name, "test-worker");
    }

    #[test]
    fn builder_with_closure() {
        let cfg = PainterConfig::builder()
            .with(|c| {
                c.canvas_size = SurfaceSize { width: 10, height: 20 };
                c.background = Color::WHITE;
            })
            .build()
            .unwrap();
        assert_eq!(cfg.canvas_size.height, 20);
        assert_eq!(cfg.background, Color::WHITE);
    }

    #[test]
    fn rejects_invalid_values() {
        assert_eq!(
            PainterConfig::builder().canvas_size(0, 10).build(),
            Err(ConfigError::ZeroSize { width: 0, height: 10 })
        );
        assert_eq!(
            PainterConfig::builder().canvas_size(10, MAX_CANVAS_DIM + 1).build(),
            Err(ConfigError::TooLarge { width: 10, height: MAX_CANVAS_DIM + 1 })
        );
        assert_eq!(
            PainterConfig::builder().worker_name("  ").build(),
            Err(ConfigError::EmptyWorkerName)
        );
    }
}
