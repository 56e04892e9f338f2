//! Display sinks: where published frames go.
//!
//! The render loop calls [`DisplaySink::present`] from its worker thread every
//! time an operation reports a frame boundary. The sink gets the surface by
//! shared reference for the duration of the call only; it may read or copy
//! the pixels but can never draw onto them. The call is fire-and-forget: the
//! loop does not wait for the host to actually show the frame.

use crate::render::backend::{RgbaImage, Surface};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// A fully composed surface handed to the display sink.
pub struct Frame<'a> {
    /// Sequence number of the published frame, starting at 1.
    pub id: u64,
    /// Which of the two buffers this surface is (0 or 1).
    pub slot: usize,
    /// The published surface. Read-only for the sink.
    pub surface: &'a dyn Surface,
}

impl std::fmt::Debug for Frame<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("id", &self.id)
            .field("slot", &self.slot)
            .field("size", &self.surface.size())
            .finish()
    }
}

/// Receiver of published frames. Runs on the render worker thread.
pub trait DisplaySink: Send {
    fn present(&mut self, frame: &Frame<'_>);
}

impl<F> DisplaySink for F
where
    F: FnMut(&Frame<'_>) + Send,
{
    fn present(&mut self, frame: &Frame<'_>) {
        self(frame)
    }
}

/// Snapshot of a published frame, as sent by [`ChannelSink`].
#[derive(Debug, Clone)]
pub struct PresentedFrame {
    pub id: u64,
    pub slot: usize,
    pub image: RgbaImage,
}

/// Copies every published frame and forwards it over a tokio channel, so an
/// async host (or another thread) can pick frames up at its own pace.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<PresentedFrame>,
}

impl ChannelSink {
    /// Creates the sink together with the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PresentedFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl DisplaySink for ChannelSink {
    fn present(&mut self, frame: &Frame<'_>) {
        let image = match frame.surface.snapshot() {
            Ok(image) => image,
            Err(e) => {
                log::warn!("ChannelSink: cannot snapshot frame {}: {}", frame.id, e);
                return;
            }
        };

        if self.tx.send(PresentedFrame { id: frame.id, slot: frame.slot, image }).is_err() {
            log::debug!("ChannelSink: receiver dropped, frame {} discarded", frame.id);
        }
    }
}

/// Writes every published frame as `<prefix>-<id>.png` into a directory.
pub struct PngSink {
    dir: PathBuf,
    prefix: String,
    written: Vec<PathBuf>,
}

impl PngSink {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into(), prefix: "frame".to_string(), written: Vec::new() }
    }

    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Files written so far, in publish order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write_frame(&self, frame: &Frame<'_>) -> Result<PathBuf> {
        let path = self.dir.join(format!("{}-{:05}.png", self.prefix, frame.id));
        let image = frame.surface.snapshot()?;
        let file = File::create(&path).with_context(|| format!("cannot create {}", path.display()))?;
        image.write_png(BufWriter::new(file))?;
        Ok(path)
    }
}

impl DisplaySink for PngSink {
    fn present(&mut self, frame: &Frame<'_>) {
        match self.write_frame(frame) {
            Ok(path) => {
                log::debug!("PngSink: wrote frame {} to {}", frame.id, path.display());
                self.written.push(path);
            }
            Err(e) => log::error!("PngSink: cannot write frame {}: {:#}", frame.id, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::software::SoftwareSurface;
    use crate::render::{Color, SurfaceSize};

    fn surface() -> SoftwareSurface {
        let mut s = SoftwareSurface::new(SurfaceSize { width: 4, height: 4 });
        let bounds = s.bounds();
        s.fill(bounds, Color::GREEN);
        s
    }

    #[test]
    fn closures_are_sinks() {
        let s = surface();
        let mut seen = Vec::new();
        {
            let mut sink = |f: &Frame<'_>| seen.push((f.id, f.slot));
            sink.present(&Frame { id: 7, slot: 1, surface: &s });
        }
        assert_eq!(seen, vec![(7, 1)]);
    }

    #[tokio::test]
    async fn channel_sink_forwards_snapshots() {
        let (mut sink, mut rx) = ChannelSink::new();
        let s = surface();
        sink.present(&Frame { id: 1, slot: 0, surface: &s });

        let frame = rx.recv().await.unwrap();
        assert_eq!(frame.id, 1);
        assert_eq!(frame.slot, 0);
        assert_eq!(frame.image.pixel(3, 3), Some(Color::GREEN));
    }

    #[test]
    fn channel_sink_survives_dropped_receiver() {
        let (mut sink, rx) = ChannelSink::new();
        drop(rx);
        let s = surface();
        sink.present(&Frame { id: 1, slot: 0, surface: &s });
    }

    #[test]
    fn png_sink_writes_numbered_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = PngSink::new(dir.path()).with_prefix("test");
        let s = surface();

        sink.present(&Frame { id: 1, slot: 0, surface: &s });
        sink.present(&Frame { id: 2, slot: 1, surface: &s });

        assert_eq!(sink.written().len(), 2);
        assert!(dir.path().join("test-00001.png").exists());
        assert!(dir.path().join("test-00002.png").exists());
    }

    #[test]
    fn png_sink_logs_and_skips_unwritable_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = PngSink::new(dir.path().join("missing"));
        let s = surface();
        sink.present(&Frame { id: 1, slot: 0, surface: &s });
        assert!(sink.written().is_empty());
    }
}
