//! Drives a render loop with the software backend and writes every published
//! frame as a PNG file.
//!
//! ```text
//! RUST_LOG=debug cargo run --example painter -- ./frames
//! ```

use gosub_painter::painter::{Operation, Painter};
use gosub_painter::render::backends::software::SoftwareBackend;
use gosub_painter::render::sink::PngSink;
use gosub_painter::render::{Color, FracRect};
use gosub_painter::PainterConfig;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let out_dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("painter-frames"));
    std::fs::create_dir_all(&out_dir)?;

    let config = PainterConfig::builder()
        .background(Color::rgb(0x20, 0x20, 0x20))
        .build()?;

    let mut painter = Painter::new(Some(config));
    let handle = painter.start(Box::new(SoftwareBackend::new()), Box::new(PngSink::new(&out_dir)))?;

    // Frame 1: green canvas with a black rectangle and one figure, batched.
    handle.post(
        vec![
            Operation::green_fill(),
            Operation::Fill { rect: FracRect::new(0.25, 0.25, 0.75, 0.75), color: Color::BLACK },
            Operation::Figure { x: 0.5, y: 0.5 },
            Operation::Update,
        ]
        .into(),
    );

    // Frame 2: two more figures, published by a lone marker.
    handle.post(Operation::Figure { x: 0.3, y: 0.3 });
    handle.post(Operation::Figure { x: 0.8, y: 0.8 });
    handle.post(Operation::Update);

    // Frame 3: move everything and change the background.
    handle.post(Operation::SetBackground(Color::WHITE));
    handle.post(Operation::Move { dx: -0.1, dy: 0.05 });
    handle.post(Operation::Update);

    // Frame 4: reset publishes on its own.
    handle.post(Operation::Reset);

    // Stop discards whatever is still queued, so wait until the worker catches up.
    handle.fence().blocking_recv()?;

    let canvas = painter.canvas();
    let discarded = painter.stop_and_wait()?;
    println!(
        "published {} frame(s) into {} ({} discarded), canvas now has {} figure(s)",
        painter.frames_presented(),
        out_dir.display(),
        discarded,
        canvas.figures.len()
    );

    Ok(())
}
