//! The render loop.
//!
//! A [`Painter`] owns one [`WorkQueue`] of [`Operation`]s and a dedicated
//! worker thread. The worker owns two surfaces and alternates between them:
//! operations are applied to the *working* surface, and whenever an operation
//! reports a frame boundary the working surface is handed to the
//! [`DisplaySink`] and the roles swap, so the next operations draw into the
//! other buffer while the published one stays untouched.
//!
//! ```text
//!  producer ── post(op) ──▶ WorkQueue ── pull ──▶ worker ── apply ──▶ surfaces[active]
//!                                                   │
//!                                         boundary? └─▶ sink.present(surfaces[active]); active ^= 1
//! ```
//!
//! # Example
//!
//! ```rust
//! use gosub_painter::painter::{Operation, Painter};
//! use gosub_painter::render::backends::software::SoftwareBackend;
//! use gosub_painter::render::Frame;
//!
//! let mut painter = Painter::new(None);
//! let handle = painter
//!     .start(Box::new(SoftwareBackend::new()), Box::new(|frame: &Frame<'_>| {
//!         println!("frame {} ready", frame.id);
//!     }))
//!     .unwrap();
//!
//! handle.post(Operation::Reset);
//! handle.post(Operation::Figure { x: 0.5, y: 0.5 });
//! handle.post(Operation::Update);
//!
//! // Stopping discards whatever is still queued, so wait for the worker first.
//! handle.fence().blocking_recv().unwrap();
//! assert_eq!(painter.frames_presented(), 2);
//!
//! painter.stop_and_wait().unwrap();
//! ```

use crate::config::PainterConfig;
use crate::errors::PainterError;
use crate::painter::canvas::CanvasState;
use crate::painter::op::Operation;
use crate::painter::queue::WorkQueue;
use crate::render::{DisplaySink, Frame, RenderBackend, Surface};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::sync::oneshot;

/// Lifecycle of a render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    /// No worker exists. Posted operations are dropped.
    #[default]
    Stopped,
    /// The worker is pulling operations.
    Running,
}

/// Cheap, cloneable producer side of a running [`Painter`].
///
/// Handles can be moved to other threads; posts from several handles are
/// serialized at the queue. A handle outliving the loop it came from keeps
/// working, but everything posted through it is dropped.
#[derive(Clone)]
pub struct PainterHandle {
    queue: Arc<WorkQueue<Operation>>,
}

impl PainterHandle {
    /// Queues `op`. Never blocks.
    pub fn post(&self, op: Operation) {
        self.queue.push(op);
    }

    /// Number of operations waiting to be applied. Diagnostics only.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Posts a marker and returns a receiver that resolves once the worker
    /// reaches it, that is once everything posted before it has been applied
    /// (and published, if it ended a frame).
    ///
    /// The receiver fails if the loop stops before getting there, or if it is
    /// not running at all. Await it from async code, or use `blocking_recv`.
    pub fn fence(&self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        let tx = Mutex::new(Some(tx));
        self.queue.push(Operation::raw(move |_| {
            if let Some(tx) = tx.lock().take() {
                let _ = tx.send(());
            }
        }));
        rx
    }
}

impl std::fmt::Debug for PainterHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PainterHandle").field("pending", &self.pending()).finish()
    }
}

/// Single-consumer render loop with double-buffered surfaces.
pub struct Painter {
    /// Configuration used for every start of this painter.
    config: PainterConfig,
    /// Current lifecycle state.
    state: LoopState,
    /// Queue of the current run. Replaced by a fresh one on every start.
    queue: Arc<WorkQueue<Operation>>,
    /// Logical canvas, written by the worker only.
    canvas: Arc<RwLock<CanvasState>>,
    /// Number of frames handed to the sink during the current run.
    frames: Arc<AtomicU64>,
    /// Join handle of the worker thread while running.
    join_handle: Option<JoinHandle<()>>,
}

impl Painter {
    /// Create a new, stopped painter.
    ///
    /// If `config` is `None`, [`PainterConfig::default`] is used.
    pub fn new(config: Option<PainterConfig>) -> Self {
        let config = config.unwrap_or_default();
        let canvas = CanvasState::new(config.background);

        // Nothing consumes before the first start, so posts are dropped until then.
        let queue = Arc::new(WorkQueue::new());
        queue.close();

        Self {
            config,
            state: LoopState::Stopped,
            queue,
            canvas: Arc::new(RwLock::new(canvas)),
            frames: Arc::new(AtomicU64::new(0)),
            join_handle: None,
        }
    }

    pub fn config(&self) -> &PainterConfig {
        &self.config
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Starts the worker thread.
    ///
    /// Both surfaces are allocated through `backend` on the worker thread
    /// before this returns. If either allocation fails the worker exits, the
    /// painter stays [`LoopState::Stopped`] and the allocation error is returned.
    ///
    /// This blocks until the worker reports back, so from inside an async
    /// runtime call it through `spawn_blocking`.
    pub fn start(
        &mut self,
        backend: Box<dyn RenderBackend>,
        sink: Box<dyn DisplaySink>,
    ) -> Result<PainterHandle, PainterError> {
        if self.state == LoopState::Running {
            return Err(PainterError::AlreadyRunning);
        }
        self.config.validate()?;

        let queue = Arc::new(WorkQueue::new());
        *self.canvas.write() = CanvasState::new(self.config.background);
        self.frames.store(0, Ordering::Relaxed);

        let (ready_tx, ready_rx) = oneshot::channel::<Result<(), PainterError>>();
        let worker_queue = queue.clone();
        let canvas = self.canvas.clone();
        let frames = self.frames.clone();
        let size = self.config.canvas_size;

        let join_handle = thread::Builder::new()
            .name(self.config.worker_name.clone())
            .spawn(move || {
                log::debug!("Painter: allocating two {}x{} surfaces via {}", size.width, size.height, backend.name());

                let surfaces = backend
                    .create_surface(size)
                    .and_then(|first| Ok([first, backend.create_surface(size)?]));
                drop(backend);

                match surfaces {
                    Ok(surfaces) => {
                        let worker = RenderWorker::new(surfaces, worker_queue, canvas, sink, frames);
                        let _ = ready_tx.send(Ok(()));
                        worker.run();
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(PainterError::SurfaceAllocation(e)));
                    }
                }
            })?;

        let startup = ready_rx.blocking_recv().unwrap_or(Err(PainterError::WorkerLost));
        if let Err(e) = startup {
            log::error!("Painter: startup failed: {}", e);
            let _ = join_handle.join();
            return Err(e);
        }

        log::info!(
            "Painter: started {}x{} render loop on thread '{}'",
            size.width,
            size.height,
            self.config.worker_name
        );

        self.queue = queue;
        self.join_handle = Some(join_handle);
        self.state = LoopState::Running;

        Ok(self.handle())
    }

    /// Returns a producer handle for the current queue.
    pub fn handle(&self) -> PainterHandle {
        PainterHandle { queue: self.queue.clone() }
    }

    /// Queues `op`. Never blocks.
    pub fn post(&self, op: Operation) {
        self.queue.push(op);
    }

    /// Stops the worker at its next iteration boundary and waits for it to exit.
    ///
    /// An operation being applied when this is called is finished; operations
    /// still queued are discarded and their number is returned. A worker
    /// blocked on an empty queue is woken up by the stop request itself.
    pub fn stop_and_wait(&mut self) -> Result<usize, PainterError> {
        let Some(join_handle) = self.join_handle.take() else {
            return Err(PainterError::NotRunning);
        };
        self.state = LoopState::Stopped;

        let discarded = self.queue.close();
        if discarded > 0 {
            log::warn!("Painter: stopping with {} pending operation(s), discarded", discarded);
        }

        if let Err(payload) = join_handle.join() {
            let message = panic_message(payload.as_ref());
            log::error!("Painter: render worker panicked: {}", message);
            return Err(PainterError::WorkerPanicked(message));
        }

        log::info!("Painter: stopped after {} frame(s)", self.frames_presented());
        Ok(discarded)
    }

    /// Copy of the current canvas state.
    pub fn canvas(&self) -> CanvasState {
        self.canvas.read().clone()
    }

    /// True when no operations are waiting. Diagnostics only.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of operations waiting to be applied. Diagnostics only.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Frames handed to the sink since the last start.
    pub fn frames_presented(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }
}

impl Drop for Painter {
    fn drop(&mut self) {
        if self.state == LoopState::Running {
            if let Err(e) = self.stop_and_wait() {
                log::error!("Painter: error while stopping on drop: {}", e);
            }
        }
    }
}

/// State owned by the worker thread.
struct RenderWorker {
    /// The two buffers. `surfaces[active]` is the working one.
    surfaces: [Box<dyn Surface>; 2],
    active: usize,
    queue: Arc<WorkQueue<Operation>>,
    canvas: Arc<RwLock<CanvasState>>,
    sink: Box<dyn DisplaySink>,
    frames: Arc<AtomicU64>,
}

impl RenderWorker {
    fn new(
        surfaces: [Box<dyn Surface>; 2],
        queue: Arc<WorkQueue<Operation>>,
        canvas: Arc<RwLock<CanvasState>>,
        sink: Box<dyn DisplaySink>,
        frames: Arc<AtomicU64>,
    ) -> Self {
        Self { surfaces, active: 0, queue, canvas, sink, frames }
    }

    fn run(mut self) {
        let _guard = CloseOnExit(self.queue.clone());

        while let Some(op) = self.queue.pull() {
            log::trace!("Painter: applying {:?}", op);
            self.process(&op);
        }

        log::debug!("Painter: render worker exiting");
    }

    fn process(&mut self, op: &Operation) {
        let ready = {
            let mut canvas = self.canvas.write();
            op.apply(self.surfaces[self.active].as_mut(), &mut canvas)
        };

        if ready {
            self.publish();
        }
    }

    /// Hands the working surface to the sink, then swaps roles.
    fn publish(&mut self) {
        let id = self.frames.fetch_add(1, Ordering::Relaxed) + 1;
        let frame = Frame { id, slot: self.active, surface: self.surfaces[self.active].as_ref() };

        log::debug!("Painter: presenting frame {} from slot {}", id, self.active);
        self.sink.present(&frame);

        self.active ^= 1;
    }
}

/// Closes the queue when the worker exits, including by panic, so producers
/// stop accumulating operations nobody will apply.
struct CloseOnExit(Arc<WorkQueue<Operation>>);

impl Drop for CloseOnExit {
    fn drop(&mut self) {
        if thread::panicking() {
            log::error!("Painter: render worker is unwinding, closing queue");
        }
        self.0.close();
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
