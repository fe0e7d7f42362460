//! Background slicing on a dedicated thread.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use plate_mesh::MeshItem;
use tracing::debug;

use crate::error::{SliceError, SliceResult};
use crate::params::BuildStyle;
use crate::progress::{CancelToken, ChannelProgress, SliceProgress};
use crate::result::SliceRun;
use crate::slicer::SliceBackend;

const WORKER_THREAD_NAME: &str = "plate-slicer";

/// A slice running on its own thread.
///
/// Progress arrives on a channel in production order. Dropping the job
/// detaches the thread; call [`cancel`](Self::cancel) first to stop it early.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use plate_mesh::{IndexedMesh, MeshItem, Point3};
/// use plate_slice::{BuildStyle, PlanarSlicer, SliceJob};
///
/// let block = IndexedMesh::cuboid(Point3::origin(), Point3::new(5.0, 5.0, 2.0));
/// let job = SliceJob::spawn(
///     Arc::new(PlanarSlicer::new()),
///     vec![MeshItem::new("1", "block", block)],
///     BuildStyle::default().with_layer_thickness(0.1),
/// )
/// .unwrap();
///
/// let last = job.progress().iter().last().unwrap();
/// assert_eq!(last.fraction, 1.0);
/// assert_eq!(job.join().unwrap().summary.total_layers, 20);
/// ```
#[derive(Debug)]
pub struct SliceJob {
    handle: JoinHandle<SliceResult<SliceRun>>,
    progress: Receiver<SliceProgress>,
    cancel: CancelToken,
}

impl SliceJob {
    /// Start slicing `items` with `backend` on a new thread.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::WorkerSpawn`] if the thread cannot be created.
    pub fn spawn(
        backend: Arc<dyn SliceBackend>,
        items: Vec<MeshItem>,
        style: BuildStyle,
    ) -> SliceResult<Self> {
        let (sender, progress) = mpsc::channel();
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();

        debug!(backend = backend.name(), items = items.len(), "Spawning slice worker");

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                let mut observer = ChannelProgress::new(sender);
                backend.slice(&items, &style, &mut observer, &worker_cancel)
            })
            .map_err(SliceError::WorkerSpawn)?;

        Ok(Self {
            handle,
            progress,
            cancel,
        })
    }

    /// The progress channel.
    ///
    /// Iterating it blocks until the worker finishes.
    #[must_use]
    pub const fn progress(&self) -> &Receiver<SliceProgress> {
        &self.progress
    }

    /// The next pending report, if any, without blocking.
    #[must_use]
    pub fn try_progress(&self) -> Option<SliceProgress> {
        match self.progress.try_recv() {
            Ok(report) => Some(report),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Ask the worker to stop after the current layer.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A handle to the job's cancellation flag.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// True once the worker thread has returned.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker and take its result.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, [`SliceError::Cancelled`] if the job was
    /// cancelled, or [`SliceError::WorkerPanicked`] if the thread panicked.
    pub fn join(self) -> SliceResult<SliceRun> {
        self.handle.join().map_err(|_| SliceError::WorkerPanicked)?
    }
}
