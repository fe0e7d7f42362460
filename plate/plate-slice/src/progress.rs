//! Progress reporting and cooperative cancellation.

// Layer counts fit comfortably in f64.
#![allow(clippy::cast_precision_loss)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;

/// Error an observer may return; slicers log it and carry on.
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

/// One progress notification.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceProgress {
    /// Layers sectioned so far.
    pub completed: usize,
    /// Layers expected in the whole run.
    pub total: usize,
    /// Fraction done in `[0, 1]`.
    pub fraction: f64,
    /// Human-readable status.
    pub message: String,
}

impl SliceProgress {
    /// Progress part-way through a run.
    #[must_use]
    pub fn new(completed: usize, total: usize, message: impl Into<String>) -> Self {
        let fraction = if total == 0 {
            0.0
        } else {
            (completed as f64 / total as f64).clamp(0.0, 1.0)
        };
        Self {
            completed,
            total,
            fraction,
            message: message.into(),
        }
    }

    /// The final report of a finished run.
    #[must_use]
    pub fn finished(total: usize, message: impl Into<String>) -> Self {
        Self {
            completed: total,
            total,
            fraction: 1.0,
            message: message.into(),
        }
    }
}

/// Receives progress from a running slice.
///
/// Reports arrive on the slicing thread, in the order layers are produced,
/// with non-decreasing fractions. Returning an error never stops the run.
///
/// Closures taking `&SliceProgress` are observers.
///
/// # Example
///
/// ```
/// use plate_slice::{ProgressObserver, SliceProgress};
///
/// let mut seen = Vec::new();
/// let mut observer = |p: &SliceProgress| seen.push(p.fraction);
/// observer.report(&SliceProgress::new(1, 4, "layer 1")).unwrap();
/// assert_eq!(seen, vec![0.25]);
/// ```
pub trait ProgressObserver {
    /// Handle one report.
    ///
    /// # Errors
    ///
    /// Any error is logged by the caller and otherwise ignored.
    fn report(&mut self, progress: &SliceProgress) -> Result<(), ObserverError>;
}

impl<F> ProgressObserver for F
where
    F: FnMut(&SliceProgress),
{
    fn report(&mut self, progress: &SliceProgress) -> Result<(), ObserverError> {
        self(progress);
        Ok(())
    }
}

/// Discards all reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressObserver for NullProgress {
    fn report(&mut self, _progress: &SliceProgress) -> Result<(), ObserverError> {
        Ok(())
    }
}

/// Forwards reports over a channel, typically to a UI thread.
///
/// Fails once the receiving side has hung up.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    sender: Sender<SliceProgress>,
}

impl ChannelProgress {
    /// Wrap a channel sender.
    #[must_use]
    pub const fn new(sender: Sender<SliceProgress>) -> Self {
        Self { sender }
    }
}

impl ProgressObserver for ChannelProgress {
    fn report(&mut self, progress: &SliceProgress) -> Result<(), ObserverError> {
        self.sender.send(progress.clone())?;
        Ok(())
    }
}

/// Shared flag asking a running slice to stop.
///
/// Slicers check it between layers only, so a layer is never left half
/// filled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A fresh, un-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::mpsc;

    #[test]
    fn test_fraction() {
        assert_relative_eq!(SliceProgress::new(3, 12, "").fraction, 0.25);
        assert_relative_eq!(SliceProgress::new(0, 0, "").fraction, 0.0);
        assert_relative_eq!(SliceProgress::new(20, 10, "").fraction, 1.0);
        assert_relative_eq!(SliceProgress::finished(0, "done").fraction, 1.0);
    }

    #[test]
    fn test_channel_progress() {
        let (tx, rx) = mpsc::channel();
        let mut observer = ChannelProgress::new(tx);
        observer.report(&SliceProgress::new(1, 2, "half")).unwrap();
        assert_eq!(rx.recv().unwrap().message, "half");

        drop(rx);
        assert!(observer.report(&SliceProgress::new(2, 2, "done")).is_err());
    }

    #[test]
    fn test_cancel_token_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
