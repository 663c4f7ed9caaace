//! Background execution of the recoloring pipeline
//!
//! A [`RecolorTask`] is a cancellable unit of work. It either runs on the
//! calling thread ([`RecolorTask::run`]) or on a dedicated worker thread
//! ([`RecolorTask::spawn`]), and always finishes with a [`TaskOutcome`].

pub mod slots;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use enough::{Stop, StopReason};
use image::Rgb;
use imageproc::definitions::Image;
use tracing::{debug, warn};

use crate::error::TaskError;
use crate::recolor::region_recolor::RegionRecolor;
use crate::recolor::RecolorablePixel;

/// Shared cancellation flag, usable as an [`enough::Stop`] source.
///
/// Clones observe the same flag. Once cancelled a token stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels this token and every clone of it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Stop for CancellationToken {
    fn check(&self) -> Result<(), StopReason> {
        if self.is_cancelled() {
            Err(StopReason::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// How a task finished.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome<T> {
    /// The computation produced a result
    Completed(T),
    /// The computation or its worker failed
    Failed(TaskError),
    /// The caller asked for no further work; there is no result
    Cancelled,
}

impl<T> TaskOutcome<T> {
    /// Returns the result if the task completed.
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Failed(_) | Self::Cancelled => None,
        }
    }

    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// One recoloring request: a shared source image and a target color.
#[derive(Debug)]
pub struct RecolorTask<P: RecolorablePixel> {
    image: Arc<Image<P>>,
    target: Rgb<u8>,
    token: CancellationToken,
}

impl<P> RecolorTask<P>
where
    P: RecolorablePixel,
{
    /// Creates a task with a fresh token.
    pub fn new(image: Arc<Image<P>>, target: Rgb<u8>) -> Self {
        Self::with_token(image, target, CancellationToken::new())
    }

    /// Creates a task observing an existing token.
    pub fn with_token(image: Arc<Image<P>>, target: Rgb<u8>, token: CancellationToken) -> Self {
        Self {
            image,
            target,
            token,
        }
    }

    /// Color whose hue the task highlights.
    pub fn target(&self) -> Rgb<u8> {
        self.target
    }

    /// Token that cancels this task.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Runs the pipeline on the current thread.
    ///
    /// A task whose token is cancelled at any point up to the return never
    /// reports `Completed`, even if the computation itself finished.
    pub fn run(self) -> TaskOutcome<Image<P>> {
        if self.token.is_cancelled() {
            return TaskOutcome::Cancelled;
        }

        let outcome = match self
            .image
            .recolor_region_cancellable(self.target, &self.token)
        {
            Ok(Some(image)) => TaskOutcome::Completed(image),
            Ok(None) => TaskOutcome::Cancelled,
            Err(error) => {
                warn!(%error, target = ?self.target, "recoloring failed");
                TaskOutcome::Failed(error.into())
            }
        };

        if self.token.is_cancelled() {
            TaskOutcome::Cancelled
        } else {
            outcome
        }
    }
}

impl<P> RecolorTask<P>
where
    P: RecolorablePixel + Send + Sync + 'static,
{
    /// Runs the pipeline on a new worker thread.
    ///
    /// # Errors
    ///
    /// * `TaskError::SpawnFailed` - The operating system refused a new thread
    pub fn spawn(self) -> Result<TaskHandle<P>, TaskError> {
        let token = self.token.clone();
        let worker = thread::Builder::new()
            .name("chameleon-recolor".to_owned())
            .spawn(move || self.run())
            .map_err(|error| TaskError::SpawnFailed(error.to_string()))?;

        Ok(TaskHandle { token, worker })
    }
}

/// Handle to a task running on a worker thread.
#[derive(Debug)]
pub struct TaskHandle<P: RecolorablePixel> {
    token: CancellationToken,
    worker: JoinHandle<TaskOutcome<Image<P>>>,
}

impl<P> TaskHandle<P>
where
    P: RecolorablePixel,
{
    /// Requests cancellation. The worker finishes its current pipeline stage
    /// and stops before the next one.
    pub fn cancel(&self) {
        debug!("cancelling recolor task");
        self.token.cancel();
    }

    /// Whether the worker has returned, so [`join`](Self::join) will not block.
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Waits for the worker and returns its outcome.
    ///
    /// A cancelled handle always yields [`TaskOutcome::Cancelled`].
    pub fn join(self) -> TaskOutcome<Image<P>> {
        let outcome = self
            .worker
            .join()
            .unwrap_or(TaskOutcome::Failed(TaskError::WorkerPanicked));

        if self.token.is_cancelled() {
            TaskOutcome::Cancelled
        } else {
            outcome
        }
    }
}
