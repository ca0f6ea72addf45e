//! Background build worker with supersession and cancellation

use crate::cancel::{CancelToken, RunOutcome};
use crate::config::{BuilderConfig, ConfigError};
use crate::error::BuildError;
use crate::pipeline::{BuildOutput, BuildRequest, LoadoutBuilder};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Result of the run started by `BuildWorker::submit`
#[derive(Debug)]
pub struct BuildResult {
    /// Generation returned by the matching `submit`
    pub generation: u64,
    pub output: Result<BuildOutput, BuildError>,
}

/// Runs builds off the caller's thread.
///
/// Each `submit` supersedes the previous run: the older run stops at its next
/// cancellation check and its result, if it still arrives, is discarded.
pub struct BuildWorker {
    builder: LoadoutBuilder,
    latest: Arc<AtomicU64>,
    current: Option<CancelToken>,
    tx: Sender<BuildResult>,
    rx: Receiver<BuildResult>,
    handles: Vec<JoinHandle<()>>,
}

impl BuildWorker {
    pub fn new(config: BuilderConfig) -> Result<Self, ConfigError> {
        let (tx, rx) = mpsc::channel();
        Ok(BuildWorker {
            builder: LoadoutBuilder::new(config)?,
            latest: Arc::new(AtomicU64::new(0)),
            current: None,
            tx,
            rx,
            handles: Vec::new(),
        })
    }

    /// Start a run over `request`, superseding any run in flight
    pub fn submit(&mut self, request: BuildRequest) -> u64 {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = self.current.take() {
            previous.cancel();
        }
        self.handles.retain(|h| !h.is_finished());

        let token = CancelToken::for_generation(generation, Arc::clone(&self.latest));
        self.current = Some(token.clone());

        let builder = self.builder.clone();
        let tx = self.tx.clone();

        let handle = thread::spawn(move || {
            // A panicking predicate becomes an error result
            let run = panic::catch_unwind(AssertUnwindSafe(|| {
                builder.build_with_cancel(&request, &token)
            }));
            let output = match run {
                Ok(Ok(RunOutcome::Completed(output))) => Ok(output),
                Ok(Ok(RunOutcome::Cancelled)) => return,
                Ok(Err(e)) => Err(e),
                Err(payload) => {
                    let message = panic_message(&*payload);
                    warn!(generation, %message, "build panicked");
                    Err(BuildError::RunPanicked {
                        generation,
                        message,
                    })
                }
            };
            if token.is_cancelled() {
                debug!(generation, "dropping superseded result");
                return;
            }
            // Receiver gone means the worker was dropped
            let _ = tx.send(BuildResult { generation, output });
        });

        debug!(generation, "build submitted");
        self.handles.push(handle);
        generation
    }

    /// Cancel the run in flight; it will deliver nothing
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
            self.latest.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Generation of the most recent submit or cancel
    pub fn generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Latest result if one has arrived; stale results are discarded
    pub fn try_latest(&self) -> Option<BuildResult> {
        let current = self.generation();
        let mut found = None;
        while let Ok(result) = self.rx.try_recv() {
            if result.generation == current {
                found = Some(result);
            }
        }
        found
    }

    /// Block until the latest run delivers, or `timeout` passes
    pub fn wait_latest(&self, timeout: Duration) -> Option<BuildResult> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(result) if result.generation == self.generation() => return Some(result),
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None
                }
            }
        }
    }

    /// Cancel any run in flight and wait for every worker thread to exit
    pub fn shutdown(mut self) {
        self.stop();
    }

    /// Wait for every run in flight to finish
    pub fn join(&mut self) {
        for handle in self.handles.drain(..) {
            if let Err(payload) = handle.join() {
                warn!(message = %panic_message(&*payload), "build thread panicked");
            }
        }
    }

    fn stop(&mut self) {
        self.cancel();
        self.join();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Drop for BuildWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
