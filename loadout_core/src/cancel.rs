//! Cooperative cancellation for build runs

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Result of a run that may be cancelled part way through
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome<T> {
    Completed(T),
    Cancelled,
}

impl<T> RunOutcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled)
    }

    /// The completed value, if the run was not cancelled
    pub fn completed(self) -> Option<T> {
        match self {
            RunOutcome::Completed(value) => Some(value),
            RunOutcome::Cancelled => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RunOutcome<U> {
        match self {
            RunOutcome::Completed(value) => RunOutcome::Completed(f(value)),
            RunOutcome::Cancelled => RunOutcome::Cancelled,
        }
    }
}

/// Checked between candidates; a run stops at the next check after
/// `cancel()` or after a newer generation is started.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    /// Generation this run belongs to, and the latest generation started
    generation: Option<(u64, Arc<AtomicU64>)>,
}

impl CancelToken {
    /// A token only cancelled explicitly
    pub fn new() -> Self {
        CancelToken::default()
    }

    /// A token that is also cancelled once `latest` moves past `generation`
    pub fn for_generation(generation: u64, latest: Arc<AtomicU64>) -> Self {
        CancelToken {
            cancelled: Arc::new(AtomicBool::new(false)),
            generation: Some((generation, latest)),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::SeqCst) {
            return true;
        }
        match &self.generation {
            Some((mine, latest)) => latest.load(Ordering::SeqCst) != *mine,
            None => false,
        }
    }

    pub fn generation(&self) -> Option<u64> {
        self.generation.as_ref().map(|(g, _)| *g)
    }
}
