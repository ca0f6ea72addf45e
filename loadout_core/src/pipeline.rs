//! Filter → group → enumerate, as one run over an input snapshot

use crate::cancel::{CancelToken, RunOutcome};
use crate::config::{BuilderConfig, ConfigError};
use crate::enumerate::{Combination, Combinations};
use crate::error::BuildError;
use crate::filter::{filter_items, ItemsBySlot};
use crate::group::group_slots;
use crate::lock::LockedMap;
use gear_core::Item;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Upstream search filter over single items
pub type ItemPredicate = Arc<dyn Fn(&Item) -> bool + Send + Sync>;

/// Decides whether an assembled combination is worth keeping
pub type SetPredicate = Arc<dyn Fn(&Combination) -> bool + Send + Sync>;

/// Everything one run needs
#[derive(Clone)]
pub struct BuildRequest {
    pub items: ItemsBySlot,
    pub locked: LockedMap,
    /// Restrict to high-value items with current perks
    pub require_interesting: bool,
    pub is_selectable: ItemPredicate,
    pub is_valid: SetPredicate,
}

impl BuildRequest {
    /// A request that selects every item and keeps every combination
    pub fn new(items: ItemsBySlot) -> Self {
        BuildRequest {
            items,
            locked: LockedMap::new(),
            require_interesting: false,
            is_selectable: Arc::new(|_| true),
            is_valid: Arc::new(|_| true),
        }
    }

    pub fn with_locks(mut self, locked: LockedMap) -> Self {
        self.locked = locked;
        self
    }

    pub fn require_interesting(mut self, require: bool) -> Self {
        self.require_interesting = require;
        self
    }

    pub fn with_selectable<F>(mut self, is_selectable: F) -> Self
    where
        F: Fn(&Item) -> bool + Send + Sync + 'static,
    {
        self.is_selectable = Arc::new(is_selectable);
        self
    }

    pub fn with_validity<F>(mut self, is_valid: F) -> Self
    where
        F: Fn(&Combination) -> bool + Send + Sync + 'static,
    {
        self.is_valid = Arc::new(is_valid);
        self
    }
}

impl std::fmt::Debug for BuildRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildRequest")
            .field("slots", &self.items.len())
            .field("locked", &self.locked)
            .field("require_interesting", &self.require_interesting)
            .finish_non_exhaustive()
    }
}

/// Accepted combinations of one run
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    /// Accepted combinations, in enumeration order
    pub sets: Vec<Combination>,
    /// Candidates checked against the validity predicate
    pub processed: u64,
    pub elapsed: Duration,
}

/// Runs the full pipeline with a fixed configuration
#[derive(Debug, Clone)]
pub struct LoadoutBuilder {
    config: Arc<BuilderConfig>,
}

impl LoadoutBuilder {
    /// Fails if `config` does not validate
    pub fn new(config: BuilderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(LoadoutBuilder {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Run to completion on the calling thread
    pub fn build(&self, request: &BuildRequest) -> Result<BuildOutput, BuildError> {
        let outcome = self.build_with_cancel(request, &CancelToken::new())?;
        Ok(outcome.completed().unwrap_or_default())
    }

    /// Run, stopping early once `cancel` fires
    pub fn build_with_cancel(
        &self,
        request: &BuildRequest,
        cancel: &CancelToken,
    ) -> Result<RunOutcome<BuildOutput>, BuildError> {
        let start = Instant::now();
        let config = &*self.config;

        info!(
            event = "build_start",
            slots = config.slots.len(),
            items = request.items.values().map(Vec::len).sum::<usize>(),
            locked_slots = request.locked.len(),
        );

        let is_selectable = &request.is_selectable;
        let filtered = filter_items(
            &request.items,
            &request.locked,
            request.require_interesting,
            |item| is_selectable(item),
            config,
        )?;
        let grouped = group_slots(&filtered, config);

        for slot in &grouped {
            debug!(slot = %slot.slot, groups = slot.groups().len(), "grouped slot");
        }

        let candidates = Combinations::new(&grouped, config.dims());
        let product = candidates.product_size();
        if let Some(ceiling) = config.ceiling() {
            if product > ceiling {
                warn!(
                    combinations = product,
                    ceiling, "combination count exceeds the configured ceiling"
                );
            }
        }

        let is_valid = &request.is_valid;
        let enumeration = match candidates.collect_valid(|c| is_valid(c), cancel) {
            RunOutcome::Completed(enumeration) => enumeration,
            RunOutcome::Cancelled => {
                debug!(event = "build_cancelled", generation = ?cancel.generation());
                return Ok(RunOutcome::Cancelled);
            }
        };

        let elapsed = start.elapsed();
        info!(
            event = "build_end",
            sets = enumeration.combinations.len(),
            combinations = enumeration.processed,
            elapsed_ms = elapsed.as_millis() as u64,
        );

        Ok(RunOutcome::Completed(BuildOutput {
            sets: enumeration.combinations,
            processed: enumeration.processed,
            elapsed,
        }))
    }
}
