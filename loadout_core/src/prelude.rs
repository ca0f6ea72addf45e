//! Prelude module for convenient imports
//!
//! ```rust
//! use loadout_core::prelude::*;
//! ```

// Pipeline
pub use crate::pipeline::{BuildOutput, BuildRequest, LoadoutBuilder};
pub use crate::worker::{BuildResult, BuildWorker};
pub use crate::cancel::{CancelToken, RunOutcome};

// Stages
pub use crate::filter::{filter_items, ItemsBySlot};
pub use crate::group::{achievable_stats, group_items, group_slots, EquivalenceGroup, SlotGroups};
pub use crate::enumerate::{enumerate, Combination, Combinations, SlotChoice};
pub use crate::lock::{LockConstraint, LockedMap};

// Config
pub use crate::config::{BuilderConfig, InterestingPolicy};
pub use crate::error::BuildError;

// Re-exports from gear_core
pub use gear_core::{BurnType, Item, ItemId, Plug, SlotId, Socket, StatDef, StatSet, StatVector, Tier};
