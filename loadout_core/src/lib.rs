//! loadout_core - Combination generator for equipment loadouts
//!
//! This library provides:
//! - filter_items: narrows per-slot item pools using locks and search filters
//! - group_items: collapses items with identical achievable stats
//! - Combinations / enumerate: lazy cartesian product of per-slot stat choices
//! - LoadoutBuilder: the whole pipeline over one input snapshot
//! - BuildWorker: background runs with cancellation and supersession
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use loadout_core::prelude::*;
//! use std::path::Path;
//!
//! let config = BuilderConfig::load_from_path(Path::new("config/builder.toml"))?;
//! let builder = LoadoutBuilder::new(config)?;
//!
//! let request = BuildRequest::new(items_by_slot)
//!     .with_locks(locked)
//!     .with_validity(|set| set.total.get(0) >= 10);
//! let output = builder.build(&request)?;
//! println!("Found {} sets", output.sets.len());
//! ```

pub mod cancel;
pub mod config;
pub mod enumerate;
pub mod error;
pub mod filter;
pub mod group;
pub mod lock;
pub mod pipeline;
pub mod prelude;
pub mod worker;

// Core API - what most users need
pub use pipeline::{BuildOutput, BuildRequest, LoadoutBuilder};
pub use enumerate::{Combination, SlotChoice};
pub use lock::{LockConstraint, LockedMap};
pub use filter::ItemsBySlot;
pub use worker::{BuildResult, BuildWorker};

// Configuration and errors
pub use config::{BuilderConfig, ConfigError, InterestingPolicy};
pub use error::BuildError;
pub use cancel::{CancelToken, RunOutcome};

// Re-export commonly needed gear_core types
pub use gear_core::{Item, SlotId, StatSet, StatVector};
