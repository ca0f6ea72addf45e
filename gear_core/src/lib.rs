//! gear_core - Item model for loadout building
//!
//! This library provides:
//! - Item: an equippable item with stats and sockets
//! - StatVector / StatSet: per-dimension stat tuples and sets of them
//! - Identifier types for slots, items and manifest hashes

pub mod item;
pub mod stat;
pub mod types;

pub use item::{InvestmentStat, Item, ItemStat, Plug, Socket, SocketCategory, Sockets};
pub use stat::{StatSet, StatVector};
pub use types::{BurnType, CategoryHash, ItemId, PlugHash, SlotId, StatDef, StatHash, Tier};
