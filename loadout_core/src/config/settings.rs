//! Builder settings: slot list, tracked stats and filter policy

use gear_core::{CategoryHash, SlotId, StatDef, Tier};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::ConfigError;

/// Settings shared by every build run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Equipment slots in enumeration order
    #[serde(default = "default_slots")]
    pub slots: Vec<SlotId>,
    /// Tracked stat dimensions in vector order
    #[serde(default = "default_stats")]
    pub stats: Vec<StatDef>,
    #[serde(default)]
    pub interesting: InterestingPolicy,
    /// Product size above which a run logs a warning; 0 disables the check
    #[serde(default = "default_max_combinations")]
    pub max_combinations: u64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            slots: default_slots(),
            stats: default_stats(),
            interesting: InterestingPolicy::default(),
            max_combinations: default_max_combinations(),
        }
    }
}

impl BuilderConfig {
    /// Load settings from a TOML file and validate them
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let config: BuilderConfig = super::load_toml(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse settings from a TOML string and validate them
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: BuilderConfig = super::parse_toml(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Build settings for a custom slot list and stat schema
    pub fn new(slots: Vec<SlotId>, stats: Vec<StatDef>) -> Self {
        BuilderConfig {
            slots,
            stats,
            ..BuilderConfig::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slots.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one slot is required".to_string(),
            ));
        }
        if self.stats.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one stat is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for slot in &self.slots {
            if !seen.insert(slot) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate slot '{}'",
                    slot
                )));
            }
        }

        let mut seen = HashSet::new();
        for stat in &self.stats {
            if !seen.insert(stat.hash) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate stat hash {} ({})",
                    stat.hash, stat.name
                )));
            }
        }

        Ok(())
    }

    /// Number of tracked stat dimensions
    pub fn dims(&self) -> usize {
        self.stats.len()
    }

    pub fn has_slot(&self, slot: &SlotId) -> bool {
        self.slots.contains(slot)
    }

    /// The safety ceiling, if one is set
    pub fn ceiling(&self) -> Option<u64> {
        match self.max_combinations {
            0 => None,
            ceiling => Some(ceiling),
        }
    }
}

/// Thresholds for the "interesting items only" filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestingPolicy {
    /// Tiers considered high value
    #[serde(default = "default_tiers")]
    pub tiers: Vec<Tier>,
    /// Exact number of socket categories an item must expose
    #[serde(default = "default_socket_categories")]
    pub socket_categories: usize,
    /// Plugs tagged with this category are ignored as legacy mods
    #[serde(default = "default_deprecated_plug_category")]
    pub deprecated_plug_category: Option<CategoryHash>,
}

impl Default for InterestingPolicy {
    fn default() -> Self {
        InterestingPolicy {
            tiers: default_tiers(),
            socket_categories: default_socket_categories(),
            deprecated_plug_category: default_deprecated_plug_category(),
        }
    }
}

fn default_slots() -> Vec<SlotId> {
    ["helmet", "gauntlets", "chest", "leg", "class_item", "ghost"]
        .into_iter()
        .map(SlotId::from)
        .collect()
}

fn default_stats() -> Vec<StatDef> {
    vec![
        StatDef::new(2996146975, "Mobility"),
        StatDef::new(392767087, "Resilience"),
        StatDef::new(1943323491, "Recovery"),
    ]
}

fn default_max_combinations() -> u64 {
    1_000_000
}

fn default_tiers() -> Vec<Tier> {
    vec![Tier::Exotic, Tier::Legendary]
}

fn default_socket_categories() -> usize {
    2
}

fn default_deprecated_plug_category() -> Option<CategoryHash> {
    Some(4104513227)
}
