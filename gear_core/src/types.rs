use serde::{Deserialize, Serialize};
use std::fmt;

/// Manifest hash of a stat definition (e.g. Mobility)
pub type StatHash = u32;

/// Manifest hash of a plug (perk or mod) definition
pub type PlugHash = u32;

/// Manifest hash of an item category, used to tag plugs
pub type CategoryHash = u32;

/// Item tier (rarity)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    #[default]
    Basic,
    Common,
    Rare,
    Legendary,
    Exotic,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Basic => write!(f, "Basic"),
            Tier::Common => write!(f, "Common"),
            Tier::Rare => write!(f, "Rare"),
            Tier::Legendary => write!(f, "Legendary"),
            Tier::Exotic => write!(f, "Exotic"),
        }
    }
}

/// Elemental burn carried by an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BurnType {
    #[default]
    Kinetic,
    Arc,
    Solar,
    Void,
}

impl fmt::Display for BurnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BurnType::Kinetic => write!(f, "Kinetic"),
            BurnType::Arc => write!(f, "Arc"),
            BurnType::Solar => write!(f, "Solar"),
            BurnType::Void => write!(f, "Void"),
        }
    }
}

/// Identifier for an equipment slot (e.g. "helmet")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub String);

impl SlotId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SlotId {
    fn from(s: &str) -> Self {
        SlotId(s.to_string())
    }
}

impl From<String> for SlotId {
    fn from(s: String) -> Self {
        SlotId(s)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique instance id of an item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId(s)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tracked stat dimension: its manifest hash and display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDef {
    pub hash: StatHash,
    pub name: String,
}

impl StatDef {
    pub fn new(hash: StatHash, name: impl Into<String>) -> Self {
        StatDef {
            hash,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::Exotic > Tier::Legendary);
        assert!(Tier::Legendary > Tier::Rare);
        assert!(Tier::Basic < Tier::Common);
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let slot = SlotId::from("helmet");
        assert_eq!(serde_json::to_string(&slot).unwrap(), "\"helmet\"");

        let burn: BurnType = serde_json::from_str("\"solar\"").unwrap();
        assert_eq!(burn, BurnType::Solar);
    }
}
