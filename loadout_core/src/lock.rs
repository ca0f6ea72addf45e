//! User-supplied per-slot lock and exclusion constraints

use gear_core::{BurnType, Item, ItemId, PlugHash, SlotId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Constraints per slot; all constraints of a slot must hold
pub type LockedMap = HashMap<SlotId, Vec<LockConstraint>>;

/// A single restriction on which items may fill a slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LockConstraint {
    /// Never use this item
    ExcludeItem { item: ItemId },
    /// Only items with this burn
    RequireBurnType { burn: BurnType },
    /// Only items offering this plug in some socket
    RequirePerk { perk: PlugHash },
    /// Use exactly this item
    RequireExactItem { item: ItemId },
}

impl LockConstraint {
    pub fn exclude(item: impl Into<ItemId>) -> Self {
        LockConstraint::ExcludeItem { item: item.into() }
    }

    pub fn burn(burn: BurnType) -> Self {
        LockConstraint::RequireBurnType { burn }
    }

    pub fn perk(perk: PlugHash) -> Self {
        LockConstraint::RequirePerk { perk }
    }

    pub fn exact(item: impl Into<ItemId>) -> Self {
        LockConstraint::RequireExactItem { item: item.into() }
    }

    /// Whether `item` satisfies this constraint
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            LockConstraint::ExcludeItem { item: id } => item.id != *id,
            LockConstraint::RequireBurnType { burn } => item.burn == *burn,
            LockConstraint::RequirePerk { perk } => item.has_perk(*perk),
            LockConstraint::RequireExactItem { item: id } => item.id == *id,
        }
    }

    /// The pinned item id, for `RequireExactItem`
    pub fn exact_item(&self) -> Option<&ItemId> {
        match self {
            LockConstraint::RequireExactItem { item } => Some(item),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gear_core::{Plug, Socket};

    fn item() -> Item {
        Item::new("a", "Helm", "helmet")
            .with_burn(BurnType::Arc)
            .with_socket(Socket::with_options(vec![Plug::new(7, "A"), Plug::new(8, "B")]))
    }

    #[test]
    fn test_exclude() {
        assert!(!LockConstraint::exclude("a").matches(&item()));
        assert!(LockConstraint::exclude("b").matches(&item()));
    }

    #[test]
    fn test_burn() {
        assert!(LockConstraint::burn(BurnType::Arc).matches(&item()));
        assert!(!LockConstraint::burn(BurnType::Void).matches(&item()));
    }

    #[test]
    fn test_perk() {
        assert!(LockConstraint::perk(8).matches(&item()));
        assert!(!LockConstraint::perk(9).matches(&item()));
    }

    #[test]
    fn test_exact() {
        assert!(LockConstraint::exact("a").matches(&item()));
        assert!(!LockConstraint::exact("b").matches(&item()));
        assert_eq!(LockConstraint::exact("a").exact_item(), Some(&ItemId::from("a")));
        assert_eq!(LockConstraint::perk(1).exact_item(), None);
    }

    #[test]
    fn test_tagged_serialization() {
        let json = serde_json::to_string(&LockConstraint::perk(42)).unwrap();
        assert_eq!(json, r#"{"type":"require_perk","perk":42}"#);

        let parsed: LockConstraint =
            serde_json::from_str(r#"{"type":"exclude_item","item":"123"}"#).unwrap();
        assert_eq!(parsed, LockConstraint::exclude("123"));
    }
}
