//! Constraint filter: narrows raw per-slot pools to enumeration candidates

use crate::config::{BuilderConfig, InterestingPolicy};
use crate::error::BuildError;
use crate::lock::{LockConstraint, LockedMap};
use gear_core::{Item, ItemId, SlotId};
use std::collections::HashMap;
use tracing::debug;

/// Items per slot, in caller order
pub type ItemsBySlot = HashMap<SlotId, Vec<Item>>;

/// Filter the item pools down given the locking and filtering settings.
///
/// Every configured slot gets an entry in the result, possibly empty. Slots
/// named by `items` or `locked` that are not configured are rejected, as are
/// items sitting in another slot's pool.
pub fn filter_items<F>(
    items: &ItemsBySlot,
    locked: &LockedMap,
    require_interesting: bool,
    is_selectable: F,
    config: &BuilderConfig,
) -> Result<ItemsBySlot, BuildError>
where
    F: Fn(&Item) -> bool,
{
    check_slots(locked.keys(), config, "lock constraints")?;
    check_slots(items.keys(), config, "item pools")?;
    check_placement(items, config)?;

    let mut filtered = ItemsBySlot::with_capacity(config.slots.len());

    for slot in &config.slots {
        let pool = items.get(slot).map(Vec::as_slice).unwrap_or(&[]);
        let constraints = locked.get(slot).map(Vec::as_slice).unwrap_or(&[]);

        let candidates = filter_slot(
            slot,
            pool,
            constraints,
            require_interesting,
            &is_selectable,
            &config.interesting,
        )?;

        debug!(
            slot = %slot,
            pool = pool.len(),
            candidates = candidates.len(),
            "filtered slot"
        );
        filtered.insert(slot.clone(), candidates);
    }

    Ok(filtered)
}

fn check_slots<'a>(
    slots: impl Iterator<Item = &'a SlotId>,
    config: &BuilderConfig,
    context: &'static str,
) -> Result<(), BuildError> {
    // Smallest unknown id, so the reported slot doesn't depend on map order
    match slots.filter(|s| !config.has_slot(s)).min() {
        Some(slot) => Err(BuildError::UnknownSlot {
            slot: slot.clone(),
            context,
        }),
        None => Ok(()),
    }
}

fn check_placement(items: &ItemsBySlot, config: &BuilderConfig) -> Result<(), BuildError> {
    for slot in &config.slots {
        let pool = items.get(slot).map(Vec::as_slice).unwrap_or(&[]);
        if let Some(item) = pool.iter().find(|i| i.slot != *slot) {
            return Err(BuildError::MisplacedItem {
                slot: slot.clone(),
                item: item.id.clone(),
                belongs_to: item.slot.clone(),
            });
        }
    }
    Ok(())
}

fn filter_slot<F>(
    slot: &SlotId,
    pool: &[Item],
    constraints: &[LockConstraint],
    require_interesting: bool,
    is_selectable: &F,
    policy: &InterestingPolicy,
) -> Result<Vec<Item>, BuildError>
where
    F: Fn(&Item) -> bool,
{
    // A pinned item replaces the whole pipeline for this slot
    let pinned: Vec<&ItemId> = constraints.iter().filter_map(LockConstraint::exact_item).collect();
    if let Some(&first) = pinned.first() {
        if pinned.iter().any(|&id| id != first) {
            debug!(slot = %slot, "conflicting exact-item locks");
            return Ok(Vec::new());
        }
        let item = pool
            .iter()
            .find(|i| i.id == *first)
            .ok_or_else(|| BuildError::UnknownItem {
                slot: slot.clone(),
                item: first.clone(),
            })?;
        return Ok(vec![item.clone()]);
    }

    let mut candidates: Vec<&Item> = pool.iter().filter(|i| is_selectable(i)).collect();
    if candidates.is_empty() {
        // If nothing matches the search, include everything so we can still make sets
        candidates = pool.iter().collect();
    }

    if require_interesting {
        let narrowed: Vec<&Item> = candidates
            .iter()
            .copied()
            .filter(|i| is_interesting(i, policy))
            .collect();
        if narrowed.is_empty() {
            debug!(slot = %slot, "no interesting items, keeping all candidates");
        } else {
            candidates = narrowed;
        }
    }

    Ok(candidates
        .into_iter()
        .filter(|i| constraints.iter().all(|c| c.matches(i)))
        .cloned()
        .collect())
}

/// High-value tier, the expected socket layout, and at least one
/// selectable socket holding a current (non-legacy) plug.
pub fn is_interesting(item: &Item, policy: &InterestingPolicy) -> bool {
    if !policy.tiers.contains(&item.tier) {
        return false;
    }
    if item.socket_category_count() != policy.socket_categories {
        return false;
    }
    item.selectable_sockets().any(|socket| match &socket.plug {
        Some(plug) => policy
            .deprecated_plug_category
            .map_or(true, |deprecated| !plug.has_category(deprecated)),
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gear_core::{BurnType, Plug, Socket, Tier};

    const DEPRECATED: u32 = 4104513227;

    fn config() -> BuilderConfig {
        BuilderConfig::new(
            vec![SlotId::from("helmet"), SlotId::from("chest")],
            BuilderConfig::default().stats,
        )
    }

    fn helm(id: &str) -> Item {
        Item::new(id, format!("Helm {}", id), "helmet")
    }

    fn interesting(id: &str) -> Item {
        helm(id)
            .with_tier(Tier::Legendary)
            .with_socket_category(1)
            .with_socket_category(2)
            .with_socket(Socket::with_options(vec![Plug::new(10, "A"), Plug::new(11, "B")]))
    }

    fn pools(helms: Vec<Item>) -> ItemsBySlot {
        let mut items = ItemsBySlot::new();
        items.insert(SlotId::from("helmet"), helms);
        items
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    fn lock(constraints: Vec<LockConstraint>) -> LockedMap {
        let mut locked = LockedMap::new();
        locked.insert(SlotId::from("helmet"), constraints);
        locked
    }

    #[test]
    fn test_every_configured_slot_present() {
        let result =
            filter_items(&ItemsBySlot::new(), &LockedMap::new(), false, |_| true, &config())
                .unwrap();
        assert_eq!(result.len(), 2);
        assert!(result[&SlotId::from("chest")].is_empty());
    }

    #[test]
    fn test_exact_item_wins_over_everything() {
        let items = pools(vec![helm("a"), helm("b"), helm("c")]);
        let locked = lock(vec![
            LockConstraint::exact("b"),
            LockConstraint::exclude("b"),
            LockConstraint::burn(BurnType::Void),
        ]);

        let result = filter_items(&items, &locked, true, |_| false, &config()).unwrap();
        assert_eq!(ids(&result[&SlotId::from("helmet")]), vec!["b"]);
    }

    #[test]
    fn test_conflicting_exact_items_empty_the_slot() {
        let items = pools(vec![helm("a"), helm("b")]);
        let locked = lock(vec![LockConstraint::exact("a"), LockConstraint::exact("b")]);

        let result = filter_items(&items, &locked, false, |_| true, &config()).unwrap();
        assert!(result[&SlotId::from("helmet")].is_empty());
    }

    #[test]
    fn test_exact_item_missing_from_pool() {
        let items = pools(vec![helm("a")]);
        let locked = lock(vec![LockConstraint::exact("zzz")]);

        let result = filter_items(&items, &locked, false, |_| true, &config());
        assert_eq!(
            result,
            Err(BuildError::UnknownItem {
                slot: SlotId::from("helmet"),
                item: ItemId::from("zzz"),
            })
        );
    }

    #[test]
    fn test_unknown_slot_in_constraints() {
        let mut locked = LockedMap::new();
        locked.insert(SlotId::from("boots"), vec![LockConstraint::exclude("a")]);

        let result = filter_items(&ItemsBySlot::new(), &locked, false, |_| true, &config());
        assert!(matches!(
            result,
            Err(BuildError::UnknownSlot { ref slot, .. }) if slot.as_str() == "boots"
        ));
    }

    #[test]
    fn test_unknown_slot_in_pools() {
        let mut items = ItemsBySlot::new();
        items.insert(SlotId::from("boots"), vec![]);

        let result = filter_items(&items, &LockedMap::new(), false, |_| true, &config());
        assert!(matches!(result, Err(BuildError::UnknownSlot { .. })));
    }

    #[test]
    fn test_item_in_wrong_pool() {
        let chest = Item::new("c", "Chest", "chest");
        let items = pools(vec![helm("a"), chest]);

        let result = filter_items(&items, &LockedMap::new(), false, |_| true, &config());
        assert_eq!(
            result,
            Err(BuildError::MisplacedItem {
                slot: SlotId::from("helmet"),
                item: ItemId::from("c"),
                belongs_to: SlotId::from("chest"),
            })
        );
    }

    #[test]
    fn test_selectable_filter() {
        let items = pools(vec![helm("a"), helm("b"), helm("c")]);
        let result =
            filter_items(&items, &LockedMap::new(), false, |i| i.id.as_str() != "b", &config())
                .unwrap();
        assert_eq!(ids(&result[&SlotId::from("helmet")]), vec!["a", "c"]);
    }

    #[test]
    fn test_selectable_rejecting_all_falls_back_to_pool() {
        let items = pools(vec![helm("a"), helm("b")]);
        let result = filter_items(&items, &LockedMap::new(), false, |_| false, &config()).unwrap();
        assert_eq!(ids(&result[&SlotId::from("helmet")]), vec!["a", "b"]);
    }

    #[test]
    fn test_interesting_narrows() {
        let items = pools(vec![helm("plain"), interesting("good")]);
        let result = filter_items(&items, &LockedMap::new(), true, |_| true, &config()).unwrap();
        assert_eq!(ids(&result[&SlotId::from("helmet")]), vec!["good"]);
    }

    #[test]
    fn test_interesting_never_starves_a_slot() {
        let items = pools(vec![helm("a"), helm("b")]);
        let result = filter_items(&items, &LockedMap::new(), true, |_| true, &config()).unwrap();
        assert_eq!(ids(&result[&SlotId::from("helmet")]), vec!["a", "b"]);
    }

    #[test]
    fn test_lock_constraints_are_anded() {
        let items = pools(vec![
            helm("a").with_burn(BurnType::Arc),
            helm("b").with_burn(BurnType::Arc),
            helm("c").with_burn(BurnType::Solar),
        ]);
        let locked = lock(vec![
            LockConstraint::burn(BurnType::Arc),
            LockConstraint::exclude("a"),
        ]);

        let result = filter_items(&items, &locked, false, |_| true, &config()).unwrap();
        assert_eq!(ids(&result[&SlotId::from("helmet")]), vec!["b"]);
    }

    #[test]
    fn test_unsatisfiable_perk_is_empty_not_error() {
        let items = pools(vec![interesting("a")]);
        let locked = lock(vec![LockConstraint::perk(999)]);

        let result = filter_items(&items, &locked, false, |_| true, &config()).unwrap();
        assert!(result[&SlotId::from("helmet")].is_empty());
    }

    #[test]
    fn test_is_interesting_rules() {
        let policy = InterestingPolicy::default();
        assert!(is_interesting(&interesting("a"), &policy));

        // Wrong tier
        assert!(!is_interesting(&interesting("a").with_tier(Tier::Rare), &policy));

        // Wrong socket category count
        let three = interesting("a").with_socket_category(3);
        assert!(!is_interesting(&three, &policy));

        // Only selectable socket holds a legacy plug
        let legacy = helm("a")
            .with_tier(Tier::Exotic)
            .with_socket_category(1)
            .with_socket_category(2)
            .with_socket(Socket::with_options(vec![
                Plug::new(20, "Old").with_category(DEPRECATED),
                Plug::new(21, "New"),
            ]));
        assert!(!is_interesting(&legacy, &policy));

        // No selectable socket at all
        let fixed = helm("a")
            .with_tier(Tier::Exotic)
            .with_socket_category(1)
            .with_socket_category(2)
            .with_socket(Socket::with_options(vec![Plug::new(30, "Only")]));
        assert!(!is_interesting(&fixed, &policy));
    }
}
