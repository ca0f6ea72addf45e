//! Equivalence grouping: items realizing identical stat outcomes are interchangeable

use crate::config::BuilderConfig;
use crate::filter::ItemsBySlot;
use gear_core::{Item, SlotId, StatDef, StatSet, StatVector};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

/// Items sharing one achievable stat set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquivalenceGroup {
    key: StatSet,
    /// Members, highest power first
    items: Vec<Item>,
}

impl EquivalenceGroup {
    /// The achievable stat set every member shares
    pub fn key(&self) -> &StatSet {
        &self.key
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Highest power member
    pub fn representative(&self) -> Option<&Item> {
        self.items.first()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// All equivalence groups of one slot, in first-appearance order
#[derive(Debug, Clone)]
pub struct SlotGroups {
    pub slot: SlotId,
    groups: Vec<Arc<EquivalenceGroup>>,
}

impl SlotGroups {
    pub fn groups(&self) -> &[Arc<EquivalenceGroup>] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group for an exact achievable set
    pub fn get(&self, key: &StatSet) -> Option<&Arc<EquivalenceGroup>> {
        self.groups.iter().find(|g| g.key() == key)
    }

    /// Union of every group's achievable set
    pub fn achievable(&self) -> StatSet {
        let mut all = StatSet::new();
        for group in &self.groups {
            all.extend_from(group.key());
        }
        all
    }

    /// Distinct achievable vectors, each with the groups able to realize it.
    ///
    /// Vectors appear in the order they are first met walking the groups.
    pub fn stat_options(&self) -> Vec<(StatVector, Vec<Arc<EquivalenceGroup>>)> {
        let mut options: Vec<(StatVector, Vec<Arc<EquivalenceGroup>>)> = Vec::new();
        let mut index: HashMap<&StatVector, usize> = HashMap::new();

        for group in &self.groups {
            for vector in group.key() {
                match index.get(vector) {
                    Some(&i) => options[i].1.push(Arc::clone(group)),
                    None => {
                        index.insert(vector, options.len());
                        options.push((vector.clone(), vec![Arc::clone(group)]));
                    }
                }
            }
        }

        options
    }
}

/// The set of stat vectors `item` can realize by choosing among its plugs
pub fn achievable_stats(item: &Item, stats: &[StatDef]) -> StatSet {
    if item.stats.is_empty() || item.stats.len() < stats.len() {
        return StatSet::singleton(StatVector::zeros(stats.len()));
    }

    let base = item.base_vector(stats);
    let mut mixes = StatSet::new();

    for socket in item.selectable_sockets() {
        for plug in &socket.plug_options {
            let bonus = plug.bonus_vector(stats);
            if bonus.values().iter().any(|&v| v != 0) {
                mixes.insert(&base + &bonus);
            }
        }
    }

    if mixes.is_empty() {
        StatSet::singleton(item.current_vector(stats))
    } else {
        mixes
    }
}

/// Group one slot's candidates by achievable stat set
pub fn group_items(slot: SlotId, items: &[Item], stats: &[StatDef]) -> SlotGroups {
    let mut sorted: Vec<&Item> = items.iter().collect();
    sorted.sort_by_key(|i| Reverse(i.power));

    let mut building: Vec<EquivalenceGroup> = Vec::new();
    let mut index: HashMap<StatSet, usize> = HashMap::new();

    for item in sorted {
        let key = achievable_stats(item, stats);
        match index.get(&key) {
            Some(&i) => building[i].items.push(item.clone()),
            None => {
                index.insert(key.clone(), building.len());
                building.push(EquivalenceGroup {
                    key,
                    items: vec![item.clone()],
                });
            }
        }
    }

    SlotGroups {
        slot,
        groups: building.into_iter().map(Arc::new).collect(),
    }
}

/// Group every configured slot, in slot order
pub fn group_slots(filtered: &ItemsBySlot, config: &BuilderConfig) -> Vec<SlotGroups> {
    config
        .slots
        .iter()
        .map(|slot| {
            let items = filtered.get(slot).map(Vec::as_slice).unwrap_or(&[]);
            group_items(slot.clone(), items, &config.stats)
        })
        .collect()
}
