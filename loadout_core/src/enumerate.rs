//! Combination enumeration over per-slot achievable stat vectors

use crate::cancel::{CancelToken, RunOutcome};
use crate::group::{EquivalenceGroup, SlotGroups};
use gear_core::{Item, SlotId, StatVector};
use std::sync::Arc;

/// What one slot contributes to a combination
#[derive(Debug, Clone, PartialEq)]
pub struct SlotChoice {
    pub slot: SlotId,
    /// The concrete stat vector chosen for this slot
    pub stats: StatVector,
    /// Groups whose members can realize `stats`
    pub groups: Vec<Arc<EquivalenceGroup>>,
}

impl SlotChoice {
    /// Every item able to fill the slot with `stats`
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.groups.iter().flat_map(|g| g.items().iter())
    }
}

/// One assembled candidate: a stat vector per slot and their total
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    /// Position in enumeration order
    pub id: u64,
    /// One choice per slot, in slot order
    pub choices: Vec<SlotChoice>,
    pub total: StatVector,
}

impl Combination {
    pub fn choice(&self, slot: &SlotId) -> Option<&SlotChoice> {
        self.choices.iter().find(|c| c.slot == *slot)
    }

    /// Items able to fill `slot` in this combination
    pub fn items_for(&self, slot: &SlotId) -> Vec<&Item> {
        self.choice(slot)
            .map(|c| c.items().collect())
            .unwrap_or_default()
    }

    /// Chosen per-slot vectors, in slot order
    pub fn chosen_stats(&self) -> impl Iterator<Item = &StatVector> {
        self.choices.iter().map(|c| &c.stats)
    }
}

struct SlotOptions {
    slot: SlotId,
    options: Vec<(StatVector, Vec<Arc<EquivalenceGroup>>)>,
}

/// Lazy cartesian product of every slot's achievable vectors.
///
/// The last slot varies fastest. Ids count every candidate produced, so they
/// are sequential here and stay increasing after filtering.
pub struct Combinations {
    slots: Vec<SlotOptions>,
    cursor: Vec<usize>,
    dims: usize,
    next_id: u64,
    done: bool,
}

impl Combinations {
    pub fn new(grouped: &[SlotGroups], dims: usize) -> Self {
        let slots: Vec<SlotOptions> = grouped
            .iter()
            .map(|g| SlotOptions {
                slot: g.slot.clone(),
                options: g.stat_options(),
            })
            .collect();
        let done = slots.is_empty() || slots.iter().any(|s| s.options.is_empty());

        Combinations {
            cursor: vec![0; slots.len()],
            slots,
            dims,
            next_id: 0,
            done,
        }
    }

    /// Total number of candidates the product holds (saturating)
    pub fn product_size(&self) -> u64 {
        if self.slots.is_empty() {
            return 0;
        }
        self.slots
            .iter()
            .fold(1u64, |acc, s| acc.saturating_mul(s.options.len() as u64))
    }

    /// Candidates produced so far
    pub fn processed(&self) -> u64 {
        self.next_id
    }

    fn advance(&mut self) {
        for pos in (0..self.cursor.len()).rev() {
            self.cursor[pos] += 1;
            if self.cursor[pos] < self.slots[pos].options.len() {
                return;
            }
            self.cursor[pos] = 0;
        }
        self.done = true;
    }
}

impl Iterator for Combinations {
    type Item = Combination;

    fn next(&mut self) -> Option<Combination> {
        if self.done {
            return None;
        }

        let choices: Vec<SlotChoice> = self
            .slots
            .iter()
            .zip(&self.cursor)
            .map(|(slot, &i)| {
                let (stats, groups) = &slot.options[i];
                SlotChoice {
                    slot: slot.slot.clone(),
                    stats: stats.clone(),
                    groups: groups.clone(),
                }
            })
            .collect();
        let total = StatVector::sum(self.dims, choices.iter().map(|c| &c.stats));

        let combination = Combination {
            id: self.next_id,
            choices,
            total,
        };
        self.next_id += 1;
        self.advance();

        Some(combination)
    }
}

/// Accepted combinations and how much of the product was walked
#[derive(Debug, Clone, Default)]
pub struct Enumeration {
    pub combinations: Vec<Combination>,
    /// Candidates handed to the validity check
    pub processed: u64,
    /// Size of the full product
    pub product: u64,
}

/// Walk the product, keeping candidates `is_valid` accepts.
///
/// `is_valid` is called exactly once per candidate. Cancellation is checked
/// before each candidate.
pub fn enumerate<F>(
    grouped: &[SlotGroups],
    dims: usize,
    is_valid: F,
    cancel: &CancelToken,
) -> RunOutcome<Enumeration>
where
    F: FnMut(&Combination) -> bool,
{
    Combinations::new(grouped, dims).collect_valid(is_valid, cancel)
}

impl Combinations {
    /// Drain the remaining candidates, keeping those `is_valid` accepts
    pub fn collect_valid<F>(
        mut self,
        mut is_valid: F,
        cancel: &CancelToken,
    ) -> RunOutcome<Enumeration>
    where
        F: FnMut(&Combination) -> bool,
    {
        let product = self.product_size();
        let mut combinations = Vec::new();

        loop {
            if cancel.is_cancelled() {
                return RunOutcome::Cancelled;
            }
            let Some(candidate) = self.next() else {
                break;
            };
            if is_valid(&candidate) {
                combinations.push(candidate);
            }
        }

        RunOutcome::Completed(Enumeration {
            combinations,
            processed: self.processed(),
            product,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::group_items;
    use gear_core::{Plug, Socket, StatDef};

    fn stats() -> Vec<StatDef> {
        vec![
            StatDef::new(1, "Mobility"),
            StatDef::new(2, "Resilience"),
            StatDef::new(3, "Recovery"),
        ]
    }

    fn rolled(id: &str, slot: &str, base: [i32; 3]) -> Item {
        Item::new(id, id, slot)
            .with_stat(1, base[0], base[0])
            .with_stat(2, base[1], base[1])
            .with_stat(3, base[2], base[2])
    }

    fn slot(name: &str, items: Vec<Item>) -> SlotGroups {
        group_items(SlotId::from(name), &items, &stats())
    }

    fn helm_and_gauntlets() -> Vec<SlotGroups> {
        let gauntlets = rolled("c", "gauntlets", [0, 0, 0]).with_socket(Socket::with_options(vec![
            Plug::new(10, "Resilient").with_bonus(2, 1),
            Plug::new(11, "Restorative").with_bonus(3, 1),
        ]));
        vec![
            slot(
                "helmet",
                vec![rolled("a", "helmet", [2, 0, 0]), rolled("b", "helmet", [2, 0, 0])],
            ),
            slot("gauntlets", vec![gauntlets]),
        ]
    }

    #[test]
    fn test_two_selectable_options_make_two_sets() {
        let grouped = helm_and_gauntlets();
        let result = enumerate(&grouped, 3, |_| true, &CancelToken::new())
            .completed()
            .unwrap();

        let totals: Vec<StatVector> = result.combinations.iter().map(|c| c.total.clone()).collect();
        assert_eq!(totals.len(), 2);
        assert!(totals.contains(&StatVector::from([2, 1, 0])));
        assert!(totals.contains(&StatVector::from([2, 0, 1])));
        assert_eq!(result.processed, 2);
        assert_eq!(result.product, 2);
    }

    #[test]
    fn test_choice_tracks_items() {
        let grouped = helm_and_gauntlets();
        let result = enumerate(&grouped, 3, |_| true, &CancelToken::new())
            .completed()
            .unwrap();

        let helmet = SlotId::from("helmet");
        let ids: Vec<&str> = result.combinations[0]
            .items_for(&helmet)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(result.combinations[0].items_for(&SlotId::from("leg")).is_empty());
    }

    #[test]
    fn test_total_is_sum_of_choices() {
        let grouped = helm_and_gauntlets();
        for combination in Combinations::new(&grouped, 3) {
            let sum = StatVector::sum(3, combination.chosen_stats());
            assert_eq!(combination.total, sum);
        }
    }

    #[test]
    fn test_last_slot_varies_fastest() {
        let grouped = vec![
            slot(
                "helmet",
                vec![rolled("a", "helmet", [1, 0, 0]), rolled("b", "helmet", [2, 0, 0])],
            ),
            slot(
                "chest",
                vec![rolled("c", "chest", [0, 1, 0]), rolled("d", "chest", [0, 2, 0])],
            ),
        ];

        let totals: Vec<StatVector> = Combinations::new(&grouped, 3).map(|c| c.total).collect();
        assert_eq!(
            totals,
            vec![
                StatVector::from([1, 1, 0]),
                StatVector::from([1, 2, 0]),
                StatVector::from([2, 1, 0]),
                StatVector::from([2, 2, 0]),
            ]
        );
    }

    #[test]
    fn test_ids_skip_rejected_candidates() {
        let grouped = vec![slot(
            "helmet",
            vec![
                rolled("a", "helmet", [1, 0, 0]),
                rolled("b", "helmet", [2, 0, 0]),
                rolled("c", "helmet", [3, 0, 0]),
            ],
        )];

        let result = enumerate(&grouped, 3, |c| c.total.get(0) != 2, &CancelToken::new())
            .completed()
            .unwrap();
        let ids: Vec<u64> = result.combinations.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(result.processed, 3);
    }

    #[test]
    fn test_empty_slot_empties_product() {
        let grouped = vec![
            slot("helmet", vec![rolled("a", "helmet", [1, 0, 0])]),
            slot("chest", vec![]),
        ];

        let mut calls = 0;
        let result = enumerate(
            &grouped,
            3,
            |_| {
                calls += 1;
                true
            },
            &CancelToken::new(),
        )
        .completed()
        .unwrap();

        assert!(result.combinations.is_empty());
        assert_eq!(result.product, 0);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_validity_called_once_per_candidate() {
        let grouped = helm_and_gauntlets();
        let mut calls = 0;
        enumerate(
            &grouped,
            3,
            |_| {
                calls += 1;
                false
            },
            &CancelToken::new(),
        );
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_cancelled_before_start() {
        let grouped = helm_and_gauntlets();
        let token = CancelToken::new();
        token.cancel();

        let result = enumerate(&grouped, 3, |_| true, &token);
        assert!(result.is_cancelled());
    }

    #[test]
    fn test_cancel_mid_run() {
        let grouped = vec![slot(
            "helmet",
            (0..10)
                .map(|i| rolled(&format!("h{}", i), "helmet", [i, 0, 0]))
                .collect(),
        )];
        let token = CancelToken::new();
        let mut calls = 0;

        let result = enumerate(
            &grouped,
            3,
            |_| {
                calls += 1;
                if calls == 3 {
                    token.cancel();
                }
                true
            },
            &token,
        );

        assert!(result.is_cancelled());
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_product_size() {
        let grouped = helm_and_gauntlets();
        assert_eq!(Combinations::new(&grouped, 3).product_size(), 2);
        assert_eq!(Combinations::new(&[], 3).product_size(), 0);
        assert_eq!(Combinations::new(&[], 3).count(), 0);
    }
}
