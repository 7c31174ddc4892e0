//! Weighted random tables for loot drops and ore picks.

use rand::Rng;
use ritual_types::{Item, OreKind};

/// A list of outcomes with integer weights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedTable<T> {
    /// Outcomes with non-zero weight.
    entries: Vec<(T, u32)>,
    /// Sum of all weights.
    total: u32,
}

impl<T: Copy> WeightedTable<T> {
    /// Build a table. Zero-weight entries are dropped.
    pub fn new(entries: impl IntoIterator<Item = (T, u32)>) -> Self {
        let entries: Vec<(T, u32)> = entries.into_iter().filter(|&(_, w)| w > 0).collect();
        let total = entries
            .iter()
            .fold(0_u32, |acc, &(_, weight)| acc.saturating_add(weight));
        Self { entries, total }
    }

    /// Sum of all weights.
    pub const fn total_weight(&self) -> u32 {
        self.total
    }

    /// Whether the table has no outcomes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The outcome at `roll` in `[0, total_weight())`.
    fn select(&self, roll: u32) -> Option<T> {
        let mut cumulative: u32 = 0;
        for &(outcome, weight) in &self.entries {
            cumulative = cumulative.saturating_add(weight);
            if roll < cumulative {
                return Some(outcome);
            }
        }
        None
    }

    /// A random outcome with probability proportional to its weight, or
    /// `None` for an empty table.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<T> {
        if self.total == 0 {
            return None;
        }
        self.select(rng.random_range(0..self.total))
    }
}

/// What a fishing catch can be.
pub fn fishing_loot() -> WeightedTable<Item> {
    WeightedTable::new([
        (Item::Cod, 60),
        (Item::Salmon, 25),
        (Item::Pufferfish, 13),
        (Item::TropicalFish, 2),
        (Item::SoggyBoot, 10),
        (Item::NautilusShell, 1),
    ])
}

/// Ore kinds at their natural abundance.
pub fn ore_table() -> WeightedTable<OreKind> {
    WeightedTable::new(OreKind::ALL.map(|ore| (ore, ore.default_weight())))
}
