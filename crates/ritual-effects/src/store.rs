//! Bounded candidate cache owned by one ritual instance.
//!
//! A [`CandidateStore`] holds at most `capacity` entries, each keyed by a
//! position (or an entity, for the entity-collecting variants) and carrying a
//! variant-specific payload. Entries live in a `Vec` for O(1) uniform random
//! picks; a side index keeps keys unique. Removal swaps the last entry into
//! the freed slot, so entry order is irrelevant and not preserved.
//!
//! Every entry was accepted by the variant's verifier when it was inserted,
//! but the world keeps changing: entries may go stale and are pruned lazily
//! by the dispatcher when picked.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use rand::Rng;
use ritual_types::{EntityId, Position};
use ritual_world::World;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Something a candidate can be keyed by.
pub trait CandidateKey: Copy + Eq + Hash + fmt::Debug {
    /// Where the candidate currently is, or `None` if it no longer exists.
    fn locate(self, world: &dyn World) -> Option<Position>;
}

impl CandidateKey for Position {
    fn locate(self, _world: &dyn World) -> Option<Position> {
        Some(self)
    }
}

impl CandidateKey for EntityId {
    fn locate(self, world: &dyn World) -> Option<Position> {
        world.entity(self).map(|entity| entity.position)
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// One cached candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEntry<K, T> {
    /// The candidate's key.
    key: K,
    /// Variant-specific state, e.g. a progress counter.
    pub payload: T,
}

impl<K: Copy, T> CandidateEntry<K, T> {
    /// The candidate's key.
    pub const fn key(&self) -> K {
        self.key
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// A bounded set of candidates with unique keys.
#[derive(Debug, Clone)]
pub struct CandidateStore<K, T> {
    /// Entries in arbitrary order.
    entries: Vec<CandidateEntry<K, T>>,
    /// Key to slot in `entries`.
    index: HashMap<K, usize>,
    /// Maximum number of entries.
    capacity: usize,
    /// Half-width of the cube searched for new candidates.
    search_radius: u32,
}

impl<K: CandidateKey, T> CandidateStore<K, T> {
    /// Create an empty store.
    pub fn new(capacity: usize, search_radius: u32) -> Self {
        Self {
            entries: Vec::with_capacity(capacity.min(1024)),
            index: HashMap::new(),
            capacity,
            search_radius,
        }
    }

    /// Insert a candidate if there is room and the key is not present.
    ///
    /// Returns whether the entry was inserted. A rejected insert leaves the
    /// store untouched.
    pub fn try_add(&mut self, key: K, payload: T) -> bool {
        if self.is_full() || self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.entries.len());
        self.entries.push(CandidateEntry { key, payload });
        true
    }

    /// Remove a candidate. Removing an absent key is a no-op.
    ///
    /// Returns whether an entry was removed.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(slot) = self.index.remove(key) else {
            return false;
        };
        if slot >= self.entries.len() {
            return false;
        }
        self.entries.swap_remove(slot);
        if let Some(moved) = self.entries.get(slot) {
            self.index.insert(moved.key, slot);
        }
        true
    }

    /// A uniformly random entry, or `None` if the store is empty.
    pub fn random_element<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&CandidateEntry<K, T>> {
        if self.entries.is_empty() {
            return None;
        }
        let slot = rng.random_range(0..self.entries.len());
        self.entries.get(slot)
    }

    /// The key of a uniformly random entry.
    pub fn random_key<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<K> {
        self.random_element(rng).map(CandidateEntry::key)
    }

    /// Look up an entry.
    pub fn get(&self, key: &K) -> Option<&CandidateEntry<K, T>> {
        self.index.get(key).and_then(|&slot| self.entries.get(slot))
    }

    /// Look up an entry for mutation of its payload.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut CandidateEntry<K, T>> {
        let slot = *self.index.get(key)?;
        self.entries.get_mut(slot)
    }

    /// Whether the key is cached.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether another insert would be rejected for lack of room.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Maximum number of entries.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Half-width of the candidate search cube.
    pub const fn search_radius(&self) -> u32 {
        self.search_radius
    }

    /// Iterate over entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &CandidateEntry<K, T>> {
        self.entries.iter()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Keep only the entries for which `keep` returns true.
    pub fn retain(&mut self, keep: impl FnMut(&CandidateEntry<K, T>) -> bool) {
        self.entries.retain(keep);
        self.reindex();
    }

    /// Change the capacity. Shrinking below the current length drops the
    /// surplus entries.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        if self.entries.len() > capacity {
            self.entries.truncate(capacity);
            self.reindex();
        }
    }

    /// Change the half-width of the search cube.
    pub const fn set_search_radius(&mut self, radius: u32) {
        self.search_radius = radius;
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (slot, entry) in self.entries.iter().enumerate() {
            self.index.insert(entry.key, slot);
        }
    }
}
