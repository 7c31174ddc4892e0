//! Opportunistic candidate discovery.
//!
//! Each call to [`find_new`] draws exactly one random position from the cube
//! of half-width `radius` around the origin, so a call costs O(1) no matter
//! how large the radius is. Variants call it a small fixed number of times
//! per tick to grow their store over time.

use rand::Rng;
use ritual_types::{EntityId, EntitySnapshot, Offset, Position};
use ritual_world::World;

use crate::store::CandidateStore;

// ---------------------------------------------------------------------------
// Predicates and factories
// ---------------------------------------------------------------------------

/// Tests whether a candidate currently qualifies for an effect.
pub trait Verifier<K = Position> {
    /// Whether `key` qualifies in `world`.
    fn verify(&self, world: &dyn World, key: K) -> bool;
}

impl<K, F> Verifier<K> for F
where
    F: Fn(&dyn World, K) -> bool,
{
    fn verify(&self, world: &dyn World, key: K) -> bool {
        self(world, key)
    }
}

/// Builds a candidate's payload once it passed verification.
pub trait Generator<K, T> {
    /// The payload for a freshly accepted candidate.
    fn generate(&self, key: K) -> T;
}

impl<K, T, F> Generator<K, T> for F
where
    F: Fn(K) -> T,
{
    fn generate(&self, key: K) -> T {
        self(key)
    }
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

/// A uniformly random offset inside `[-radius, radius]` on every axis.
pub fn sample_offset<R: Rng + ?Sized>(rng: &mut R, radius: u32) -> Offset {
    let r = i32::try_from(radius).unwrap_or(i32::MAX);
    let lo = r.saturating_neg();
    Offset::new(
        rng.random_range(lo..=r),
        rng.random_range(lo..=r),
        rng.random_range(lo..=r),
    )
}

/// A uniformly random position in the cube of half-width `radius` around
/// `origin`.
pub fn sample_position<R: Rng + ?Sized>(rng: &mut R, origin: Position, radius: u32) -> Position {
    origin.offset(sample_offset(rng, radius))
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Sample one position and cache it if it qualifies.
///
/// Returns whether an entry was added. A full store short-circuits before
/// sampling; unloaded and already cached positions are skipped without
/// consulting the verifier; the generator only runs for positions that will
/// be inserted.
pub fn find_new<T, R, V, G>(
    world: &dyn World,
    rng: &mut R,
    origin: Position,
    radius: u32,
    verifier: &V,
    generator: &G,
    store: &mut CandidateStore<Position, T>,
) -> bool
where
    R: Rng + ?Sized,
    V: Verifier + ?Sized,
    G: Generator<Position, T> + ?Sized,
{
    if store.is_full() {
        return false;
    }
    let candidate = sample_position(rng, origin, radius);
    if !world.is_loaded(candidate) || store.contains(&candidate) {
        return false;
    }
    if !verifier.verify(world, candidate) {
        return false;
    }
    store.try_add(candidate, generator.generate(candidate))
}

/// Cache every entity within `radius` of `origin` that passes `filter`,
/// until the store is full.
///
/// Returns how many entries were added. Entities in unloaded chunks are
/// never reported by the world, so they are never cached.
pub fn find_new_entities<T, F, G>(
    world: &dyn World,
    origin: Position,
    radius: u32,
    filter: F,
    generator: &G,
    store: &mut CandidateStore<EntityId, T>,
) -> usize
where
    F: Fn(&EntitySnapshot) -> bool,
    G: Generator<EntitySnapshot, T> + ?Sized,
{
    let mut added: usize = 0;
    for entity in world.entities_in_radius(origin, radius) {
        if store.is_full() {
            break;
        }
        if store.contains(&entity.id) || !filter(&entity) {
            continue;
        }
        if store.try_add(entity.id, generator.generate(entity)) {
            added = added.saturating_add(1);
        }
    }
    added
}
