//! The [`EffectStrategy`] trait every effect variant implements.
//!
//! A strategy supplies the variant-specific pieces (what qualifies, what a
//! candidate carries, how it is mutated, what corruption does); the
//! dispatcher supplies the shared machinery around them.

use ritual_types::{CellState, EntityId, EntitySnapshot, Position, VariantKind};
use ritual_world::World;

use crate::context::EffectContext;
use crate::search::{find_new, find_new_entities};
use crate::store::{CandidateEntry, CandidateKey, CandidateStore};

/// Number of single-sample searches a position-keyed variant runs per tick.
pub const REPLENISH_ATTEMPTS: u32 = 2;

/// What a benign mutation did to its candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Nothing happened; the candidate stays for a retry.
    Unchanged,
    /// Progress was recorded in the payload; the world is untouched.
    Progressed,
    /// The world changed and the candidate stays cached.
    Applied,
    /// The world changed and the candidate is used up.
    Consumed,
}

impl Mutation {
    /// Whether the world was mutated.
    pub const fn changed_world(self) -> bool {
        matches!(self, Self::Applied | Self::Consumed)
    }

    /// Whether the candidate must be dropped from the store.
    pub const fn consumes_entry(self) -> bool {
        matches!(self, Self::Consumed)
    }
}

/// Variant-specific behaviour plugged into the dispatcher.
pub trait EffectStrategy {
    /// What candidates are keyed by.
    type Key: CandidateKey;
    /// Per-candidate state.
    type Payload;

    /// Which variant this is.
    fn kind(&self) -> VariantKind;

    /// Whether `key` currently qualifies. Called on insertion and again
    /// every time the candidate is picked.
    fn verify(&self, world: &dyn World, key: Self::Key) -> bool;

    /// The payload for a freshly accepted candidate.
    fn generate(&self, key: Self::Key) -> Self::Payload;

    /// Try to grow the store. Returns how many candidates were added.
    fn replenish(
        &self,
        ctx: &mut EffectContext<'_>,
        store: &mut CandidateStore<Self::Key, Self::Payload>,
    ) -> usize;

    /// Decay step of the repetition chain, for variants whose progress
    /// scales with strength.
    fn repetition_step(&self) -> Option<f32> {
        None
    }

    /// Chance that a candidate is picked at all this tick, for variants that
    /// act on their cache only some of the time.
    fn pick_chance(&self) -> Option<f32> {
        None
    }

    /// Apply the benign effect to a verified candidate. `repetitions` is the
    /// number of extra progress steps earned this tick.
    fn mutate(
        &self,
        ctx: &mut EffectContext<'_>,
        entry: &mut CandidateEntry<Self::Key, Self::Payload>,
        repetitions: u32,
    ) -> Mutation;

    /// Apply the destructive effect at a sampled, loaded position. Returns
    /// whether the world changed.
    fn corrupt(&self, ctx: &mut EffectContext<'_>, target: Position) -> bool;

    /// Area-wide benign work that does not go through the store. Returns
    /// whether the world changed.
    fn ambient(&self, _ctx: &mut EffectContext<'_>) -> bool {
        false
    }

    /// The candidate key for a scanned position, for variants that accept
    /// background scan results.
    fn key_at(&self, _pos: Position) -> Option<Self::Key> {
        None
    }

    /// Which snapshot cells a background scan should report for this
    /// variant.
    fn scan_filter(&self) -> Option<fn(CellState) -> bool> {
        None
    }
}

/// Run [`REPLENISH_ATTEMPTS`] single-sample searches around the origin with
/// the strategy's verifier and generator.
pub fn replenish_positions<S>(
    strategy: &S,
    ctx: &mut EffectContext<'_>,
    store: &mut CandidateStore<Position, S::Payload>,
) -> usize
where
    S: EffectStrategy<Key = Position> + ?Sized,
{
    let verifier = |world: &dyn World, pos: Position| strategy.verify(world, pos);
    let generator = |pos: Position| strategy.generate(pos);
    let radius = store.search_radius();
    let mut added: usize = 0;
    for _ in 0..REPLENISH_ATTEMPTS {
        if find_new(
            &*ctx.world,
            &mut *ctx.rng,
            ctx.origin,
            radius,
            &verifier,
            &generator,
            store,
        ) {
            added = added.saturating_add(1);
        }
    }
    added
}

/// Cache every qualifying entity around the origin until the store is full.
pub fn replenish_entities<S>(
    strategy: &S,
    ctx: &EffectContext<'_>,
    store: &mut CandidateStore<EntityId, S::Payload>,
) -> usize
where
    S: EffectStrategy<Key = EntityId> + ?Sized,
{
    if store.is_full() {
        return 0;
    }
    let world: &dyn World = &*ctx.world;
    let radius = store.search_radius();
    find_new_entities(
        world,
        ctx.origin,
        radius,
        |entity: &EntitySnapshot| strategy.verify(world, entity.id),
        &|entity: EntitySnapshot| strategy.generate(entity.id),
        store,
    )
}
