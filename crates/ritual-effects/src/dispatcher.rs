//! The per-tick entry point for one ritual instance.
//!
//! [`dispatch`] decides whether the instance acts this tick and then runs
//! either the benign branch, which works through the candidate store, or the
//! corrupted branch, which mutates one directly sampled position and never
//! touches the store.
//!
//! # Benign branch
//!
//! 1. Replenish the store through the strategy's search.
//! 2. Pick one candidate uniformly (with a repetition count for variants
//!    whose progress scales with strength, or behind one chance roll for
//!    variants that declare a pick chance).
//! 3. Skip it if its position is unloaded; drop it if it vanished, left the
//!    search cube, or no longer passes the verifier.
//! 4. Otherwise mutate it, and drop it if the mutation consumed it.
//! 5. Run the strategy's ambient hook.

use rand::Rng;
use ritual_types::{EffectEvent, Position};
use tracing::debug;

use crate::config::VariantConfig;
use crate::context::EffectContext;
use crate::search::sample_position;
use crate::selector::{RepeatedPick, pick_any, pick_by_chance, pick_with_repetition};
use crate::store::{CandidateEntry, CandidateKey, CandidateStore};
use crate::strategy::{EffectStrategy, Mutation};

/// Which branch a dispatch ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchState {
    /// Disabled, or the strength roll failed.
    Idle,
    /// The constructive branch operating through the store.
    BenignApply,
    /// The destructive branch operating on a sampled position.
    CorruptedApply,
}

/// What one dispatch did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Which branch ran.
    pub state: DispatchState,
    /// Whether the world or the store changed.
    pub changed: bool,
    /// The position sampled by the corrupted branch.
    pub sampled: Option<Position>,
    /// Candidates added by replenishment.
    pub candidates_added: usize,
    /// Candidates dropped because they went stale.
    pub stale_removed: usize,
    /// Candidates dropped because their mutation used them up.
    pub consumed: usize,
    /// Events broadcast during the dispatch.
    pub events: Vec<EffectEvent>,
}

impl TickReport {
    /// A report for a dispatch that did nothing.
    pub const fn idle() -> Self {
        Self::new(DispatchState::Idle)
    }

    const fn new(state: DispatchState) -> Self {
        Self {
            state,
            changed: false,
            sampled: None,
            candidates_added: 0,
            stale_removed: 0,
            consumed: 0,
            events: Vec::new(),
        }
    }
}

/// Run one tick of a ritual instance.
///
/// `ctx.strength` holds the incoming strength on entry and is replaced by
/// the effective strength (scaled by the potency multiplier).
pub fn dispatch<S>(
    strategy: &S,
    config: &VariantConfig,
    store: &mut CandidateStore<S::Key, S::Payload>,
    ctx: &mut EffectContext<'_>,
) -> TickReport
where
    S: EffectStrategy + ?Sized,
{
    if !config.enabled {
        return TickReport::idle();
    }

    let effective = ctx.strength * config.potency_multiplier;
    ctx.strength = effective;
    if effective < 1.0 && ctx.rng.random::<f32>() > effective {
        debug!(ritual = %ctx.ritual, variant = %ctx.variant, effective, "strength roll failed");
        return TickReport::idle();
    }

    let mut report = if ctx.properties.corrupted {
        apply_corrupted(strategy, ctx)
    } else {
        apply_benign(strategy, store, ctx)
    };
    report.events = ctx.events().to_vec();
    report.changed = report.changed || !report.events.is_empty();

    debug!(
        ritual = %ctx.ritual,
        variant = %ctx.variant,
        state = ?report.state,
        changed = report.changed,
        sampled = ?report.sampled,
        "dispatch finished"
    );
    report
}

fn apply_corrupted<S>(strategy: &S, ctx: &mut EffectContext<'_>) -> TickReport
where
    S: EffectStrategy + ?Sized,
{
    let mut report = TickReport::new(DispatchState::CorruptedApply);
    let target = sample_position(&mut *ctx.rng, ctx.origin, ctx.properties.size);
    report.sampled = Some(target);
    if ctx.world.is_loaded(target) {
        report.changed = strategy.corrupt(ctx, target);
    }
    report
}

fn apply_benign<S>(
    strategy: &S,
    store: &mut CandidateStore<S::Key, S::Payload>,
    ctx: &mut EffectContext<'_>,
) -> TickReport
where
    S: EffectStrategy + ?Sized,
{
    let mut report = TickReport::new(DispatchState::BenignApply);
    report.candidates_added = strategy.replenish(ctx, store);
    report.changed = report.candidates_added > 0;

    let pick = match (strategy.repetition_step(), strategy.pick_chance()) {
        (Some(step), _) => pick_with_repetition(store, &mut *ctx.rng, ctx.strength, step),
        (None, Some(chance)) => pick_by_chance(store, &mut *ctx.rng, chance).map(single),
        (None, None) => pick_any(store, &mut *ctx.rng).map(single),
    };

    if let Some(RepeatedPick { key, repetitions }) = pick {
        match classify(strategy, store, ctx, key) {
            Candidate::Unloaded => {}
            Candidate::Stale => {
                store.remove(&key);
                report.stale_removed = 1;
                report.changed = true;
            }
            Candidate::Live => {
                let mutation = store
                    .get_mut(&key)
                    .map_or(Mutation::Unchanged, |entry| strategy.mutate(ctx, entry, repetitions));
                if mutation.consumes_entry() {
                    store.remove(&key);
                    report.consumed = 1;
                }
                report.changed = report.changed || mutation.changed_world();
            }
        }
    }

    if strategy.ambient(ctx) {
        report.changed = true;
    }
    debug!(
        ritual = %ctx.ritual,
        added = report.candidates_added,
        stale = report.stale_removed,
        consumed = report.consumed,
        cached = store.len(),
        "benign pass finished"
    );
    report
}

const fn single<K: CandidateKey, T>(entry: &CandidateEntry<K, T>) -> RepeatedPick<K> {
    RepeatedPick {
        key: entry.key(),
        repetitions: 0,
    }
}

/// Freshness of a picked candidate.
enum Candidate {
    /// Its position is not simulated right now; leave it for later.
    Unloaded,
    /// It vanished, left the search cube, or no longer qualifies.
    Stale,
    /// It still qualifies.
    Live,
}

fn classify<S>(
    strategy: &S,
    store: &CandidateStore<S::Key, S::Payload>,
    ctx: &EffectContext<'_>,
    key: S::Key,
) -> Candidate
where
    S: EffectStrategy + ?Sized,
{
    let world = &*ctx.world;
    let Some(pos) = key.locate(world) else {
        return Candidate::Stale;
    };
    if !world.is_loaded(pos) {
        return Candidate::Unloaded;
    }
    if !ctx.origin.within(pos, store.search_radius()) || !strategy.verify(world, key) {
        return Candidate::Stale;
    }
    Candidate::Live
}
