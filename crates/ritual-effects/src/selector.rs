//! Random selection of cached candidates.
//!
//! Selection is always uniform over the current entries. Strength shapes how
//! often a variant acts ([`pick_by_chance`]) and how much progress one pick
//! carries ([`pick_with_repetition`]), never which entry is chosen.

use rand::Rng;

use crate::store::{CandidateEntry, CandidateKey, CandidateStore};

/// A picked candidate plus the number of additional ticks-worth of progress
/// to apply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatedPick<K> {
    /// The picked candidate.
    pub key: K,
    /// Extra progress steps on top of the regular one.
    pub repetitions: u32,
}

/// A uniformly random entry, or `None` if the store is empty.
pub fn pick_any<'a, K, T, R>(
    store: &'a CandidateStore<K, T>,
    rng: &mut R,
) -> Option<&'a CandidateEntry<K, T>>
where
    K: CandidateKey,
    R: Rng + ?Sized,
{
    store.random_element(rng)
}

/// A uniformly random entry, but only if one roll below `chance` succeeds.
pub fn pick_by_chance<'a, K, T, R>(
    store: &'a CandidateStore<K, T>,
    rng: &mut R,
    chance: f32,
) -> Option<&'a CandidateEntry<K, T>>
where
    K: CandidateKey,
    R: Rng + ?Sized,
{
    if rng.random::<f32>() < chance {
        store.random_element(rng)
    } else {
        None
    }
}

/// Upper bound on the length of one repetition chain.
pub const MAX_REPETITIONS: u16 = 64;

/// Count successes of a decaying Bernoulli chain.
///
/// The `n`th roll succeeds when `rng < strength - n * step`; the chain stops
/// at the first failure, once that threshold reaches zero, or after
/// [`MAX_REPETITIONS`] successes. The result never exceeds
/// `min(ceil(strength / step), MAX_REPETITIONS)`. Steps that are not
/// positive finite numbers yield zero repetitions.
pub fn repetitions<R: Rng + ?Sized>(rng: &mut R, strength: f32, step: f32) -> u32 {
    if !step.is_finite() || step <= 0.0 || !strength.is_finite() {
        return 0;
    }
    let mut count: u16 = 0;
    while count < MAX_REPETITIONS {
        // Recomputed from the start so a step below the float spacing of
        // `strength` still ends the chain.
        let remaining = step.mul_add(-f32::from(count), strength);
        if remaining <= 0.0 || rng.random::<f32>() >= remaining {
            break;
        }
        count = count.saturating_add(1);
    }
    u32::from(count)
}

/// A uniformly random entry plus its repetition count for `strength`.
pub fn pick_with_repetition<K, T, R>(
    store: &CandidateStore<K, T>,
    rng: &mut R,
    strength: f32,
    step: f32,
) -> Option<RepeatedPick<K>>
where
    K: CandidateKey,
    R: Rng + ?Sized,
{
    let key = store.random_key(rng)?;
    Some(RepeatedPick {
        key,
        repetitions: repetitions(rng, strength, step),
    })
}
