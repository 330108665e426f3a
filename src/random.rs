//! Seeded random sources.
//!
//! Every stochastic component of the engine takes `&mut EvolveRng`, so a
//! fixed seed reproduces a run exactly.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};

/// The random generator used by selectors, alterers, and the engine.
pub type EvolveRng = StdRng;

/// Creates a generator from a seed.
pub fn create_rng(seed: u64) -> EvolveRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from a seed drawn from another generator.
///
/// Consumes exactly one `u64` from `parent`.
pub fn fork_rng<R: RngCore>(parent: &mut R) -> EvolveRng {
    create_rng(parent.next_u64())
}

/// Fisher-Yates shuffle.
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}
