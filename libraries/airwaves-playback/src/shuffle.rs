//! Seeded shuffle permutations
//!
//! The engine never uses ambient randomness: every permutation is derived
//! from an explicit seed so a command stream replays identically.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Build a shuffle permutation over `len` natural indices.
///
/// The currently playing index comes first so enabling shuffle never
/// interrupts the running track; the remaining indices are shuffled with a
/// seeded Fisher-Yates.
pub fn shuffled_order(len: usize, current: usize, seed: u64) -> Vec<usize> {
    debug_assert!(current < len);

    let mut rest: Vec<usize> = (0..len).filter(|&i| i != current).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    rest.shuffle(&mut rng);

    let mut order = Vec::with_capacity(len);
    order.push(current);
    order.extend(rest);
    order
}
