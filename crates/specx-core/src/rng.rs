//! Deterministic RNG wrapper and seed-derivation helpers.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Deterministic RNG handle exposed to specx consumers.
///
/// The handle is a thin wrapper around `StdRng` that documents the seeding
/// policy used throughout the engine. A master `seed: u64` must be supplied
/// by the caller (directly by the user, or derived per autosearch
/// iteration). Every randomized operation in the engine -- degree
/// generation, realizer tie-breaking, 2-switch selection, connectivity
/// repair, simulated annealing acceptance -- is seeded from a `RngHandle`
/// constructed from an explicit `u64`, never from a shared or ambient RNG,
/// so that a given seed reproduces a given run on any platform.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Creates a new RNG handle from a master seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a new RNG handle seeded from OS entropy. This is the
    /// `random.Random(None)` case: every call draws fresh randomness, so
    /// two handles built this way are not expected to agree, and a run
    /// built from one cannot be reproduced from its (absent) seed.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a handle from an explicit seed when given one, or from OS
    /// entropy otherwise -- the `Option<u64>` seeding contract used
    /// throughout the CLI and orchestrator.
    pub fn from_seed_or_entropy(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }

    /// Returns a mutable reference to the underlying RNG for advanced usage
    /// (e.g. passing directly to `rand::seq` helpers).
    pub fn inner_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl RngCore for RngHandle {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Derives a deterministic seed for a hash-identified substream.
///
/// Most substream seeds in the autosearch orchestrator are plain integer
/// arithmetic on the base seed (`base_seed + i`, `base_seed * 1000 + rr`)
/// per the orchestrator's own seeding contract. This helper is for callers
/// that want a substream keyed by an arbitrary `u64` label instead (e.g. a
/// fingerprint-derived id) without risking collisions with the arithmetic
/// scheme; it hashes `(master_seed, substream)` with SipHash-1-3 under
/// fixed zero keys, which is stable across processes and platforms.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RngHandle::from_seed(42);
        let mut b = RngHandle::from_seed(42);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn entropy_handles_do_not_collide() {
        let mut a = RngHandle::from_entropy();
        let mut b = RngHandle::from_entropy();
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn substream_seed_is_deterministic() {
        let s1 = derive_substream_seed(7, 3);
        let s2 = derive_substream_seed(7, 3);
        assert_eq!(s1, s2);
        assert_ne!(s1, derive_substream_seed(7, 4));
    }
}
