//! Degree sequences, the Havel-Hakimi graphicality test, and the degree
//! generator that targets a given sum.

use serde::{Deserialize, Serialize};
use specx_core::errors::{ErrorInfo, SpecxError};
use specx_core::rng::RngHandle;

/// A degree sequence, position-indexed (not sorted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeSequence(Vec<u32>);

impl DegreeSequence {
    /// Wraps a raw `Vec<u32>` as a degree sequence without validation.
    pub fn new(degrees: Vec<u32>) -> Self {
        DegreeSequence(degrees)
    }

    /// Number of vertices.
    pub fn n(&self) -> usize {
        self.0.len()
    }

    /// Sum of degrees, i.e. twice the edge count of any realization.
    pub fn sum(&self) -> u64 {
        self.0.iter().map(|&d| d as u64).sum()
    }

    /// Borrowed view of the degrees, in original order.
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Consumes the sequence, returning the underlying vector.
    pub fn into_vec(self) -> Vec<u32> {
        self.0
    }
}

impl From<Vec<u32>> for DegreeSequence {
    fn from(degrees: Vec<u32>) -> Self {
        DegreeSequence(degrees)
    }
}

/// Havel-Hakimi graphicality test: repeatedly drop zeros, sort descending,
/// pop the head `x`, and subtract 1 from the next `x` remaining entries.
/// Fails if `x` is negative or exceeds the remaining length, or if any
/// entry goes negative during subtraction. Accepts when the list empties
/// out cleanly.
pub fn is_graphical(degrees: &[u32]) -> bool {
    let mut d: Vec<i64> = degrees.iter().map(|&x| x as i64).collect();

    loop {
        d.retain(|&x| x > 0);
        if d.is_empty() {
            return true;
        }

        d.sort_unstable_by(|a, b| b.cmp(a));
        let x = d.remove(0);

        if x < 0 || x as usize > d.len() {
            return false;
        }

        for slot in d.iter_mut().take(x as usize) {
            *slot -= 1;
            if *slot < 0 {
                return false;
            }
        }
    }
}

/// Draws a degree sequence of length `n` with sum exactly `2 * k`, and
/// every entry in `[0, n - 1]`.
///
/// Draws each entry uniformly in `[0, n)`, rescales towards the target sum
/// (clipping to `n - 1`), then repeatedly increments/decrements random
/// entries until the sum matches exactly and every entry is in range.
/// Retries the whole draw up to `max_attempts` times before giving up. Does
/// **not** guarantee the result is graphical -- callers must check with
/// [`is_graphical`].
pub fn generate_fixed_sum(
    n: usize,
    k: u64,
    rng: &mut RngHandle,
    max_attempts: u32,
) -> Result<DegreeSequence, SpecxError> {
    use rand::Rng;

    if n == 0 {
        return Err(SpecxError::validation(
            "empty_degree_sequence",
            "generate_fixed_sum requires n >= 1",
        ));
    }

    let target: i64 = 2 * k as i64;
    let cap = (n - 1) as i64;

    for _attempt in 0..max_attempts {
        let mut deg: Vec<i64> = (0..n).map(|_| rng.gen_range(0..n) as i64).collect();
        let mut s: i64 = deg.iter().sum();

        if s == 0 {
            let idx = rng.gen_range(0..n);
            deg[idx] = 1;
            s = 1;
        }

        let scale = target as f64 / s as f64;
        for d in deg.iter_mut() {
            *d = (((*d as f64) * scale) as i64).min(cap);
        }
        let mut s: i64 = deg.iter().sum();

        while s < target {
            let idx = rng.gen_range(0..n);
            if deg[idx] < cap {
                deg[idx] += 1;
                s += 1;
            }
        }
        while s > target {
            let idx = rng.gen_range(0..n);
            if deg[idx] > 0 {
                deg[idx] -= 1;
                s -= 1;
            }
        }

        if s == target && deg.iter().all(|&d| (0..=cap).contains(&d)) {
            let degrees: Vec<u32> = deg.into_iter().map(|d| d as u32).collect();
            return Ok(DegreeSequence::new(degrees));
        }
    }

    Err(SpecxError::LimitExceeded(
        ErrorInfo::new(
            "generate_fixed_sum_attempts_exceeded",
            "generate_fixed_sum: max_attempts exceeded",
        )
        .with_context("n", n.to_string())
        .with_context("k", k.to_string())
        .with_context("max_attempts", max_attempts.to_string()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn k4_is_graphical() {
        assert!(is_graphical(&[3, 3, 3, 3]));
    }

    #[test]
    fn path5_is_graphical() {
        assert!(is_graphical(&[1, 2, 2, 2, 1]));
    }

    #[test]
    fn cycle5_is_graphical() {
        assert!(is_graphical(&[2, 2, 2, 2, 2]));
    }

    #[test]
    fn three_three_one_is_not_graphical() {
        assert!(!is_graphical(&[3, 3, 1]));
    }

    #[test]
    fn generator_hits_target_sum() {
        let mut rng = RngHandle::from_seed(1);
        let deg = generate_fixed_sum(30, 120, &mut rng, 2000).unwrap();
        assert_eq!(deg.n(), 30);
        assert_eq!(deg.sum(), 240);
        assert!(deg.as_slice().iter().all(|&d| d <= 29));
    }

    #[test]
    fn generator_is_deterministic_for_seed() {
        let mut rng_a = RngHandle::from_seed(7);
        let mut rng_b = RngHandle::from_seed(7);
        let a = generate_fixed_sum(20, 40, &mut rng_a, 2000).unwrap();
        let b = generate_fixed_sum(20, 40, &mut rng_b, 2000).unwrap();
        assert_eq!(a, b);
    }
}
