//! Degree-sequence realizers: deterministic greedy, randomized greedy, and
//! exact backtracking.

use rand::seq::SliceRandom;
use specx_core::errors::{ErrorInfo, SpecxError};
use specx_core::rng::RngHandle;

use crate::edges::EdgeSet;

fn validate_degrees(degrees: &[u32], n: usize) -> Result<(), SpecxError> {
    if degrees.iter().any(|&d| d as usize >= n) {
        return Err(SpecxError::validation(
            "degree_exceeds_n_minus_1",
            "degree sequence has an entry exceeding n - 1",
        ));
    }
    Ok(())
}

/// Shared Havel-Hakimi realization core. When `rng` is `Some`, the top pool
/// of `k` candidates (or more precisely, the order in which the current
/// highest-degree vertex attaches to its chosen targets) is shuffled before
/// connecting, giving the randomized-greedy variant; `None` gives the
/// deterministic variant.
fn havel_hakimi_realize(
    degrees: &[u32],
    rng: Option<&mut RngHandle>,
) -> Result<EdgeSet, SpecxError> {
    let n = degrees.len();
    validate_degrees(degrees, n)?;

    let mut items: Vec<(i64, usize)> = degrees.iter().enumerate().map(|(i, &d)| (d as i64, i)).collect();
    let mut edge_set: std::collections::BTreeSet<(u32, u32)> = std::collections::BTreeSet::new();
    let mut rng = rng;

    loop {
        items.sort_by(|a, b| b.0.cmp(&a.0));

        if items[0].0 == 0 {
            break;
        }

        let (k, v) = items.remove(0);

        if k < 0 {
            return Err(SpecxError::non_graphical(
                "negative_remainder",
                "non-graphical (negative remainder)",
            ));
        }
        if k as usize > items.len() {
            return Err(SpecxError::non_graphical(
                "degree_too_large",
                "non-graphical (degree too large)",
            ));
        }

        let mut targets: Vec<usize> = (0..k as usize).collect();
        if let Some(rng) = rng.as_deref_mut() {
            if k > 1 {
                targets.shuffle(rng.inner_mut());
            }
        }

        for idx in targets {
            let (dk, u) = items[idx];
            if dk <= 0 {
                return Err(SpecxError::non_graphical(
                    "ran_out_of_degree",
                    "non-graphical (ran out of degree)",
                ));
            }
            let key = if v < u { (v as u32, u as u32) } else { (u as u32, v as u32) };
            if edge_set.contains(&key) {
                return Err(SpecxError::non_graphical(
                    "would_create_multiedge",
                    "failed realization (would create multiedge)",
                ));
            }
            edge_set.insert(key);
            items[idx] = (dk - 1, u);
        }
    }

    Ok(EdgeSet::normalize(n, edge_set))
}

/// Deterministic Havel-Hakimi realization (C3, greedy variant). Picks the
/// highest-remaining-degree vertex and connects it to the next `k`
/// highest-remaining-degree vertices in stable, deterministic order.
pub fn greedy(degrees: &[u32]) -> Result<EdgeSet, SpecxError> {
    havel_hakimi_realize(degrees, None)
}

/// Randomized-greedy realization (C3): same as [`greedy`] but shuffles the
/// order of attachment among the chosen top pool at each step.
pub fn random_greedy(degrees: &[u32], rng: &mut RngHandle) -> Result<EdgeSet, SpecxError> {
    havel_hakimi_realize(degrees, Some(rng))
}

/// Exact backtracking realization (C3). Enumerates candidate edges ordered
/// by descending max-endpoint-degree, greedily adds edges that don't
/// violate remaining demand or create a multiedge, and undoes the most
/// recent addition on dead ends. A step counter bounds total work; exceeding
/// it raises `LimitExceeded` rather than looping forever.
pub fn backtracking(
    degrees: &[u32],
    rng: &mut RngHandle,
    max_steps: u64,
) -> Result<EdgeSet, SpecxError> {
    let n = degrees.len();
    validate_degrees(degrees, n)?;

    let sum: u64 = degrees.iter().map(|&d| d as u64).sum();
    if sum % 2 != 0 {
        return Err(SpecxError::non_graphical(
            "odd_degree_sum",
            "non-graphical (sum of degrees odd)",
        ));
    }

    let mut d: Vec<i64> = degrees.iter().map(|&x| x as i64).collect();
    let mut edge_set: std::collections::BTreeSet<(u32, u32)> = std::collections::BTreeSet::new();

    let mut all_pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .collect();
    all_pairs.shuffle(rng.inner_mut());
    all_pairs.sort_by_key(|&(i, j)| std::cmp::Reverse(d[i].max(d[j])));

    // Undo stack: (pair index tried, the pair itself).
    let mut stack: Vec<(usize, (usize, usize))> = Vec::new();
    let mut idx = 0usize;
    let mut steps: u64 = 0;

    let done = |d: &[i64]| d.iter().all(|&x| x == 0);
    let can_add = |d: &[i64], edge_set: &std::collections::BTreeSet<(u32, u32)>, u: usize, v: usize| {
        d[u] > 0 && d[v] > 0 && !edge_set.contains(&(u as u32, v as u32))
    };

    loop {
        steps += 1;
        if steps > max_steps {
            return Err(SpecxError::limit_exceeded(
                "backtracking_steps_exceeded",
                "backtracking limit exceeded",
            ));
        }

        if done(&d) {
            return Ok(EdgeSet::normalize(n, edge_set));
        }

        if idx >= all_pairs.len() {
            match stack.pop() {
                None => {
                    return Err(SpecxError::non_graphical(
                        "no_realization_found",
                        "non-graphical / no realization found",
                    ));
                }
                Some((prev_idx, (u, v))) => {
                    edge_set.remove(&(u as u32, v as u32));
                    d[u] += 1;
                    d[v] += 1;
                    idx = prev_idx + 1;
                    continue;
                }
            }
        }

        let (u, v) = all_pairs[idx];
        if can_add(&d, &edge_set, u, v) {
            edge_set.insert((u as u32, v as u32));
            d[u] -= 1;
            d[v] -= 1;
            stack.push((idx, (u, v)));
            idx = 0;
            continue;
        }

        idx += 1;
    }
}

/// Error payload helper for callers that want to report n/degree context.
pub fn degree_exceeds_n_error(n: usize) -> SpecxError {
    SpecxError::Validation(
        ErrorInfo::new("degree_exceeds_n_minus_1", "degree sequence has an entry exceeding n - 1")
            .with_context("n", n.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greedy_realizes_k4() {
        let edges = greedy(&[3, 3, 3, 3]).unwrap();
        assert_eq!(
            edges.edges(),
            &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
    }

    #[test]
    fn greedy_realizes_path5() {
        let edges = greedy(&[1, 2, 2, 2, 1]).unwrap();
        assert_eq!(edges.degree_sequence(), vec![1, 2, 2, 2, 1]);
    }

    #[test]
    fn greedy_rejects_non_graphical() {
        assert!(greedy(&[3, 3, 1]).is_err());
    }

    #[test]
    fn random_greedy_preserves_degree_sequence() {
        let mut rng = RngHandle::from_seed(3);
        let degrees = vec![2, 2, 2, 2, 2];
        let edges = random_greedy(&degrees, &mut rng).unwrap();
        assert_eq!(edges.degree_sequence(), degrees);
    }

    #[test]
    fn backtracking_realizes_k4() {
        let mut rng = RngHandle::from_seed(0);
        let edges = backtracking(&[3, 3, 3, 3], &mut rng, 2_000_000).unwrap();
        assert_eq!(edges.degree_sequence(), vec![3, 3, 3, 3]);
    }

    #[test]
    fn backtracking_rejects_odd_sum() {
        let mut rng = RngHandle::from_seed(0);
        assert!(backtracking(&[3, 3, 1], &mut rng, 2_000_000).is_err());
    }
}
