//! Jaccard similarity of covers and bounds on it.
//!
//! `theta` is always the minimum frequency: every cover reachable from a
//! search node has at least `theta` transactions.

use crate::Cover;

/// Lower and upper bound computed from the same pair of covers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

/// Divides two counts.
///
/// A zero denominator only occurs for empty covers; the result is then `0`
/// unless the numerator is positive, which makes the bound unsatisfiable.
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return if numerator == 0 { 0.0 } else { f64::INFINITY }
    }
    numerator as f64 / denominator as f64
}

/// Returns `|a ∩ b| / |a ∪ b|`, or `0` if both covers are empty.
pub fn exact(a: &Cover, b: &Cover) -> f64 {
    let common = a.intersection_len(b);
    ratio(common, a.count_ones() + b.count_ones() - common)
}

/// Returns `max(0, θ - |a \ b|) / (|b| + |a \ b|)`.
///
/// Bounds `exact(a', b)` from below for every `a' ⊆ a` with `|a'| ≥ θ`.
/// Shrinking `a` never decreases it. Not symmetric.
pub fn lb(a: &Cover, b: &Cover, theta: usize) -> f64 {
    let only_a = a.difference_len(b);
    ratio(theta.saturating_sub(only_a), b.count_ones() + only_a)
}

/// Returns `|a ∩ b| / (|a| + max(θ - |a ∩ b|, 0))`.
///
/// Bounds `exact(a, b)` from above whenever `|b| ≥ θ`.
pub fn ub(a: &Cover, b: &Cover, theta: usize) -> f64 {
    let common = a.intersection_len(b);
    ratio(common, a.count_ones() + theta.saturating_sub(common))
}

/// Returns `|a ∩ b| / (|b| + max(θ - |a ∩ b|, 0))`.
///
/// Bounds `exact(a', b)` from above for every `a' ⊆ a` with `|a'| ≥ θ` and
/// never increases when `a` shrinks. Once it is below the similarity bound
/// no descendant of the node can violate the bound against `b`.
pub fn ub_descendants(a: &Cover, b: &Cover, theta: usize) -> f64 {
    let common = a.intersection_len(b);
    ratio(common, b.count_ones() + theta.saturating_sub(common))
}

/// Returns [`lb`] and [`ub_descendants`] of the same arguments.
///
/// `len_a` must be the number of transactions in `a`.
pub fn lb_and_ub_descendants(a: &Cover, len_a: usize, b: &Cover, theta: usize) -> Bounds {
    let common = a.intersection_len(b);
    let len_b = b.count_ones();
    let only_a = len_a - common;
    Bounds {
        lower: ratio(theta.saturating_sub(only_a), len_b + only_a),
        upper: ratio(common, len_b + theta.saturating_sub(common)),
    }
}

/// Returns `true` if `similarity` violates the similarity `bound`.
///
/// Equality counts as violation only at `0` so that a bound of `0` rejects
/// every pair, including disjoint ones.
#[inline]
pub fn violates(similarity: f64, bound: f64) -> bool {
    similarity > bound || (similarity == bound && similarity == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        tests::random_cover,
        Transaction,
    };
    use bounded::Index as _;
    use rand::{
        rngs::SmallRng,
        Rng,
        SeedableRng,
    };

    fn cover(len: usize, ones: &[usize]) -> Cover {
        Cover::from_indices(len, ones.iter().copied().map(Transaction::from_index)).unwrap()
    }

    fn subsets(a: &Cover) -> Vec<Cover> {
        let ones = a.iter_ones().collect::<Vec<_>>();
        (0..1usize << ones.len())
            .map(|mask| {
                let kept = ones
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| mask & (1 << bit) != 0)
                    .map(|(_, &t)| t);
                Cover::from_indices(a.len(), kept).unwrap()
            })
            .collect()
    }

    #[test]
    fn exact_matches_definition() {
        let a = cover(6, &[0, 1, 2, 3]);
        let b = cover(6, &[2, 3, 4]);
        assert_eq!(exact(&a, &b), 2.0 / 5.0);
        assert_eq!(exact(&a, &b), exact(&b, &a));
        assert_eq!(exact(&a, &a), 1.0);
        assert_eq!(exact(&cover(6, &[]), &cover(6, &[])), 0.0);
        assert_eq!(exact(&cover(6, &[0]), &cover(6, &[1])), 0.0);
    }

    #[test]
    fn bounds_match_formulas() {
        let a = cover(8, &[0, 1, 2, 3, 4]);
        let b = cover(8, &[3, 4, 5]);
        // |a ∩ b| = 2, |a \ b| = 3, |a| = 5, |b| = 3
        assert_eq!(lb(&a, &b, 4), 1.0 / 6.0);
        assert_eq!(lb(&a, &b, 2), 0.0);
        assert_eq!(ub(&a, &b, 4), 2.0 / 7.0);
        assert_eq!(ub(&a, &b, 1), 2.0 / 5.0);
        assert_eq!(ub_descendants(&a, &b, 4), 2.0 / 5.0);
        for theta in 0..6 {
            assert_eq!(lb_and_ub_descendants(&a, 5, &b, theta), Bounds {
                lower: lb(&a, &b, theta),
                upper: ub_descendants(&a, &b, theta),
            });
        }
    }

    #[test]
    fn zero_is_a_violation_only_at_bound_zero() {
        assert!(violates(0.0, 0.0));
        assert!(!violates(0.0, 0.3));
        assert!(!violates(0.3, 0.3));
        assert!(violates(0.31, 0.3));
    }

    #[test]
    fn bounds_enclose_exact_on_all_frequent_subsets() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..200 {
            let len = rng.gen_range(1, 9);
            let a = random_cover(&mut rng, len, 0.6);
            let b = random_cover(&mut rng, len, 0.5);
            let theta = rng.gen_range(0, len + 1);
            if b.count_ones() >= theta {
                assert!(exact(&a, &b) <= ub(&a, &b, theta) + 1e-12);
            }
            for sub in subsets(&a).iter().filter(|sub| sub.count_ones() >= theta) {
                let similarity = exact(sub, &b);
                assert!(lb(&a, &b, theta) <= similarity + 1e-12);
                assert!(similarity <= ub_descendants(&a, &b, theta) + 1e-12);
            }
        }
    }

    #[test]
    fn lower_bound_grows_and_descendant_bound_shrinks_with_smaller_covers() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..200 {
            let len = rng.gen_range(1, 9);
            let a = random_cover(&mut rng, len, 0.7);
            let b = random_cover(&mut rng, len, 0.5);
            let theta = rng.gen_range(0, len + 1);
            for sub in subsets(&a) {
                assert!(lb(&sub, &b, theta) >= lb(&a, &b, theta));
                assert!(ub_descendants(&sub, &b, theta) <= ub_descendants(&a, &b, theta));
            }
        }
    }
}
