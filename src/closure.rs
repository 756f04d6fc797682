//! Transitive closure of full correlation.
//!
//! If stochasts `a` and `b` are fully correlated (coefficient exactly ±1)
//! and so are `b` and `c`, then `a` and `c` are forced to be fully
//! correlated too, with sign equal to the product of the two chain signs.
//! [`extend_full_correlations`] computes the complete set of such forced
//! pairs and detects declarations that contradict them.
//!
//! # Algorithm
//!
//! Fixpoint iteration over a working list of pairs:
//!
//! 1. Filter the working list to fully correlated pairs.
//! 2. For every unordered combination of two full pairs sharing exactly
//!    one index, the two unshared endpoints are forced to the product of
//!    the pair coefficients (both ±1, so the product is exactly ±1).
//! 3. An existing entry for the forced endpoints must agree: a non-full
//!    entry is an unrecoverable contradiction, a full entry with the
//!    opposite sign is ambiguous and also raised as an error. Absent an
//!    entry, the forced pair is recorded.
//! 4. Append the recorded pairs and repeat until a pass derives nothing.
//!
//! Termination is guaranteed: the number of unordered index pairs is
//! finite and every pass either adds a pair or stops. The whole closure is
//! O(k²) per pass in the number of full pairs `k`, with at most
//! `n(n−1)/2` passes — trivially bounded for the tens of stochasts a
//! single analysis carries.

use crate::error::CorrelationError;

/// One declared or derived correlation between two stochast indices.
///
/// Indices refer to positions in the stochast sequence a
/// [`CorrelationMatrix`](crate::CorrelationMatrix) was initialized with.
/// The pair is canonical: `index1 < index2` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationPair {
    index1: usize,
    index2: usize,
    correlation: f64,
}

impl CorrelationPair {
    /// Creates a pair, normalizing the indices to `index1 < index2`.
    ///
    /// # Panics
    /// Panics if `index1 == index2`: the diagonal is implicit and never
    /// represented as a pair.
    pub fn new(index1: usize, index2: usize, correlation: f64) -> Self {
        assert!(
            index1 != index2,
            "a correlation pair must relate two distinct stochasts, got index {index1} twice"
        );
        let (lo, hi) = if index1 < index2 {
            (index1, index2)
        } else {
            (index2, index1)
        };
        Self {
            index1: lo,
            index2: hi,
            correlation,
        }
    }

    /// Lower stochast index.
    pub fn index1(&self) -> usize {
        self.index1
    }

    /// Upper stochast index.
    pub fn index2(&self) -> usize {
        self.index2
    }

    /// The correlation coefficient.
    pub fn correlation(&self) -> f64 {
        self.correlation
    }

    /// Returns `true` if the coefficient is exactly ±1.
    pub fn is_full(&self) -> bool {
        self.correlation.abs() == 1.0
    }

    /// Returns `true` if this pair relates the canonical index pair
    /// `(lo, hi)`.
    fn relates(&self, lo: usize, hi: usize) -> bool {
        self.index1 == lo && self.index2 == hi
    }

    /// If `self` and `other` share exactly one index, returns the two
    /// unshared endpoints (the ends of the chain `a — shared — c`).
    ///
    /// Pairs sharing both indices (the same pair) yield `None`.
    fn chain_ends(&self, other: &CorrelationPair) -> Option<(usize, usize)> {
        if self.index1 == other.index1 && self.index2 != other.index2 {
            Some((self.index2, other.index2))
        } else if self.index1 == other.index2 && self.index2 != other.index1 {
            Some((self.index2, other.index1))
        } else if self.index2 == other.index1 && self.index1 != other.index2 {
            Some((self.index1, other.index2))
        } else if self.index2 == other.index2 && self.index1 != other.index1 {
            Some((self.index1, other.index1))
        } else {
            None
        }
    }
}

/// Extends `pairs` with every full correlation forced by chains of fully
/// correlated pairs.
///
/// Pure function: the input is never mutated; the returned list starts
/// with the input pairs in their original order, followed by the derived
/// pairs in derivation order. Derived coefficients are exactly ±1.
///
/// # Errors
/// - [`CorrelationError::InconsistentFullCorrelation`] if a chain forces
///   a full correlation for a pair that carries an explicit non-full
///   declaration.
/// - [`CorrelationError::ConflictingCorrelationSigns`] if two chains
///   force opposite signs for the same pair.
///
/// # Examples
/// ```
/// use corrnet::closure::{extend_full_correlations, CorrelationPair};
///
/// let declared = vec![
///     CorrelationPair::new(0, 1, 1.0),
///     CorrelationPair::new(1, 2, -1.0),
/// ];
/// let closed = extend_full_correlations(&declared).unwrap();
/// assert_eq!(closed.len(), 3);
/// assert_eq!(closed[2], CorrelationPair::new(0, 2, -1.0));
/// ```
pub fn extend_full_correlations(
    pairs: &[CorrelationPair],
) -> Result<Vec<CorrelationPair>, CorrelationError> {
    let mut all: Vec<CorrelationPair> = pairs.to_vec();

    loop {
        let full: Vec<CorrelationPair> = all.iter().filter(|p| p.is_full()).copied().collect();

        let mut derived: Vec<CorrelationPair> = Vec::new();
        for i in 0..full.len() {
            for j in (i + 1)..full.len() {
                let Some((a, c)) = full[i].chain_ends(&full[j]) else {
                    continue;
                };
                let implied = full[i].correlation() * full[j].correlation();
                let (lo, hi) = if a < c { (a, c) } else { (c, a) };

                let existing = all
                    .iter()
                    .chain(derived.iter())
                    .find(|p| p.relates(lo, hi));
                match existing {
                    Some(p) if !p.is_full() => {
                        return Err(CorrelationError::InconsistentFullCorrelation {
                            index1: lo,
                            index2: hi,
                            implied,
                            declared: p.correlation(),
                        });
                    }
                    Some(p) if p.correlation() != implied => {
                        return Err(CorrelationError::ConflictingCorrelationSigns {
                            index1: lo,
                            index2: hi,
                        });
                    }
                    Some(_) => {} // already present and consistent
                    None => derived.push(CorrelationPair::new(lo, hi, implied)),
                }
            }
        }

        if derived.is_empty() {
            return Ok(all);
        }
        tracing::trace!(derived = derived.len(), "full-correlation closure pass");
        all.extend(derived);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(i: usize, j: usize, rho: f64) -> CorrelationPair {
        CorrelationPair::new(i, j, rho)
    }

    #[test]
    fn test_pair_canonical_order() {
        let p = pair(3, 1, 0.5);
        assert_eq!(p.index1(), 1);
        assert_eq!(p.index2(), 3);
        assert_eq!(p.correlation(), 0.5);
    }

    #[test]
    #[should_panic(expected = "two distinct stochasts")]
    fn test_pair_rejects_diagonal() {
        let _ = pair(2, 2, 1.0);
    }

    #[test]
    fn test_is_full() {
        assert!(pair(0, 1, 1.0).is_full());
        assert!(pair(0, 1, -1.0).is_full());
        assert!(!pair(0, 1, 0.999).is_full());
        assert!(!pair(0, 1, 0.0).is_full());
    }

    #[test]
    fn test_empty_and_partial_inputs_pass_through() {
        assert_eq!(extend_full_correlations(&[]).unwrap(), vec![]);

        let partial = vec![pair(0, 1, 0.5), pair(1, 2, 0.3)];
        assert_eq!(extend_full_correlations(&partial).unwrap(), partial);
    }

    #[test]
    fn test_single_chain_positive() {
        let declared = vec![pair(0, 1, 1.0), pair(1, 2, 1.0)];
        let closed = extend_full_correlations(&declared).unwrap();
        assert_eq!(closed.len(), 3);
        assert_eq!(closed[2], pair(0, 2, 1.0));
    }

    #[test]
    fn test_sign_composition() {
        // +1 chained with -1 gives -1
        let closed = extend_full_correlations(&[pair(0, 1, 1.0), pair(1, 2, -1.0)]).unwrap();
        assert_eq!(closed[2], pair(0, 2, -1.0));

        // -1 chained with -1 gives +1
        let closed = extend_full_correlations(&[pair(0, 1, -1.0), pair(1, 2, -1.0)]).unwrap();
        assert_eq!(closed[2], pair(0, 2, 1.0));
    }

    #[test]
    fn test_long_chain_closes_completely() {
        // 0—1—2—3 all fully correlated: closure adds (0,2), (1,3), (0,3)
        let declared = vec![pair(0, 1, 1.0), pair(1, 2, 1.0), pair(2, 3, 1.0)];
        let closed = extend_full_correlations(&declared).unwrap();
        assert_eq!(closed.len(), 6);
        for (i, j) in [(0, 2), (1, 3), (0, 3)] {
            assert!(
                closed.iter().any(|p| p.relates(i, j) && p.correlation() == 1.0),
                "expected derived pair ({i}, {j})"
            );
        }
    }

    #[test]
    fn test_derivation_requires_second_pass() {
        // 0—1 and 2—3 are separate until 1—2 links them; (0,3) needs a
        // derived pair as one of its chain legs.
        let declared = vec![pair(0, 1, 1.0), pair(2, 3, -1.0), pair(1, 2, 1.0)];
        let closed = extend_full_correlations(&declared).unwrap();
        assert_eq!(closed.len(), 6);
        assert!(closed.iter().any(|p| p.relates(0, 2) && p.correlation() == 1.0));
        assert!(closed.iter().any(|p| p.relates(1, 3) && p.correlation() == -1.0));
        assert!(closed.iter().any(|p| p.relates(0, 3) && p.correlation() == -1.0));
    }

    #[test]
    fn test_partial_pairs_do_not_chain() {
        // a partial pair sharing an index with a full pair derives nothing
        let declared = vec![pair(0, 1, 1.0), pair(1, 2, 0.5)];
        let closed = extend_full_correlations(&declared).unwrap();
        assert_eq!(closed, declared);
    }

    #[test]
    fn test_consistent_cycle_is_accepted() {
        // triangle with consistent signs: (0,2) already declared as the
        // chain implies
        let declared = vec![pair(0, 1, 1.0), pair(1, 2, -1.0), pair(0, 2, -1.0)];
        let closed = extend_full_correlations(&declared).unwrap();
        assert_eq!(closed, declared);
    }

    #[test]
    fn test_partial_declaration_on_forced_pair_is_fatal() {
        let declared = vec![pair(0, 1, 1.0), pair(1, 2, 1.0), pair(0, 2, 0.5)];
        let err = extend_full_correlations(&declared).unwrap_err();
        assert_eq!(
            err,
            CorrelationError::InconsistentFullCorrelation {
                index1: 0,
                index2: 2,
                implied: 1.0,
                declared: 0.5,
            }
        );
    }

    #[test]
    fn test_opposite_sign_cycle_is_fatal() {
        // chain forces (0,2) = +1 but -1 is declared
        let declared = vec![pair(0, 1, 1.0), pair(1, 2, 1.0), pair(0, 2, -1.0)];
        let err = extend_full_correlations(&declared).unwrap_err();
        assert_eq!(
            err,
            CorrelationError::ConflictingCorrelationSigns { index1: 0, index2: 2 }
        );
    }

    #[test]
    fn test_input_order_is_preserved() {
        let declared = vec![pair(1, 2, 1.0), pair(0, 1, 1.0)];
        let closed = extend_full_correlations(&declared).unwrap();
        assert_eq!(&closed[..2], &declared[..]);
    }
}
