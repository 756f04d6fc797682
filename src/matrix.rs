//! Sparse symmetric correlation matrix over a fixed stochast sequence.
//!
//! The matrix is the canonical state handed to the external reliability
//! engine: a symmetric mapping from unordered stochast pairs to a
//! coefficient in `[-1, 1]`. Unset pairs are independent (coefficient 0)
//! and the diagonal is implicitly 1, so only nonzero off-diagonal
//! coefficients are stored, keyed by the canonical low/high index pair.
//!
//! A matrix is built once per analysis session, mutated through
//! [`CorrelationMatrix::set_correlation`], checked and repaired through
//! the conflict operations, and then treated as read-only by the engine.
//! It is exclusively owned by its session; nothing here is designed for
//! concurrent mutation.

use std::collections::{BTreeMap, HashMap};

use crate::closure::{extend_full_correlations, CorrelationPair};
use crate::error::CorrelationError;
use crate::groups::CorrelationGroups;
use crate::stochast::{Stochast, StochastId};

/// Symmetric store of pairwise correlation coefficients.
///
/// # Examples
/// ```
/// use corrnet::{CorrelationMatrix, Stochast};
///
/// let a = Stochast::new("a");
/// let b = Stochast::new("b");
/// let mut matrix = CorrelationMatrix::new(&[a.clone(), b.clone()]).unwrap();
///
/// assert!(matrix.is_identity());
/// matrix.set_correlation(&a, &b, 0.5).unwrap();
/// assert_eq!(matrix.correlation(&b, &a), Some(0.5));
/// ```
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    /// Identity → position in the initialization sequence.
    index: HashMap<StochastId, usize>,
    len: usize,
    /// Nonzero off-diagonal coefficients, keyed `(lo, hi)`. A BTreeMap
    /// keeps pair extraction deterministic, which keeps the closure's
    /// enumeration order reproducible across runs.
    coefficients: BTreeMap<(usize, usize), f64>,
}

impl CorrelationMatrix {
    /// Builds the identity matrix over the given stochast sequence.
    ///
    /// The sequence fixes the index of every stochast for the lifetime of
    /// the matrix. Only identities are retained; the caller keeps
    /// ownership of the stochasts themselves.
    ///
    /// # Errors
    /// [`CorrelationError::DuplicateStochast`] if the same identity
    /// appears twice.
    pub fn new(stochasts: &[Stochast]) -> Result<Self, CorrelationError> {
        let mut index = HashMap::with_capacity(stochasts.len());
        for (i, s) in stochasts.iter().enumerate() {
            if index.insert(s.id(), i).is_some() {
                return Err(CorrelationError::DuplicateStochast(s.name().to_string()));
            }
        }
        Ok(Self {
            index,
            len: stochasts.len(),
            coefficients: BTreeMap::new(),
        })
    }

    /// Returns the number of stochasts the matrix covers.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the matrix covers no stochasts.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sets the coefficient for the unordered pair `{a, b}`, overwriting
    /// any prior value. Setting `0.0` clears the pair back to
    /// independence.
    ///
    /// # Errors
    /// - [`CorrelationError::SelfCorrelation`] if `a == b`.
    /// - [`CorrelationError::UnknownStochast`] if either stochast is not
    ///   part of the initialized sequence.
    /// - [`CorrelationError::CoefficientOutOfRange`] if `value` is NaN or
    ///   outside `[-1, 1]`.
    pub fn set_correlation(
        &mut self,
        a: &Stochast,
        b: &Stochast,
        value: f64,
    ) -> Result<(), CorrelationError> {
        if a == b {
            return Err(CorrelationError::SelfCorrelation(a.name().to_string()));
        }
        if !(-1.0..=1.0).contains(&value) {
            return Err(CorrelationError::CoefficientOutOfRange(value));
        }
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        let key = if i < j { (i, j) } else { (j, i) };
        if value == 0.0 {
            self.coefficients.remove(&key);
        } else {
            self.coefficients.insert(key, value);
        }
        Ok(())
    }

    /// Returns the coefficient for the unordered pair `{a, b}`: 1 when
    /// `a == b`, the stored value, or 0 for pairs never set.
    ///
    /// Returns `None` if either stochast is not part of the matrix.
    pub fn correlation(&self, a: &Stochast, b: &Stochast) -> Option<f64> {
        let i = *self.index.get(&a.id())?;
        let j = *self.index.get(&b.id())?;
        if i == j {
            return Some(1.0);
        }
        let key = if i < j { (i, j) } else { (j, i) };
        Some(self.coefficients.get(&key).copied().unwrap_or(0.0))
    }

    /// Returns `true` if every off-diagonal coefficient is zero.
    pub fn is_identity(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Returns the number of distinct nonzero off-diagonal pairs.
    pub fn correlation_count(&self) -> usize {
        self.coefficients.len()
    }

    /// Extracts the stored coefficients as [`CorrelationPair`]s, in
    /// ascending canonical index order. Round-trips losslessly with the
    /// closure algorithm.
    pub fn pairs(&self) -> Vec<CorrelationPair> {
        self.coefficients
            .iter()
            .map(|(&(i, j), &rho)| CorrelationPair::new(i, j, rho))
            .collect()
    }

    /// Returns `true` if the transitive closure of the fully correlated
    /// pairs would change the matrix, or cannot be computed at all.
    ///
    /// Both fatal inconsistencies (a chain contradicting an explicit
    /// declaration) and the repairable case (a chain forcing a pair the
    /// store does not hold yet) report `true`. Only
    /// [`resolve_conflicting_correlations`](Self::resolve_conflicting_correlations)
    /// distinguishes the two.
    pub fn has_conflicting_correlations(&self) -> bool {
        match extend_full_correlations(&self.pairs()) {
            Err(_) => true,
            Ok(closure) => closure
                .iter()
                .any(|p| self.coefficient_at(p.index1(), p.index2()) != p.correlation()),
        }
    }

    /// Computes the full-correlation closure and writes every fully
    /// correlated pair it contains back into the store. Pairs untouched
    /// by any chain keep their value. Idempotent; afterwards
    /// [`has_conflicting_correlations`](Self::has_conflicting_correlations)
    /// is `false`.
    ///
    /// # Errors
    /// Propagates [`CorrelationError::InconsistentFullCorrelation`] and
    /// [`CorrelationError::ConflictingCorrelationSigns`] from the closure;
    /// the matrix is left unmodified in that case.
    pub fn resolve_conflicting_correlations(&mut self) -> Result<(), CorrelationError> {
        let pairs = self.pairs();
        let closure = extend_full_correlations(&pairs)?;
        tracing::debug!(
            declared = pairs.len(),
            derived = closure.len() - pairs.len(),
            "resolved full-correlation closure"
        );
        for p in closure.iter().filter(|p| p.is_full()) {
            self.coefficients
                .insert((p.index1(), p.index2()), p.correlation());
        }
        Ok(())
    }

    /// Partitions the stochast indices into groups of mutually fully
    /// correlated stochasts (size ≥ 2, sorted, ordered by smallest
    /// member). Derived from the *declared* full pairs, so the result is
    /// the same before and after resolution.
    ///
    /// # Errors
    /// [`CorrelationError::ConflictingCorrelationSigns`] if a cycle of
    /// full correlations implies both signs for one pair.
    pub fn full_correlation_groups(&self) -> Result<Vec<Vec<usize>>, CorrelationError> {
        let mut groups = CorrelationGroups::new(self.len);
        for pair in self.pairs().iter().filter(|p| p.is_full()) {
            let sign = if pair.correlation() > 0.0 { 1 } else { -1 };
            groups.merge(pair.index1(), pair.index2(), sign)?;
        }
        Ok(groups.components())
    }

    fn index_of(&self, s: &Stochast) -> Result<usize, CorrelationError> {
        self.index
            .get(&s.id())
            .copied()
            .ok_or_else(|| CorrelationError::UnknownStochast(s.name().to_string()))
    }

    fn coefficient_at(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < j);
        self.coefficients.get(&(i, j)).copied().unwrap_or(0.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn stochasts(n: usize) -> Vec<Stochast> {
        (0..n).map(|i| Stochast::new(format!("s{i}"))).collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn set_correlation_is_symmetric(
            n in 2_usize..10,
            sets in proptest::collection::vec(
                (any::<prop::sample::Index>(), any::<prop::sample::Index>(), -1.0_f64..=1.0),
                0..20,
            ),
        ) {
            let s = stochasts(n);
            let mut matrix = CorrelationMatrix::new(&s).unwrap();
            for (a, b, rho) in &sets {
                let i = a.index(n);
                let j = b.index(n);
                if i != j {
                    matrix.set_correlation(&s[i], &s[j], *rho).unwrap();
                }
            }
            for i in 0..n {
                for j in 0..n {
                    prop_assert_eq!(
                        matrix.correlation(&s[i], &s[j]),
                        matrix.correlation(&s[j], &s[i])
                    );
                }
                prop_assert_eq!(matrix.correlation(&s[i], &s[i]), Some(1.0));
            }
        }

        /// Random full-correlation forests (no cycles, hence always
        /// consistent) must resolve, and every same-component pair must
        /// end at the product of the path signs — cross-checked against
        /// the group partition.
        #[test]
        fn forests_resolve_to_path_sign_products(
            n in 2_usize..10,
            raw in proptest::collection::vec(
                (any::<bool>(), any::<prop::sample::Index>(), any::<bool>()),
                1..9,
            ),
        ) {
            let s = stochasts(n);
            let mut matrix = CorrelationMatrix::new(&s).unwrap();

            let mut root: Vec<usize> = (0..n).collect();
            let mut sign = vec![1.0f64; n];
            for (child0, (attached, parent_idx, positive)) in raw.iter().enumerate() {
                let child = child0 + 1;
                if child >= n || !*attached {
                    continue;
                }
                let parent = parent_idx.index(child);
                let rho = if *positive { 1.0 } else { -1.0 };
                matrix.set_correlation(&s[parent], &s[child], rho).unwrap();
                root[child] = root[parent];
                sign[child] = rho * sign[parent];
            }

            matrix.resolve_conflicting_correlations().unwrap();
            prop_assert!(!matrix.has_conflicting_correlations());

            for i in 0..n {
                for j in (i + 1)..n {
                    let expected = if root[i] == root[j] { sign[i] * sign[j] } else { 0.0 };
                    prop_assert_eq!(
                        matrix.correlation(&s[i], &s[j]),
                        Some(expected),
                        "pair ({}, {})", i, j
                    );
                }
            }

            // every reported group is mutually fully correlated
            for group in matrix.full_correlation_groups().unwrap() {
                for (k, &i) in group.iter().enumerate() {
                    for &j in &group[k + 1..] {
                        let rho = matrix.correlation(&s[i], &s[j]).unwrap();
                        prop_assert_eq!(rho.abs(), 1.0, "group pair ({}, {})", i, j);
                    }
                }
            }
        }

        #[test]
        fn resolution_is_idempotent_on_forests(
            n in 2_usize..10,
            raw in proptest::collection::vec(
                (any::<bool>(), any::<prop::sample::Index>(), any::<bool>()),
                1..9,
            ),
        ) {
            let s = stochasts(n);
            let mut matrix = CorrelationMatrix::new(&s).unwrap();
            for (child0, (attached, parent_idx, positive)) in raw.iter().enumerate() {
                let child = child0 + 1;
                if child >= n || !*attached {
                    continue;
                }
                let parent = parent_idx.index(child);
                let rho = if *positive { 1.0 } else { -1.0 };
                matrix.set_correlation(&s[parent], &s[child], rho).unwrap();
            }

            matrix.resolve_conflicting_correlations().unwrap();
            let once = matrix.pairs();
            matrix.resolve_conflicting_correlations().unwrap();
            prop_assert_eq!(matrix.pairs(), once);
        }
    }
}
