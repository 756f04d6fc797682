//! Grouping of fully correlated stochasts.
//!
//! The external reliability engine collapses every set of mutually fully
//! correlated stochasts into a single dimension, so it needs the partition
//! of the stochast sequence into full-correlation components.
//!
//! [`CorrelationGroups`] is a disjoint-set forest (path compression, union
//! by rank) where every element additionally carries its correlation sign
//! relative to its root. Merging two elements whose component membership
//! already fixes their relative sign checks that the declared sign agrees;
//! a disagreement means a cycle of full correlations implies both signs
//! for one pair.

use crate::error::CorrelationError;

/// Disjoint-set forest over stochast indices with per-element correlation
/// signs.
///
/// # Examples
/// ```
/// use corrnet::groups::CorrelationGroups;
///
/// let mut groups = CorrelationGroups::new(4);
/// groups.merge(0, 1, -1).unwrap();
/// groups.merge(1, 2, -1).unwrap();
///
/// assert_eq!(groups.relative_sign(0, 2), Some(1)); // -1 · -1
/// assert_eq!(groups.relative_sign(0, 3), None);    // not connected
/// assert_eq!(groups.components(), vec![vec![0, 1, 2]]);
/// ```
#[derive(Debug, Clone)]
pub struct CorrelationGroups {
    parent: Vec<usize>,
    /// Correlation sign (+1/−1) between an element and its parent.
    /// Path compression keeps this relative to the root for settled paths.
    sign: Vec<i8>,
    rank: Vec<u8>,
}

impl CorrelationGroups {
    /// Creates `n` singleton components, one per stochast index.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            sign: vec![1; n],
            rank: vec![0; n],
        }
    }

    /// Returns the number of stochast indices covered.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns `true` if no indices are covered.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Finds the root of `x`, compressing the path and folding signs so
    /// that `self.sign[x]` is the sign of `x` relative to the root.
    ///
    /// # Panics
    /// Panics if `x >= len()`.
    fn find(&mut self, x: usize) -> usize {
        let p = self.parent[x];
        if p == x {
            return x;
        }
        let root = self.find(p);
        // After the recursive call, sign[p] is relative to the root.
        self.sign[x] *= self.sign[p];
        self.parent[x] = root;
        root
    }

    /// Declares `x` and `y` fully correlated with the given sign (+1/−1).
    ///
    /// Returns `Ok(true)` if two components were merged, `Ok(false)` if
    /// `x` and `y` were already in the same component with the consistent
    /// sign.
    ///
    /// # Errors
    /// [`CorrelationError::ConflictingCorrelationSigns`] if `x` and `y`
    /// are already connected with the opposite relative sign.
    ///
    /// # Panics
    /// Panics if `x >= len()`, `y >= len()`, or `sign` is not ±1.
    pub fn merge(&mut self, x: usize, y: usize, sign: i8) -> Result<bool, CorrelationError> {
        assert!(sign == 1 || sign == -1, "a full correlation sign must be ±1, got {sign}");

        let root_x = self.find(x);
        let root_y = self.find(y);
        let sign_x = self.sign[x];
        let sign_y = self.sign[y];

        if root_x == root_y {
            if sign_x * sign_y != sign {
                let (lo, hi) = if x < y { (x, y) } else { (y, x) };
                return Err(CorrelationError::ConflictingCorrelationSigns {
                    index1: lo,
                    index2: hi,
                });
            }
            return Ok(false);
        }

        // rho(root_y, root_x) = rho(root_y, y) · rho(y, x) · rho(x, root_x)
        let root_sign = sign_y * sign * sign_x;

        match self.rank[root_x].cmp(&self.rank[root_y]) {
            std::cmp::Ordering::Less => {
                self.parent[root_x] = root_y;
                self.sign[root_x] = root_sign;
            }
            std::cmp::Ordering::Greater => {
                self.parent[root_y] = root_x;
                self.sign[root_y] = root_sign;
            }
            std::cmp::Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.sign[root_y] = root_sign;
                self.rank[root_x] += 1;
            }
        }
        Ok(true)
    }

    /// Returns the correlation sign between `x` and `y`, or `None` if they
    /// are not in the same component.
    pub fn relative_sign(&mut self, x: usize, y: usize) -> Option<i8> {
        if self.find(x) != self.find(y) {
            return None;
        }
        Some(self.sign[x] * self.sign[y])
    }

    /// Returns the components of size ≥ 2, each sorted ascending, ordered
    /// by their smallest member.
    pub fn components(&mut self) -> Vec<Vec<usize>> {
        let n = self.len();
        let mut by_root: Vec<Vec<usize>> = vec![Vec::new(); n];
        for x in 0..n {
            let root = self.find(x);
            by_root[root].push(x);
        }
        let mut out: Vec<Vec<usize>> = by_root.into_iter().filter(|g| g.len() >= 2).collect();
        // members were pushed in ascending index order; sort groups by head
        out.sort_by_key(|g| g[0]);
        out
    }
}
