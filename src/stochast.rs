//! Stochast identity.
//!
//! A *stochast* is one random variable participating in a reliability
//! analysis. Within this crate a stochast is pure identity: distribution
//! parameters, physical meaning, and the inverse-transform mapping live
//! with the caller and the external reliability engine.
//!
//! Identity semantics: every [`Stochast::new`] call mints a fresh,
//! process-unique id. Cloning preserves the id, so a clone *is* the same
//! stochast. Two stochasts compare equal iff they share an id — names are
//! labels for diagnostics, never identity.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Opaque, process-unique identity of a [`Stochast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StochastId(u64);

/// A random variable in a reliability analysis, reduced to its identity.
///
/// # Examples
/// ```
/// use corrnet::Stochast;
///
/// let a = Stochast::new("wave height");
/// let b = Stochast::new("wave height");
/// assert_ne!(a, b);           // same name, different variables
/// assert_eq!(a, a.clone());   // a clone is the same stochast
/// ```
#[derive(Debug, Clone)]
pub struct Stochast {
    id: StochastId,
    name: String,
}

impl Stochast {
    /// Creates a new stochast with a fresh identity.
    ///
    /// The name is a diagnostic label only; it does not participate in
    /// equality.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: StochastId(NEXT_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
        }
    }

    /// Returns this stochast's identity token.
    pub fn id(&self) -> StochastId {
        self.id
    }

    /// Returns the diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Stochast {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Stochast {}
