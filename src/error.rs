//! Error types for correlation-network operations.
//!
//! Two families of failures exist:
//!
//! - **Invalid input**, rejected at the API boundary before any state
//!   changes: duplicate or unknown stochasts, self-correlation, and
//!   out-of-range coefficients.
//! - **Logical inconsistency**, detected while computing the transitive
//!   closure of fully correlated pairs: a chain of full correlations
//!   implies a value that contradicts an explicit declaration. This is
//!   fatal — the caller must fix the declarations and retry; the engine
//!   never silently picks a value.

use thiserror::Error;

/// Errors raised by [`CorrelationMatrix`](crate::CorrelationMatrix) and the
/// full-correlation closure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CorrelationError {
    /// The same stochast identity appeared twice in the initialization
    /// sequence.
    #[error("stochast `{0}` appears more than once in the matrix initialization")]
    DuplicateStochast(String),

    /// A stochast that is not part of the initialized sequence was used in
    /// a query or mutation.
    #[error("stochast `{0}` is not part of this correlation matrix")]
    UnknownStochast(String),

    /// A correlation was declared between a stochast and itself. The
    /// diagonal is implicitly 1 and cannot be set.
    #[error("cannot correlate stochast `{0}` with itself")]
    SelfCorrelation(String),

    /// A correlation coefficient outside `[-1, 1]` (or NaN) was declared.
    #[error("correlation coefficient must be in [-1, 1], got {0}")]
    CoefficientOutOfRange(f64),

    /// A chain of fully correlated pairs implies a full correlation for a
    /// pair that carries an explicit, non-full declaration. The input is
    /// contradictory and cannot be repaired automatically.
    #[error(
        "inconsistent list of fully correlated stochasts: the chain implies \
         {implied} between stochasts {index1} and {index2}, but {declared} \
         is declared"
    )]
    InconsistentFullCorrelation {
        /// Lower index of the contradicted pair.
        index1: usize,
        /// Upper index of the contradicted pair.
        index2: usize,
        /// The value the chain of full correlations forces.
        implied: f64,
        /// The explicitly declared, non-full value.
        declared: f64,
    },

    /// Two chains of fully correlated pairs imply opposite signs for the
    /// same pair. Resolution is conservative: ambiguity is an error, never
    /// a silent sign choice.
    #[error("fully correlated stochasts {index1} and {index2} are implied with both signs")]
    ConflictingCorrelationSigns {
        /// Lower index of the ambiguous pair.
        index1: usize,
        /// Upper index of the ambiguous pair.
        index2: usize,
    },
}
