//! # corrnet
//!
//! Correlation-network consistency engine for probabilistic reliability
//! analysis.
//!
//! A reliability analysis declares pairwise correlation coefficients
//! between random variables ("stochasts"). Chains of *fully* correlated
//! pairs (coefficient exactly ±1) force correlations the caller never
//! declared, and can contradict values the caller did declare. This crate
//! stores the declared coefficients, detects those contradictions, and
//! propagates the forced values so the external reliability engine (FORM,
//! Monte Carlo, importance/directional sampling, subset simulation)
//! receives an internally consistent matrix.
//!
//! The reliability algorithms themselves, distribution transforms, and
//! the decorrelation (Cholesky-type) step are out of scope: this crate is
//! the in-process data structure they consume.
//!
//! ## Modules
//!
//! - [`stochast`] — random-variable identity
//! - [`matrix`] — the sparse symmetric coefficient store and its
//!   conflict detection/resolution operations
//! - [`closure`] — the transitive closure of full correlation
//! - [`groups`] — signed grouping of fully correlated stochasts
//! - [`error`] — the error taxonomy
//!
//! ## Quick Start
//!
//! ```
//! use corrnet::{CorrelationMatrix, Stochast};
//!
//! let a = Stochast::new("a");
//! let b = Stochast::new("b");
//! let c = Stochast::new("c");
//!
//! let mut matrix = CorrelationMatrix::new(&[a.clone(), b.clone(), c.clone()]).unwrap();
//! matrix.set_correlation(&a, &b, 1.0).unwrap();
//! matrix.set_correlation(&b, &c, 1.0).unwrap();
//!
//! // (a, c) is forced to 1 by the chain but not stored yet
//! assert!(matrix.has_conflicting_correlations());
//!
//! matrix.resolve_conflicting_correlations().unwrap();
//! assert!(!matrix.has_conflicting_correlations());
//! assert_eq!(matrix.correlation(&a, &c), Some(1.0));
//! ```
//!
//! ## Design Philosophy
//!
//! - **Indices inside, identities at the boundary**: the algorithms
//!   operate on positions in the initialized stochast sequence; the
//!   public surface translates stochast identity to index once per call.
//! - **Contradictions are errors, never choices**: an inconsistent chain
//!   aborts the operation; the engine never silently picks a value or a
//!   sign.
//! - **Pure closure**: the transitive closure is a pure function over a
//!   pair list, trivially testable in isolation.

pub mod closure;
pub mod error;
pub mod groups;
pub mod matrix;
pub mod stochast;

pub use closure::CorrelationPair;
pub use error::CorrelationError;
pub use matrix::CorrelationMatrix;
pub use stochast::{Stochast, StochastId};
