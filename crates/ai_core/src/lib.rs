//! Deterministic AI core for the dyslexia screener
//!
//! Provides the integer-only model evaluated by the trainer crate.
//!
//! Modules:
//! - `gbdt`: Integer-only Gradient Boosted Decision Tree classifier with
//!   Blake3 fingerprints
//! - `fixed`: Conversions between real values and micro-unit integers
//! - `errors`: Model error types

pub mod errors;
pub mod fixed;
pub mod gbdt;

pub use errors::ModelError;
pub use fixed::{from_fixed, to_fixed, try_to_fixed, SCALE};
pub use gbdt::{ClassLabels, Model, Node, Tree};
