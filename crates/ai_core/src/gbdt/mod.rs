//! Deterministic GBDT (Gradient Boosted Decision Tree) classifier
//!
//! - **Integer-only inference**: thresholds, leaves and scores are micro units
//! - **Deterministic**: the same rows always produce the same labels
//! - **Fingerprinted**: compact JSON hashed with Blake3
//!
//! # Usage
//!
//! ```rust
//! use dyslexia_ai_core::gbdt::{ClassLabels, Model, Node, Tree};
//! use dyslexia_ai_core::SCALE;
//!
//! let tree = Tree::new(
//!     vec![
//!         Node::internal(0, 0, 12 * SCALE, 1, 2),
//!         Node::leaf(1, -SCALE),
//!         Node::leaf(2, SCALE),
//!     ],
//!     SCALE,
//! );
//! let model = Model::new(
//!     vec!["age".to_string()],
//!     ClassLabels::new(0, SCALE),
//!     vec![tree],
//!     SCALE / 2,
//! );
//!
//! assert_eq!(model.predict(&[15 * SCALE]).unwrap(), SCALE);
//! ```

pub mod model;
pub mod tree;

pub use model::{ClassLabels, Model};
pub use tree::{Node, Tree};
