//! Static analysis of parsed queries, run before any resolver executes.
//!
//! - [`classify`] - Field classification by name
//! - [`complexity`] - Cost estimation with list multipliers
//! - [`depth`] - Selection nesting depth
//! - [`admission`] - The combined depth and complexity gate

pub mod admission;
pub mod classify;
pub mod complexity;
pub mod depth;

pub use admission::{AdmissionController, AdmissionReport};
pub use classify::{FieldClassifier, FieldKind, NameHeuristics};
pub use complexity::{score, ComplexityAnalyzer};
pub use depth::{depth, DepthAnalyzer};
