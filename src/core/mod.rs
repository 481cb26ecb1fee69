//! Derived-column engine: operation registry, scalar resolution, evaluation

pub mod evaluator;
pub mod operations;
pub mod single_value;

pub use evaluator::{render, Derived, Evaluator, RenderOutcome};
pub use operations::{lookup, OperationDescriptor, OPERATIONS, PERCENT_FORMAT};
