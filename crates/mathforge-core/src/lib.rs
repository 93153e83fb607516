//! mathforge-core — Adaptive arithmetic quiz engine.
//!
//! This crate defines the data model, problem generator, performance
//! tracker, and the difficulty-adaptation policies that the mathforge
//! session driver builds on.

pub mod error;
pub mod generator;
pub mod model;
pub mod policy;
pub mod tracker;

pub use error::CoreError;
pub use generator::ProblemGenerator;
pub use model::{Difficulty, Operator, Problem, WindowStats};
pub use policy::{AdaptationPolicy, ModelInfo, ModelPolicy, RulePolicy};
pub use tracker::PerformanceTracker;
