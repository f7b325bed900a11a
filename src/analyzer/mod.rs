//! Analyzer module - page quality scoring engine

pub mod context;
pub mod engine;
pub mod improvement;
pub mod recommendations;
pub mod rules;
pub mod scoring;

pub use context::{PageContext, PageState};
pub use engine::{AggregateStats, AnalysisEngine};
pub use scoring::{ScoreCalculator, WeightTable};
