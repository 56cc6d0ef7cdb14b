//! Prediction engine
//!
//! ```text
//! Game ─► StatsProvider ─┐
//!      └► HistoryProvider ┴► factors ─► projected score ─► winner, confidence, notes
//! ```
//!
//! The scoring path is pure and synchronous; only the providers know where
//! the numbers come from.

pub mod engine;
pub mod factors;


pub use engine::{predict, project_score, PredictionEngine};
pub use factors::{analyze_factors, weather_impact, PredictionFactors};
