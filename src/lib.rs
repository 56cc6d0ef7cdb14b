//! NFL Game Outcome Predictor
//!
//! Factor-based predictions for NFL games, with prompt generation for an
//! optional LLM analyst and a weekly scheduler.
//!
//! ## Architecture
//!
//! ```text
//! ESPN / static tables → Data Access → Prediction Engine → GamePrediction
//!                                            ↓
//!                         Prompts → Analyst (LLM) → Prompt Store
//!                                            ↓
//!                    Scheduler (weekly batch, daily check) → Accuracy Tracker
//! ```

pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod monitor;
pub mod predict;
pub mod prompts;
pub mod scheduler;
pub mod storage;
pub mod types;

#[cfg(test)]
mod error_tests;
