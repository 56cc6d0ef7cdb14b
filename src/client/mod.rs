//! HTTP clients

pub mod espn;

#[cfg(test)]
mod tests;

pub use espn::{sample_live_scores, EspnClient};
