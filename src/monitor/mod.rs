//! Prediction accuracy tracking
//!
//! Every prediction is recorded in a ledger keyed by matchup. Once the real
//! score is known the record is graded, and the report summarizes hit rates.

#[cfg(test)]
mod tests;

use crate::error::Result;
use crate::types::{Game, GamePrediction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Confidence above which a pick counts as high-confidence
pub const HIGH_CONFIDENCE: f64 = 80.0;
/// Confidence below which a pick counts as low-confidence
pub const LOW_CONFIDENCE: f64 = 60.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedOutcome {
    pub home_score: u32,
    pub away_score: u32,
    /// `None` for a tie
    pub actual_winner: Option<String>,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub game: Game,
    pub prediction: GamePrediction,
    pub recorded_at: DateTime<Utc>,
    #[serde(default)]
    pub outcome: Option<GradedOutcome>,
}

impl PredictionRecord {
    pub fn key(&self) -> String {
        self.game.matchup()
    }

    pub fn picked_home(&self) -> bool {
        self.prediction.picks_home(&self.game)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HitRate {
    pub total: usize,
    pub correct: usize,
}

impl HitRate {
    fn add(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    /// Percent correct, 0 when empty
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64 * 100.0
        }
    }
}

impl fmt::Display for HitRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({:.1}%)", self.correct, self.total, self.rate())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccuracyReport {
    pub total_predictions: usize,
    pub pending: usize,
    pub overall: HitRate,
    pub home_picks: HitRate,
    pub away_picks: HitRate,
    pub high_confidence: HitRate,
    pub low_confidence: HitRate,
    /// Over every recorded prediction
    pub average_confidence: f64,
    pub last_10: HitRate,
    pub last_5: HitRate,
}

impl fmt::Display for AccuracyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Predictions recorded: {} ({} pending)", self.total_predictions, self.pending)?;
        writeln!(f, "Overall accuracy:     {}", self.overall)?;
        writeln!(f, "Home team picks:      {}", self.home_picks)?;
        writeln!(f, "Away team picks:      {}", self.away_picks)?;
        writeln!(f, "High confidence >80%: {}", self.high_confidence)?;
        writeln!(f, "Low confidence <60%:  {}", self.low_confidence)?;
        writeln!(f, "Average confidence:   {:.1}%", self.average_confidence)?;
        writeln!(f, "Last 10 games:        {}", self.last_10)?;
        write!(f, "Last 5 games:         {}", self.last_5)
    }
}

/// Summarize a ledger
pub fn build_report(records: &[PredictionRecord]) -> AccuracyReport {
    let mut report = AccuracyReport {
        total_predictions: records.len(),
        ..Default::default()
    };
    if records.is_empty() {
        return report;
    }

    report.average_confidence =
        records.iter().map(|r| r.prediction.confidence).sum::<f64>() / records.len() as f64;

    let graded: Vec<(&PredictionRecord, bool)> = records
        .iter()
        .filter_map(|r| r.outcome.as_ref().map(|o| (r, o.correct)))
        .collect();
    report.pending = records.len() - graded.len();

    for (record, correct) in &graded {
        report.overall.add(*correct);
        if record.picked_home() {
            report.home_picks.add(*correct);
        } else {
            report.away_picks.add(*correct);
        }

        let confidence = record.prediction.confidence;
        if confidence > HIGH_CONFIDENCE {
            report.high_confidence.add(*correct);
        } else if confidence < LOW_CONFIDENCE {
            report.low_confidence.add(*correct);
        }
    }

    for (i, (_, correct)) in graded.iter().rev().enumerate() {
        if i < 10 {
            report.last_10.add(*correct);
        }
        if i < 5 {
            report.last_5.add(*correct);
        }
    }

    report
}

/// Ledger of predictions, optionally persisted as JSON
pub struct AccuracyTracker {
    records: RwLock<Vec<PredictionRecord>>,
    path: Option<PathBuf>,
}

impl AccuracyTracker {
    /// In-memory only
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            path: None,
        }
    }

    /// Load the ledger at `path`, starting empty if it doesn't exist yet
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };
        debug!("Loaded {} ledger records from {}", records.len(), path.display());

        Ok(Self {
            records: RwLock::new(records),
            path: Some(path),
        })
    }

    /// Add or replace the prediction for this matchup. Grades already attached
    /// to the old record are dropped.
    pub async fn record(&self, game: &Game, prediction: &GamePrediction) {
        let record = PredictionRecord {
            game: game.clone(),
            prediction: prediction.clone(),
            recorded_at: Utc::now(),
            outcome: None,
        };
        let key = record.key();

        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.key() == key) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    /// Grade the stored prediction for a completed game. Returns whether it
    /// was correct, or `None` when there's nothing to grade.
    pub async fn grade(&self, game: &Game) -> Option<bool> {
        if !game.is_completed() {
            return None;
        }

        let key = game.matchup();
        let mut records = self.records.write().await;
        let record = records.iter_mut().find(|r| r.key() == key)?;

        let actual_winner = game.winner().map(str::to_string);
        let correct = actual_winner.as_deref() == Some(record.prediction.predicted_winner.as_str());

        record.outcome = Some(GradedOutcome {
            home_score: game.home_score,
            away_score: game.away_score,
            actual_winner,
            correct,
        });
        info!(
            "Graded {}: predicted {}, final {}-{} ({})",
            key,
            record.prediction.predicted_winner,
            game.home_score,
            game.away_score,
            if correct { "correct" } else { "miss" }
        );
        Some(correct)
    }

    /// (week, season) of every ungraded record that names both, oldest first
    pub async fn pending_weeks(&self) -> Vec<(u32, i32)> {
        let mut weeks: Vec<(u32, i32)> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.outcome.is_none())
            .filter_map(|r| Some((r.game.week?, r.game.season?)))
            .collect();
        weeks.sort_by_key(|&(week, season)| (season, week));
        weeks.dedup();
        weeks
    }

    pub async fn records(&self) -> Vec<PredictionRecord> {
        self.records.read().await.clone()
    }

    pub async fn report(&self) -> AccuracyReport {
        build_report(&self.records.read().await)
    }

    /// Write the ledger back to disk; a no-op for in-memory trackers
    pub async fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&*self.records.read().await)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

impl Default for AccuracyTracker {
    fn default() -> Self {
        Self::new()
    }
}
