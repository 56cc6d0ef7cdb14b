//! Score projection and prediction assembly

use super::factors::{analyze_factors, PredictionFactors};
use crate::data::{HeadToHeadRecord, HistoryProvider, StatsProvider};
use crate::types::{Game, GamePrediction, ProjectedScore, TeamStats};
use std::sync::Arc;
use tracing::debug;

/// Points a team "allows" against a perfectly average offense
const BASELINE_POINTS: f64 = 35.0;
pub const MIN_SCORE: f64 = 7.0;
pub const MAX_SCORE: f64 = 50.0;

pub const BASE_CONFIDENCE: f64 = 60.0;
pub const CONFIDENCE_PER_POINT: f64 = 2.0;
pub const MIN_CONFIDENCE: f64 = 55.0;
pub const MAX_CONFIDENCE: f64 = 95.0;

/// Predict `game` from already-resolved inputs. Total: every input produces a
/// prediction.
pub fn predict(
    game: &Game,
    home: &TeamStats,
    away: &TeamStats,
    head_to_head: &HeadToHeadRecord,
) -> GamePrediction {
    let factors = analyze_factors(game, home, away, head_to_head);
    predict_from_factors(game, home, away, &factors)
}

pub fn predict_from_factors(
    game: &Game,
    home: &TeamStats,
    away: &TeamStats,
    factors: &PredictionFactors,
) -> GamePrediction {
    let score = project_score(home, away, factors);
    let home_wins = score.home >= score.away;

    let predicted_winner = if home_wins { &game.home_team } else { &game.away_team };
    let margin = score.margin();

    debug!(
        "{}: {}-{} ({:?})",
        game.matchup(),
        score.home,
        score.away,
        factors
    );

    GamePrediction {
        predicted_winner: predicted_winner.clone(),
        confidence: confidence(margin),
        predicted_score: score,
        key_factors: key_factors(factors),
        reasoning: reasoning(factors, margin, home_wins),
    }
}

/// Average matchup expectation, then each factor credited to the side it favors
pub fn project_score(home: &TeamStats, away: &TeamStats, factors: &PredictionFactors) -> ProjectedScore {
    let mut home_score = (home.avg_points_for + (BASELINE_POINTS - away.avg_points_against)) / 2.0;
    let mut away_score = (away.avg_points_for + (BASELINE_POINTS - home.avg_points_against)) / 2.0;

    home_score += factors.home_field_advantage;

    for factor in [
        factors.recent_form,
        factors.head_to_head,
        factors.offensive_strength,
        factors.defensive_strength,
        factors.injuries,
    ] {
        home_score += factor.max(0.0);
        away_score += (-factor).max(0.0);
    }

    if factors.weather != 0.0 {
        home_score += factors.weather / 2.0;
        away_score += factors.weather / 2.0;
    }

    ProjectedScore {
        home: finalize_score(home_score),
        away: finalize_score(away_score),
    }
}

/// Clamp to a realistic range, halves to even
fn finalize_score(raw: f64) -> u32 {
    raw.clamp(MIN_SCORE, MAX_SCORE).round_ties_even() as u32
}

pub fn confidence(margin: u32) -> f64 {
    (BASE_CONFIDENCE + f64::from(margin) * CONFIDENCE_PER_POINT).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

fn side(value: f64) -> &'static str {
    if value > 0.0 {
        "Home"
    } else {
        "Away"
    }
}

pub fn key_factors(factors: &PredictionFactors) -> Vec<String> {
    let mut notes = Vec::new();

    if factors.home_field_advantage.abs() > 2.0 {
        notes.push("Strong home field advantage".to_string());
    }
    if factors.recent_form.abs() > 3.0 {
        notes.push(format!("{} team has better recent form", side(factors.recent_form)));
    }
    if factors.offensive_strength.abs() > 2.0 {
        notes.push(format!("{} team has stronger offense", side(factors.offensive_strength)));
    }
    if factors.defensive_strength.abs() > 2.0 {
        notes.push(format!("{} team has stronger defense", side(factors.defensive_strength)));
    }
    if factors.weather < -2.0 {
        notes.push("Weather conditions favor lower scoring".to_string());
    }

    notes
}

pub fn reasoning(factors: &PredictionFactors, margin: u32, home_wins: bool) -> String {
    let winner = if home_wins { "home" } else { "away" };
    let mut sentences = vec![format!("Predicting a {}-point victory for the {} team.", margin, winner)];

    if factors.home_field_advantage > 2.0 {
        sentences.push("Strong home field advantage plays a key role.".to_string());
    }
    if factors.recent_form.abs() > 2.0 {
        let better = if factors.recent_form > 0.0 { "home" } else { "away" };
        sentences.push(format!("The {} team's superior recent form is a deciding factor.", better));
    }
    if factors.weather < -2.0 {
        sentences.push("Poor weather conditions should limit scoring.".to_string());
    }

    sentences.join(" ")
}

/// Prediction engine wired to its data sources
#[derive(Clone)]
pub struct PredictionEngine {
    stats: Arc<dyn StatsProvider>,
    history: Arc<dyn HistoryProvider>,
}

impl PredictionEngine {
    pub fn new(stats: Arc<dyn StatsProvider>, history: Arc<dyn HistoryProvider>) -> Self {
        Self { stats, history }
    }

    pub fn stats(&self) -> &dyn StatsProvider {
        self.stats.as_ref()
    }

    pub fn history(&self) -> &dyn HistoryProvider {
        self.history.as_ref()
    }

    pub fn factors(&self, game: &Game) -> PredictionFactors {
        let (home, away, h2h) = self.inputs(game);
        analyze_factors(game, &home, &away, &h2h)
    }

    pub fn predict_game(&self, game: &Game) -> GamePrediction {
        let (home, away, h2h) = self.inputs(game);
        predict(game, &home, &away, &h2h)
    }

    /// One prediction per game, in order
    pub fn predict_week(&self, games: &[Game]) -> Vec<GamePrediction> {
        games.iter().map(|game| self.predict_game(game)).collect()
    }

    fn inputs(&self, game: &Game) -> (TeamStats, TeamStats, HeadToHeadRecord) {
        (
            self.stats.team_stats(&game.home_team),
            self.stats.team_stats(&game.away_team),
            self.history.head_to_head(&game.home_team, &game.away_team),
        )
    }
}
