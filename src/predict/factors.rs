//! Prediction factors
//!
//! Eight signed scores, each measured from the home team's side: positive
//! favors the home team. Weather is the exception and applies to both sides.

use crate::data::{same_division, HeadToHeadRecord};
use crate::types::{Game, TeamStats, WeatherConditions};
use serde::{Deserialize, Serialize};

/// Points every home team gets
pub const BASE_HOME_FIELD: f64 = 3.0;
/// Extra points for the loudest stadiums
pub const STRONG_STADIUM_BONUS: f64 = 1.5;
/// Taken off when the home team wins fewer than three home games
pub const WEAK_HOME_PENALTY: f64 = 1.0;
pub const STRONG_HOME_STADIUMS: &[&str] = &["SEA", "KC", "GB", "NO", "DEN"];

/// Assumed home wins when the record string can't be read
const DEFAULT_HOME_WINS: u32 = 4;
const WEAK_HOME_WINS: u32 = 3;

pub const RECENT_FORM_WEIGHT: f64 = 1.5;
pub const HEAD_TO_HEAD_WEIGHT: f64 = 2.0;
pub const OFFENSE_WEIGHT: f64 = 0.3;
pub const DEFENSE_WEIGHT: f64 = 0.3;
pub const INJURY_WEIGHT: f64 = 0.5;

pub const PLAYOFF_MOTIVATION: f64 = 2.0;
pub const DIVISION_MOTIVATION: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionFactors {
    pub home_field_advantage: f64,
    pub recent_form: f64,
    pub head_to_head: f64,
    pub offensive_strength: f64,
    pub defensive_strength: f64,
    pub injuries: f64,
    pub weather: f64,
    /// Reported only; never moves the projected score
    pub motivation: f64,
}

impl PredictionFactors {
    /// (label, value) pairs in display order
    pub fn breakdown(&self) -> [(&'static str, f64); 8] {
        [
            ("Home field advantage", self.home_field_advantage),
            ("Recent form", self.recent_form),
            ("Head-to-head", self.head_to_head),
            ("Offensive strength", self.offensive_strength),
            ("Defensive strength", self.defensive_strength),
            ("Injuries", self.injuries),
            ("Weather", self.weather),
            ("Motivation", self.motivation),
        ]
    }
}

/// Compute all eight factors for `game`
pub fn analyze_factors(
    game: &Game,
    home: &TeamStats,
    away: &TeamStats,
    head_to_head: &HeadToHeadRecord,
) -> PredictionFactors {
    PredictionFactors {
        home_field_advantage: home_field_advantage(&game.home_team, home),
        recent_form: recent_form(home, away),
        head_to_head: head_to_head_advantage(&game.home_team, head_to_head),
        offensive_strength: (home.avg_points_for - away.avg_points_for) * OFFENSE_WEIGHT,
        defensive_strength: (away.avg_points_against - home.avg_points_against) * DEFENSE_WEIGHT,
        injuries: injury_impact(home, away),
        weather: game.weather.as_ref().map(weather_impact).unwrap_or(0.0),
        motivation: motivation(game),
    }
}

pub fn home_field_advantage(home_team: &str, home: &TeamStats) -> f64 {
    let mut advantage = BASE_HOME_FIELD;
    if STRONG_HOME_STADIUMS.contains(&home_team) {
        advantage += STRONG_STADIUM_BONUS;
    }
    if home.home_wins().unwrap_or(DEFAULT_HOME_WINS) < WEAK_HOME_WINS {
        advantage -= WEAK_HOME_PENALTY;
    }
    advantage
}

pub fn recent_form(home: &TeamStats, away: &TeamStats) -> f64 {
    (home.recent_wins() as f64 - away.recent_wins() as f64) * RECENT_FORM_WEIGHT
}

/// Series win differential per meeting, seen from `home_team`
pub fn head_to_head_advantage(home_team: &str, record: &HeadToHeadRecord) -> f64 {
    let meetings = record.meetings();
    if meetings == 0 {
        return 0.0;
    }
    let (ours, theirs) = record.wins_for(home_team);
    (f64::from(ours) - f64::from(theirs)) / f64::from(meetings) * HEAD_TO_HEAD_WEIGHT
}

pub fn injury_impact(home: &TeamStats, away: &TeamStats) -> f64 {
    -INJURY_WEIGHT * home.injuries.len() as f64 + INJURY_WEIGHT * away.injuries.len() as f64
}

/// Cumulative scoring penalty for cold, wind and precipitation
pub fn weather_impact(weather: &WeatherConditions) -> f64 {
    let mut impact = 0.0;

    if weather.temperature < 32.0 {
        impact -= 2.0;
    } else if weather.temperature < 45.0 {
        impact -= 1.0;
    }

    if weather.wind_speed > 20.0 {
        impact -= 2.0;
    } else if weather.wind_speed > 15.0 {
        impact -= 1.0;
    }

    if weather.precipitation > 50.0 {
        impact -= 1.5;
    }

    impact
}

pub fn motivation(game: &Game) -> f64 {
    let mut motivation = 0.0;
    if game.is_playoffs {
        motivation += PLAYOFF_MOTIVATION;
    }
    if same_division(&game.home_team, &game.away_team) {
        motivation += DIVISION_MOTIVATION;
    }
    motivation
}
