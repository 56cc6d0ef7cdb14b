//! Core domain types

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A scheduled or completed game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub home_team: String,
    pub away_team: String,
    /// Kickoff, wall-clock
    pub date: NaiveDateTime,
    #[serde(default)]
    pub home_score: u32,
    #[serde(default)]
    pub away_score: u32,
    #[serde(default)]
    pub week: Option<u32>,
    #[serde(default)]
    pub season: Option<i32>,
    #[serde(default)]
    pub is_playoffs: bool,
    #[serde(default)]
    pub weather: Option<WeatherConditions>,
}

impl Game {
    pub fn new(home_team: impl Into<String>, away_team: impl Into<String>, date: NaiveDateTime) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            date,
            home_score: 0,
            away_score: 0,
            week: None,
            season: None,
            is_playoffs: false,
            weather: None,
        }
    }

    pub fn with_week(mut self, week: u32) -> Self {
        self.week = Some(week);
        self
    }

    pub fn with_season(mut self, season: i32) -> Self {
        self.season = Some(season);
        self
    }

    pub fn with_playoffs(mut self, is_playoffs: bool) -> Self {
        self.is_playoffs = is_playoffs;
        self
    }

    pub fn with_weather(mut self, weather: WeatherConditions) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn with_scores(mut self, home_score: u32, away_score: u32) -> Self {
        self.home_score = home_score;
        self.away_score = away_score;
        self
    }

    /// Human-readable result
    pub fn outcome(&self) -> String {
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => format!("{} wins", self.home_team),
            std::cmp::Ordering::Less => format!("{} wins", self.away_team),
            std::cmp::Ordering::Equal => "It's a tie".to_string(),
        }
    }

    /// "AWAY @ HOME on YYYY-MM-DD"
    pub fn matchup(&self) -> String {
        format!(
            "{} @ {} on {}",
            self.away_team,
            self.home_team,
            self.date.format("%Y-%m-%d")
        )
    }

    /// Point spread from the home team's perspective
    pub fn spread(&self) -> i64 {
        i64::from(self.home_score) - i64::from(self.away_score)
    }

    pub fn total_points(&self) -> u32 {
        self.home_score + self.away_score
    }

    pub fn is_completed(&self) -> bool {
        self.home_score > 0 || self.away_score > 0
    }

    /// Winner of a completed game; `None` while unplayed or tied
    pub fn winner(&self) -> Option<&str> {
        if !self.is_completed() {
            return None;
        }
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Some(&self.home_team),
            std::cmp::Ordering::Less => Some(&self.away_team),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Season aggregate statistics for one team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: u32,
    pub points_against: u32,
    pub avg_points_for: f64,
    pub avg_points_against: f64,
    /// "W-L"
    pub home_record: String,
    /// "W-L"
    pub away_record: String,
    /// Most recent first, e.g. "W-W-L-W-W"
    pub last_five_games: String,
    #[serde(default)]
    pub injuries: Vec<String>,
    #[serde(default)]
    pub key_players: Vec<String>,
}

impl TeamStats {
    /// "W-L-T"
    pub fn record(&self) -> String {
        format!("{}-{}-{}", self.wins, self.losses, self.ties)
    }

    pub fn point_differential(&self) -> i64 {
        i64::from(self.points_for) - i64::from(self.points_against)
    }

    /// Wins among the last five games
    pub fn recent_wins(&self) -> usize {
        self.last_five_games.chars().filter(|c| *c == 'W').count()
    }

    /// Wins parsed from the home record, `None` when it isn't "W-L"
    pub fn home_wins(&self) -> Option<u32> {
        let (wins, _) = self.home_record.split_once('-')?;
        wins.trim().parse().ok()
    }
}

/// Game-time weather
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConditions {
    /// Degrees Fahrenheit
    pub temperature: f64,
    /// Miles per hour
    pub wind_speed: f64,
    /// Percent chance
    pub precipitation: f64,
    pub conditions: String,
}

/// Projected final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedScore {
    pub home: u32,
    pub away: u32,
}

impl ProjectedScore {
    pub fn margin(&self) -> u32 {
        self.home.abs_diff(self.away)
    }
}

/// Prediction for a single game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamePrediction {
    pub predicted_winner: String,
    /// Percent, 55-95
    pub confidence: f64,
    pub predicted_score: ProjectedScore,
    pub key_factors: Vec<String>,
    pub reasoning: String,
}

impl GamePrediction {
    pub fn picks_home(&self, game: &Game) -> bool {
        self.predicted_winner == game.home_team
    }
}

/// In-progress or final scoreboard line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveScore {
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub status: String,
    pub quarter: String,
}
