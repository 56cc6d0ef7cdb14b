//! Historical game log and head-to-head aggregation

use super::HistoryProvider;
use crate::types::WeatherConditions;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Average points assumed for a series with no meetings
pub const DEFAULT_SERIES_POINTS: f64 = 20.0;

/// Latest season present in the built-in log
const LOG_SEASON: i32 = 2024;

/// One stored past game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameHistoryEntry {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub week: u32,
    pub season: i32,
    pub is_playoffs: bool,
    #[serde(default)]
    pub weather: Option<WeatherConditions>,
    #[serde(default)]
    pub attendance: Option<u32>,
}

impl GameHistoryEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        home_team: &str,
        away_team: &str,
        home_score: u32,
        away_score: u32,
        week: u32,
        season: i32,
        is_playoffs: bool,
    ) -> Self {
        Self {
            date,
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            home_score,
            away_score,
            week,
            season,
            is_playoffs,
            weather: None,
            attendance: None,
        }
    }

    /// Placeholder meeting for teams that never played
    pub fn sentinel(team1: &str, team2: &str) -> Self {
        Self::new(NaiveDate::default(), team1, team2, 0, 0, 1, 1970, false)
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    fn is_between(&self, a: &str, b: &str) -> bool {
        (self.home_team == a && self.away_team == b) || (self.home_team == b && self.away_team == a)
    }

    /// (points for `team`, points for its opponent)
    fn points_from(&self, team: &str) -> (u32, u32) {
        if self.home_team == team {
            (self.home_score, self.away_score)
        } else {
            (self.away_score, self.home_score)
        }
    }
}

/// Series between two teams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHeadRecord {
    pub team1: String,
    pub team2: String,
    pub team1_wins: u32,
    pub team2_wins: u32,
    pub ties: u32,
    pub last_meeting: GameHistoryEntry,
    pub avg_points_team1: f64,
    pub avg_points_team2: f64,
}

impl HeadToHeadRecord {
    /// 0-0-0 record with the sentinel meeting
    pub fn empty(team1: &str, team2: &str) -> Self {
        Self {
            team1: team1.to_string(),
            team2: team2.to_string(),
            team1_wins: 0,
            team2_wins: 0,
            ties: 0,
            last_meeting: GameHistoryEntry::sentinel(team1, team2),
            avg_points_team1: DEFAULT_SERIES_POINTS,
            avg_points_team2: DEFAULT_SERIES_POINTS,
        }
    }

    pub fn meetings(&self) -> u32 {
        self.team1_wins + self.team2_wins + self.ties
    }

    pub fn has_history(&self) -> bool {
        self.meetings() > 0
    }

    /// Series wins for `team` and its opponent
    pub fn wins_for(&self, team: &str) -> (u32, u32) {
        if self.team1 == team {
            (self.team1_wins, self.team2_wins)
        } else {
            (self.team2_wins, self.team1_wins)
        }
    }

    /// Average points for `team` and its opponent
    pub fn avg_points_for(&self, team: &str) -> (f64, f64) {
        if self.team1 == team {
            (self.avg_points_team1, self.avg_points_team2)
        } else {
            (self.avg_points_team2, self.avg_points_team1)
        }
    }
}

/// Aggregate every meeting of `team1` and `team2` in `log`.
///
/// Home/away designation of the stored games is ignored. The last meeting is
/// the latest-dated match; equal dates keep log order.
pub fn head_to_head_record(log: &[GameHistoryEntry], team1: &str, team2: &str) -> HeadToHeadRecord {
    let meetings: Vec<&GameHistoryEntry> = log.iter().filter(|g| g.is_between(team1, team2)).collect();

    let Some(first) = meetings.first() else {
        return HeadToHeadRecord::empty(team1, team2);
    };

    let mut record = HeadToHeadRecord::empty(team1, team2);
    let mut team1_points = 0u32;
    let mut team2_points = 0u32;
    let mut last = *first;

    for game in &meetings {
        let (ours, theirs) = game.points_from(team1);
        team1_points += ours;
        team2_points += theirs;

        match ours.cmp(&theirs) {
            std::cmp::Ordering::Greater => record.team1_wins += 1,
            std::cmp::Ordering::Less => record.team2_wins += 1,
            std::cmp::Ordering::Equal => record.ties += 1,
        }

        if game.date > last.date {
            last = game;
        }
    }

    let n = meetings.len() as f64;
    record.avg_points_team1 = f64::from(team1_points) / n;
    record.avg_points_team2 = f64::from(team2_points) / n;
    record.last_meeting = last.clone();
    record
}

/// Built-in sample of past games
pub fn game_log() -> Vec<GameHistoryEntry> {
    let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap_or_default();
    vec![
        GameHistoryEntry::new(d(2024, 9, 8), "KC", "BAL", 27, 20, 1, 2024, false),
        GameHistoryEntry::new(d(2024, 9, 9), "BUF", "ARI", 34, 28, 1, 2024, false),
        GameHistoryEntry::new(d(2024, 9, 9), "PHI", "GB", 24, 19, 1, 2024, false),
        GameHistoryEntry::new(d(2024, 9, 9), "PIT", "ATL", 18, 10, 1, 2024, false),
        GameHistoryEntry::new(d(2024, 9, 15), "KC", "CIN", 26, 25, 2, 2024, false),
        GameHistoryEntry::new(d(2024, 9, 16), "BUF", "MIA", 31, 10, 2, 2024, false),
        GameHistoryEntry::new(d(2023, 9, 7), "KC", "DET", 21, 20, 1, 2023, false),
        GameHistoryEntry::new(d(2023, 9, 11), "BUF", "NYJ", 22, 16, 1, 2023, false),
        GameHistoryEntry::new(d(2023, 1, 14), "BUF", "MIA", 34, 31, 18, 2023, true),
        GameHistoryEntry::new(d(2023, 1, 21), "KC", "JAX", 27, 20, 19, 2023, true),
    ]
}

/// History served from an in-memory log
#[derive(Debug, Clone)]
pub struct StaticHistory {
    log: Vec<GameHistoryEntry>,
}

impl StaticHistory {
    pub fn new() -> Self {
        Self::with_log(game_log())
    }

    pub fn with_log(log: Vec<GameHistoryEntry>) -> Self {
        Self { log }
    }

    pub fn log(&self) -> &[GameHistoryEntry] {
        &self.log
    }

    /// Games involving `team` from the last `seasons` seasons
    pub fn team_history(&self, team: &str, seasons: i32) -> Vec<GameHistoryEntry> {
        let cutoff = LOG_SEASON - seasons + 1;
        self.log
            .iter()
            .filter(|g| g.involves(team) && g.season >= cutoff)
            .cloned()
            .collect()
    }

    /// Current-season games for `team`, latest first
    pub fn recent_performance(&self, team: &str, games: usize) -> Vec<GameHistoryEntry> {
        let mut history = self.team_history(team, 1);
        history.sort_by(|a, b| b.date.cmp(&a.date));
        history.truncate(games);
        history
    }
}

impl Default for StaticHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryProvider for StaticHistory {
    fn head_to_head(&self, team_a: &str, team_b: &str) -> HeadToHeadRecord {
        head_to_head_record(&self.log, team_a, team_b)
    }
}
