//! ESPN site API client
//!
//! Scoreboard, standings, team schedule and roster lookups. Responses are read
//! as loose `serde_json::Value`s since ESPN adds and drops fields freely; the
//! `parse_*` functions are kept separate from the HTTP calls so they can be
//! fed fixtures.

use crate::config::EspnConfig;
use crate::data::teams::{normalize_code, team_by_code, team_by_espn_id};
use crate::error::{PredictorError, Result};
use crate::types::{Game, LiveScore, TeamStats, WeatherConditions};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

/// Order in which roster groups are searched for key players
pub const POSITION_PRIORITY: &[&str] = &["QB", "RB", "WR", "TE", "DE", "LB", "CB", "S"];

/// Key players kept per team
pub const MAX_KEY_PLAYERS: usize = 3;

/// Games in a recent-form string
pub const RECENT_FORM_GAMES: usize = 5;

const REGULAR_SEASON: u32 = 2;
const POSTSEASON: u64 = 3;

/// ESPN client for NFL data
#[derive(Clone)]
pub struct EspnClient {
    http: Client,
    base_url: String,
    /// Kickoff times are converted into this zone
    offset: FixedOffset,
}

impl EspnClient {
    pub fn new(config: &EspnConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            offset: eastern(),
        })
    }

    /// Report kickoff times in a fixed UTC offset
    pub fn with_utc_offset(mut self, hours: i32) -> Self {
        if let Some(offset) = FixedOffset::east_opt(hours * 3600) {
            self.offset = offset;
        }
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let data = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        Ok(data)
    }

    /// Regular-season games for a week
    pub async fn weekly_schedule(&self, week: u32, season: i32) -> Result<Vec<Game>> {
        let data = self
            .get_json(
                "/scoreboard",
                &[
                    ("week", week.to_string()),
                    ("seasontype", REGULAR_SEASON.to_string()),
                    ("year", season.to_string()),
                ],
            )
            .await?;

        let games = parse_scoreboard(&data, week, season, self.offset);
        info!("Fetched {} games for week {} of {}", games.len(), week, season);
        Ok(games)
    }

    /// League standings keyed by team code
    pub async fn standings(&self) -> Result<HashMap<String, TeamStats>> {
        let data = self.get_json("/standings", &[]).await?;
        let standings = parse_standings(&data);
        if standings.is_empty() {
            return Err(PredictorError::Api("standings response had no teams".to_string()));
        }
        Ok(standings)
    }

    /// "W-L-W-W-L" for the team's last five completed games
    pub async fn recent_form(&self, code: &str) -> Result<String> {
        let espn_id = espn_id_for(code)?;
        let data = self.get_json(&format!("/teams/{}/schedule", espn_id), &[]).await?;
        Ok(parse_recent_form(&data, espn_id, RECENT_FORM_GAMES))
    }

    pub async fn key_players(&self, code: &str) -> Result<Vec<String>> {
        let espn_id = espn_id_for(code)?;
        let data = self.get_json(&format!("/teams/{}/roster", espn_id), &[]).await?;
        Ok(parse_key_players(&data))
    }

    /// Today's scoreboard
    pub async fn live_scores(&self) -> Result<Vec<LiveScore>> {
        let data = self.get_json("/scoreboard", &[]).await?;
        Ok(parse_live_scores(&data))
    }
}

fn eastern() -> FixedOffset {
    FixedOffset::west_opt(5 * 3600).unwrap_or_else(|| Utc.fix())
}

fn espn_id_for(code: &str) -> Result<&'static str> {
    team_by_code(code)
        .map(|t| t.espn_id)
        .ok_or_else(|| PredictorError::Api(format!("No ESPN id for team {}", code)))
}

fn parse_kickoff(raw: &str, offset: FixedOffset) -> Option<NaiveDateTime> {
    let utc = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%MZ").map(|dt| dt.and_utc()))
        .ok()?;
    Some(utc.with_timezone(&offset).naive_local())
}

/// Scores arrive as strings on the scoreboard and as objects on team schedules
fn parse_score(value: &Value) -> u32 {
    match value {
        Value::String(s) => s.parse().unwrap_or(0),
        Value::Number(n) => n.as_u64().unwrap_or(0) as u32,
        Value::Object(_) => value["value"]
            .as_f64()
            .map(|v| v as u32)
            .or_else(|| value["displayValue"].as_str().and_then(|s| s.parse().ok()))
            .unwrap_or(0),
        _ => 0,
    }
}

fn competitor<'a>(competitors: &'a [Value], side: &str) -> Option<&'a Value> {
    let mut matching = competitors.iter().filter(|c| c["homeAway"].as_str() == Some(side));
    let first = matching.next()?;
    // more than one "home" means the event is malformed
    match matching.next() {
        Some(_) => None,
        None => Some(first),
    }
}

fn is_completed(event: &Value) -> bool {
    let competition = &event["competitions"][0];
    competition["status"]["type"]["completed"]
        .as_bool()
        .or_else(|| event["status"]["type"]["completed"].as_bool())
        .unwrap_or(false)
}

fn parse_weather(event: &Value) -> Option<WeatherConditions> {
    let weather = event.get("weather")?;
    let temperature = weather["temperature"].as_f64()?;
    Some(WeatherConditions {
        temperature,
        wind_speed: 0.0,
        precipitation: 0.0,
        conditions: weather["displayValue"].as_str().unwrap_or_default().to_string(),
    })
}

/// Scoreboard events into games. Events without exactly one home and one away
/// competitor are skipped.
pub fn parse_scoreboard(data: &Value, week: u32, season: i32, offset: FixedOffset) -> Vec<Game> {
    let Some(events) = data["events"].as_array() else {
        return Vec::new();
    };

    let season_type = data["season"]["type"].as_u64();
    let mut games = Vec::with_capacity(events.len());

    for event in events {
        let competition = &event["competitions"][0];
        let competitors = competition["competitors"].as_array().map(Vec::as_slice).unwrap_or_default();

        let (Some(home), Some(away)) = (competitor(competitors, "home"), competitor(competitors, "away")) else {
            debug!("Skipping event {} without home/away teams", event["id"]);
            continue;
        };

        let raw_date = competition["date"].as_str().or_else(|| event["date"].as_str()).unwrap_or_default();
        let Some(date) = parse_kickoff(raw_date, offset) else {
            debug!("Skipping event {} with unreadable date {:?}", event["id"], raw_date);
            continue;
        };

        let home_code = normalize_code(home["team"]["abbreviation"].as_str().unwrap_or_default());
        let away_code = normalize_code(away["team"]["abbreviation"].as_str().unwrap_or_default());

        let is_playoffs = event["season"]["type"].as_u64().or(season_type) == Some(POSTSEASON);

        let mut game = Game::new(home_code, away_code, date)
            .with_week(week)
            .with_season(season)
            .with_playoffs(is_playoffs);

        if is_completed(event) {
            game = game.with_scores(parse_score(&home["score"]), parse_score(&away["score"]));
        }
        if let Some(weather) = parse_weather(event) {
            game = game.with_weather(weather);
        }
        games.push(game);
    }

    games
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

fn stat_value<'a>(stats: &'a [Value], name: &str) -> Option<&'a Value> {
    stats.iter().find(|s| s["name"].as_str() == Some(name))
}

fn stat_count(stats: &[Value], name: &str) -> u32 {
    stat_value(stats, name)
        .and_then(|s| s["value"].as_f64())
        .map(|v| v.max(0.0) as u32)
        .unwrap_or(0)
}

fn stat_record(stats: &[Value], name: &str) -> String {
    stat_value(stats, name)
        .and_then(|s| s["displayValue"].as_str())
        .unwrap_or("0-0")
        .to_string()
}

/// Standings into per-team stats keyed by our team code. Recent form is left
/// as all wins until the schedule lookup fills it in.
pub fn parse_standings(data: &Value) -> HashMap<String, TeamStats> {
    let mut standings = HashMap::new();

    let groups = data["children"].as_array().map(Vec::as_slice).unwrap_or_default();
    for group in groups {
        let entries = group["standings"]["entries"].as_array().map(Vec::as_slice).unwrap_or_default();
        for entry in entries {
            let team = &entry["team"];
            let code = team["id"]
                .as_str()
                .and_then(team_by_espn_id)
                .map(|t| t.code.to_string())
                .or_else(|| team["abbreviation"].as_str().map(normalize_code));
            let Some(code) = code else { continue };

            let stats = entry["stats"].as_array().map(Vec::as_slice).unwrap_or_default();
            let wins = stat_count(stats, "wins");
            let losses = stat_count(stats, "losses");
            let ties = stat_count(stats, "ties");
            let points_for = stat_count(stats, "pointsFor");
            let points_against = stat_count(stats, "pointsAgainst");

            let played = wins + losses + ties;
            let (avg_for, avg_against) = if played > 0 {
                (
                    round_one(f64::from(points_for) / f64::from(played)),
                    round_one(f64::from(points_against) / f64::from(played)),
                )
            } else {
                (0.0, 0.0)
            };

            standings.insert(
                code,
                TeamStats {
                    wins,
                    losses,
                    ties,
                    points_for,
                    points_against,
                    avg_points_for: avg_for,
                    avg_points_against: avg_against,
                    home_record: stat_record(stats, "homeRecord"),
                    away_record: stat_record(stats, "awayRecord"),
                    last_five_games: vec!["W"; RECENT_FORM_GAMES].join("-"),
                    injuries: Vec::new(),
                    key_players: Vec::new(),
                },
            );
        }
    }

    standings
}

/// Results of the team's latest completed games, newest first, padded with
/// `W` up to `limit`
pub fn parse_recent_form(data: &Value, espn_id: &str, limit: usize) -> String {
    let mut completed: Vec<&Value> = data["events"]
        .as_array()
        .map(|events| events.iter().filter(|e| is_completed(e)).collect())
        .unwrap_or_default();
    completed.sort_by(|a, b| {
        let a = a["date"].as_str().unwrap_or_default();
        let b = b["date"].as_str().unwrap_or_default();
        b.cmp(a)
    });

    let mut results: Vec<&str> = completed
        .iter()
        .filter_map(|event| {
            let competitors = event["competitions"][0]["competitors"].as_array()?;
            let ours = competitors.iter().find(|c| c["team"]["id"].as_str() == Some(espn_id))?;
            let theirs = competitors.iter().find(|c| c["team"]["id"].as_str() != Some(espn_id))?;
            let result = match parse_score(&ours["score"]).cmp(&parse_score(&theirs["score"])) {
                std::cmp::Ordering::Greater => "W",
                std::cmp::Ordering::Less => "L",
                std::cmp::Ordering::Equal => "T",
            };
            Some(result)
        })
        .take(limit)
        .collect();

    results.resize(limit, "W");
    results.join("-")
}

fn position_of(value: &Value) -> Option<&str> {
    value["position"]["abbreviation"]
        .as_str()
        .or_else(|| value["position"].as_str())
}

/// First listed player for each priority position, at most three
pub fn parse_key_players(data: &Value) -> Vec<String> {
    let groups = data["athletes"].as_array().map(Vec::as_slice).unwrap_or_default();
    let mut players = Vec::new();

    for position in POSITION_PRIORITY {
        if players.len() >= MAX_KEY_PLAYERS {
            break;
        }

        let found = groups.iter().find_map(|group| {
            let items = group["items"].as_array()?;
            if position_of(group) == Some(*position) {
                return items.first();
            }
            items.iter().find(|item| position_of(item) == Some(*position))
        });

        if let Some(name) = found.and_then(|p| p["displayName"].as_str()).filter(|n| !n.is_empty()) {
            players.push(name.to_string());
        }
    }

    players
}

pub fn parse_live_scores(data: &Value) -> Vec<LiveScore> {
    let Some(events) = data["events"].as_array() else {
        return Vec::new();
    };

    events
        .iter()
        .map(|event| {
            let competition = &event["competitions"][0];
            let competitors = competition["competitors"].as_array().map(Vec::as_slice).unwrap_or_default();
            let home = competitors.iter().find(|c| c["homeAway"].as_str() == Some("home"));
            let away = competitors.iter().find(|c| c["homeAway"].as_str() == Some("away"));

            let code = |c: Option<&Value>| {
                c.and_then(|c| c["team"]["abbreviation"].as_str())
                    .map(normalize_code)
                    .unwrap_or_else(|| "TBD".to_string())
            };
            let score = |c: Option<&Value>| c.map(|c| parse_score(&c["score"])).unwrap_or(0);

            let status = &competition["status"];
            let quarter = match status["period"].as_u64() {
                Some(period) if period > 0 => format!("Q{}", period),
                _ => "Final".to_string(),
            };

            LiveScore {
                game_id: event["id"].as_str().unwrap_or_default().to_string(),
                home_team: code(home),
                away_team: code(away),
                home_score: score(home),
                away_score: score(away),
                status: status["type"]["description"].as_str().unwrap_or("Scheduled").to_string(),
                quarter,
            }
        })
        .collect()
}

/// Demo scoreboard shown when the live feed is empty or unreachable
pub fn sample_live_scores() -> Vec<LiveScore> {
    let line = |id: &str, home: &str, away: &str, hs, aw, status: &str, quarter: &str| LiveScore {
        game_id: id.to_string(),
        home_team: home.to_string(),
        away_team: away.to_string(),
        home_score: hs,
        away_score: aw,
        status: status.to_string(),
        quarter: quarter.to_string(),
    };

    vec![
        line("sample-1", "KC", "BUF", 14, 10, "In Progress", "Q2"),
        line("sample-2", "SF", "DAL", 21, 17, "Final", "Final"),
        line("sample-3", "PHI", "NYG", 7, 3, "In Progress", "Q1"),
    ]
}
