//! Prompt text for external analysis
//!
//! Two templates: a comprehensive briefing with every section we have data
//! for, and a quick one-screen summary.

use crate::data::{team_by_code, HeadToHeadRecord, HistoryProvider, StatsProvider};
use crate::types::{Game, TeamStats, WeatherConditions};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PromptKind {
    #[default]
    Comprehensive,
    Quick,
}

/// Directory fields for one side, with placeholders for codes we don't know
struct TeamLabel {
    code: String,
    name: String,
    conference: String,
    division: String,
    stadium: String,
}

impl TeamLabel {
    fn resolve(code: &str) -> Self {
        match team_by_code(code) {
            Some(team) => Self {
                code: team.code.to_string(),
                name: team.name.to_string(),
                conference: team.conference.to_string(),
                division: team.division.to_string(),
                stadium: team.stadium.to_string(),
            },
            None => Self {
                code: code.to_string(),
                name: code.to_string(),
                conference: UNKNOWN.to_string(),
                division: UNKNOWN.to_string(),
                stadium: UNKNOWN.to_string(),
            },
        }
    }
}

/// Render the prompt for `game`, resolving stats and history through the
/// given providers
pub fn generate_prompt(
    stats: &dyn StatsProvider,
    history: &dyn HistoryProvider,
    game: &Game,
    kind: PromptKind,
) -> String {
    let home = stats.team_stats(&game.home_team);
    let away = stats.team_stats(&game.away_team);
    match kind {
        PromptKind::Comprehensive => {
            let h2h = history.head_to_head(&game.home_team, &game.away_team);
            comprehensive_prompt(game, &home, &away, &h2h)
        }
        PromptKind::Quick => quick_prompt(
            &game.home_team,
            &game.away_team,
            game.week.unwrap_or(1),
            &home,
            &away,
        ),
    }
}

fn signed(value: i64) -> String {
    if value > 0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}

fn list_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

fn performance_block(out: &mut String, team: &TeamLabel, stats: &TeamStats) {
    let _ = writeln!(out, "{} Offense/Defense:", team.name);
    let _ = writeln!(out, "- Average Points Scored: {:.1} per game", stats.avg_points_for);
    let _ = writeln!(out, "- Average Points Allowed: {:.1} per game", stats.avg_points_against);
    let _ = writeln!(out, "- Total Points For: {}", stats.points_for);
    let _ = writeln!(out, "- Total Points Against: {}", stats.points_against);
    let _ = writeln!(out, "- Point Differential: {}", signed(stats.point_differential()));
}

fn head_to_head_section(out: &mut String, home: &TeamLabel, away: &TeamLabel, h2h: &HeadToHeadRecord) {
    let (home_wins, away_wins) = h2h.wins_for(&home.code);
    let (home_avg, away_avg) = h2h.avg_points_for(&home.code);
    let last = &h2h.last_meeting;

    out.push_str("=== HEAD-TO-HEAD HISTORY ===\n\n");
    let _ = writeln!(
        out,
        "All-Time Series: {} {}-{}-{} {}",
        home.name, home_wins, away_wins, h2h.ties, away.name
    );
    let _ = writeln!(
        out,
        "Last Meeting: {} - {} {}, {} {}",
        last.date, last.home_team, last.home_score, last.away_team, last.away_score
    );
    out.push_str("Average Points in Head-to-Head:\n");
    let _ = writeln!(out, "- {}: {:.1} points", home.name, home_avg);
    let _ = writeln!(out, "- {}: {:.1} points", away.name, away_avg);
    out.push('\n');
}

fn weather_section(out: &mut String, weather: &WeatherConditions) {
    out.push_str("=== WEATHER CONDITIONS ===\n");
    let _ = writeln!(out, "Temperature: {}°F", weather.temperature);
    let _ = writeln!(out, "Wind Speed: {} mph", weather.wind_speed);
    let _ = writeln!(out, "Conditions: {}", weather.conditions);
    let _ = writeln!(out, "Precipitation: {}%", weather.precipitation);
    out.push('\n');
}

/// Full briefing. Head-to-head and weather sections only appear when there
/// is something to show.
pub fn comprehensive_prompt(
    game: &Game,
    home_stats: &TeamStats,
    away_stats: &TeamStats,
    h2h: &HeadToHeadRecord,
) -> String {
    let home = TeamLabel::resolve(&game.home_team);
    let away = TeamLabel::resolve(&game.away_team);
    let week = game.week.map(|w| w.to_string()).unwrap_or_else(|| "TBD".to_string());
    let season_type = if game.is_playoffs { "PLAYOFFS" } else { "Regular Season" };

    let mut out = String::new();
    out.push_str("NFL Game Prediction Analysis\n\n");
    let _ = writeln!(out, "MATCHUP: {} @ {}", away.name, home.name);
    let _ = writeln!(out, "DATE: {}", game.date.format("%Y-%m-%d"));
    if let Some(season) = game.season {
        let _ = writeln!(out, "SEASON: {}", season);
    }
    let _ = writeln!(out, "WEEK: {} ({})", week, season_type);
    out.push('\n');

    out.push_str("=== TEAM INFORMATION ===\n\n");
    let _ = writeln!(out, "{} ({}):", away.name, away.code);
    let _ = writeln!(out, "- Conference: {} {}", away.conference, away.division);
    let _ = writeln!(out, "- Stadium: Playing @ {}", home.stadium);
    let _ = writeln!(out, "- Current Record: {}", away_stats.record());
    let _ = writeln!(out, "- Home Record: {}", away_stats.home_record);
    let _ = writeln!(out, "- Away Record: {}", away_stats.away_record);
    out.push('\n');
    let _ = writeln!(out, "{} ({}):", home.name, home.code);
    let _ = writeln!(out, "- Conference: {} {}", home.conference, home.division);
    let _ = writeln!(out, "- Stadium: {} (Home advantage)", home.stadium);
    let _ = writeln!(out, "- Current Record: {}", home_stats.record());
    let _ = writeln!(out, "- Home Record: {}", home_stats.home_record);
    let _ = writeln!(out, "- Away Record: {}", home_stats.away_record);
    out.push('\n');

    out.push_str("=== OFFENSIVE & DEFENSIVE PERFORMANCE ===\n\n");
    performance_block(&mut out, &away, away_stats);
    out.push('\n');
    performance_block(&mut out, &home, home_stats);
    out.push('\n');

    out.push_str("=== RECENT FORM & MOMENTUM ===\n\n");
    let _ = writeln!(out, "{} Last 5 Games: {}", away.name, away_stats.last_five_games);
    let _ = writeln!(out, "{} Last 5 Games: {}", home.name, home_stats.last_five_games);
    out.push('\n');

    if h2h.has_history() {
        head_to_head_section(&mut out, &home, &away, h2h);
    }

    out.push_str("=== INJURY REPORT & KEY PLAYERS ===\n\n");
    for (team, stats) in [(&away, away_stats), (&home, home_stats)] {
        let _ = writeln!(
            out,
            "{} Injuries: {}",
            team.name,
            list_or(&stats.injuries, "No significant injuries reported")
        );
        let _ = writeln!(
            out,
            "{} Key Players: {}",
            team.name,
            list_or(&stats.key_players, "Key players TBD")
        );
        out.push('\n');
    }

    if let Some(weather) = &game.weather {
        weather_section(&mut out, weather);
    }

    out.push_str(ANALYSIS_REQUEST);
    out
}

const ANALYSIS_REQUEST: &str = "=== ANALYSIS REQUEST ===

Based on the comprehensive data above, please provide:

1. **GAME PREDICTION**: Who will win and by how many points?
2. **CONFIDENCE LEVEL**: Rate your confidence (1-10) and explain why
3. **KEY FACTORS**: What are the 3-5 most important factors that will determine the outcome?
4. **OVER/UNDER**: Predict the total points scored and whether it will be high/low scoring
5. **X-FACTORS**: What unexpected elements could swing the game?
6. **FINAL SCORE PREDICTION**: Provide an exact score prediction

Consider all statistical trends, recent form, injuries, weather (if applicable), home field advantage, divisional rivalry dynamics, and historical matchup patterns in your analysis.";

/// One-screen summary
pub fn quick_prompt(
    home_team: &str,
    away_team: &str,
    week: u32,
    home_stats: &TeamStats,
    away_stats: &TeamStats,
) -> String {
    let home = TeamLabel::resolve(home_team);
    let away = TeamLabel::resolve(away_team);

    let mut out = String::new();
    out.push_str("Quick NFL Game Prediction\n\n");
    let _ = writeln!(out, "MATCHUP: {} @ {}", away.name, home.name);
    let _ = writeln!(out, "WEEK: {}", week);
    out.push('\n');

    out.push_str("RECORDS:\n");
    let _ = writeln!(out, "- {}: {} (Away: {})", away_team, away_stats.record(), away_stats.away_record);
    let _ = writeln!(out, "- {}: {} (Home: {})", home_team, home_stats.record(), home_stats.home_record);
    out.push('\n');

    out.push_str("SCORING AVERAGES:\n");
    for (code, stats) in [(away_team, away_stats), (home_team, home_stats)] {
        let _ = writeln!(
            out,
            "- {}: {:.1} scored, {:.1} allowed",
            code, stats.avg_points_for, stats.avg_points_against
        );
    }
    out.push('\n');

    out.push_str("RECENT FORM:\n");
    let _ = writeln!(out, "- {}: {}", away_team, away_stats.last_five_games);
    let _ = writeln!(out, "- {}: {}", home_team, home_stats.last_five_games);
    out.push('\n');

    out.push_str("Predict: Winner, final score, and 2-3 key factors that will determine the outcome.");
    out
}
