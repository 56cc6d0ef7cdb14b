//! Tests for ESPN response parsing

#[cfg(test)]
mod tests {
    use super::super::espn::*;
    use chrono::{FixedOffset, NaiveDate};
    use serde_json::json;

    fn eastern() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    fn competitor(side: &str, abbr: &str, id: &str, score: &str) -> serde_json::Value {
        json!({
            "homeAway": side,
            "score": score,
            "team": { "id": id, "abbreviation": abbr }
        })
    }

    fn event(id: &str, date: &str, completed: bool, competitors: Vec<serde_json::Value>) -> serde_json::Value {
        json!({
            "id": id,
            "date": date,
            "competitions": [{
                "date": date,
                "competitors": competitors,
                "status": { "period": 4, "type": { "completed": completed, "description": "Final" } }
            }]
        })
    }

    #[test]
    fn test_parse_scoreboard_completed_game() {
        let data = json!({
            "season": { "type": 2, "year": 2025 },
            "events": [event(
                "401",
                "2025-09-05T00:20Z",
                true,
                vec![competitor("home", "PHI", "21", "24"), competitor("away", "DAL", "6", "20")],
            )]
        });

        let games = parse_scoreboard(&data, 1, 2025, eastern());
        assert_eq!(games.len(), 1);

        let game = &games[0];
        assert_eq!(game.home_team, "PHI");
        assert_eq!(game.away_team, "DAL");
        assert_eq!(game.home_score, 24);
        assert_eq!(game.away_score, 20);
        assert_eq!(game.week, Some(1));
        assert_eq!(game.season, Some(2025));
        assert!(!game.is_playoffs);
        // 00:20 UTC is 19:20 the previous evening in ET
        assert_eq!(game.date.date(), NaiveDate::from_ymd_opt(2025, 9, 4).unwrap());
    }

    #[test]
    fn test_parse_scoreboard_scheduled_game_has_no_scores() {
        let data = json!({
            "events": [event(
                "402",
                "2025-09-07T17:00Z",
                false,
                vec![competitor("home", "KC", "12", "0"), competitor("away", "WSH", "28", "0")],
            )]
        });

        let games = parse_scoreboard(&data, 1, 2025, eastern());
        assert_eq!(games[0].away_team, "WAS");
        assert!(!games[0].is_completed());
    }

    #[test]
    fn test_parse_scoreboard_skips_malformed_events() {
        let data = json!({
            "events": [
                event("1", "2025-09-07T17:00Z", false, vec![competitor("home", "KC", "12", "0")]),
                event(
                    "2",
                    "2025-09-07T17:00Z",
                    false,
                    vec![competitor("home", "KC", "12", "0"), competitor("home", "BUF", "2", "0")],
                ),
                event(
                    "3",
                    "2025-09-07T17:00Z",
                    false,
                    vec![competitor("home", "GB", "9", "0"), competitor("away", "CHI", "3", "0")],
                ),
            ]
        });

        let games = parse_scoreboard(&data, 1, 2025, eastern());
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].home_team, "GB");
    }

    #[test]
    fn test_parse_scoreboard_playoffs_and_weather() {
        let mut ev = event(
            "9",
            "2026-01-18T20:00Z",
            false,
            vec![competitor("home", "BUF", "2", "0"), competitor("away", "KC", "12", "0")],
        );
        ev["weather"] = json!({ "displayValue": "Snow", "temperature": 18 });
        let data = json!({ "season": { "type": 3 }, "events": [ev] });

        let games = parse_scoreboard(&data, 20, 2025, eastern());
        assert!(games[0].is_playoffs);
        let weather = games[0].weather.as_ref().unwrap();
        assert_eq!(weather.temperature, 18.0);
        assert_eq!(weather.conditions, "Snow");
    }

    #[test]
    fn test_parse_scoreboard_missing_events() {
        assert!(parse_scoreboard(&json!({}), 1, 2025, eastern()).is_empty());
    }

    #[test]
    fn test_parse_standings() {
        let data = json!({
            "children": [{
                "standings": { "entries": [
                    {
                        "team": { "id": "12", "abbreviation": "KC" },
                        "stats": [
                            { "name": "wins", "value": 3.0 },
                            { "name": "losses", "value": 1.0 },
                            { "name": "pointsFor", "value": 101.0 },
                            { "name": "pointsAgainst", "value": 80.0 },
                            { "name": "homeRecord", "displayValue": "2-0" },
                            { "name": "awayRecord", "displayValue": "1-1" }
                        ]
                    },
                    {
                        "team": { "id": "999", "abbreviation": "WSH" },
                        "stats": []
                    }
                ]}
            }]
        });

        let standings = parse_standings(&data);
        let kc = &standings["KC"];
        assert_eq!(kc.wins, 3);
        assert_eq!(kc.losses, 1);
        assert_eq!(kc.avg_points_for, 25.2);
        assert_eq!(kc.avg_points_against, 20.0);
        assert_eq!(kc.home_record, "2-0");
        assert_eq!(kc.away_record, "1-1");
        assert_eq!(kc.last_five_games, "W-W-W-W-W");

        // unknown id falls back to the abbreviation, no games played
        let was = &standings["WAS"];
        assert_eq!(was.avg_points_for, 0.0);
        assert_eq!(was.home_record, "0-0");
    }

    #[test]
    fn test_parse_recent_form_latest_first_and_padded() {
        let data = json!({
            "events": [
                event("a", "2025-09-07T17:00Z", true, vec![
                    competitor("home", "KC", "12", "20"), competitor("away", "LAC", "24", "27"),
                ]),
                event("b", "2025-09-14T17:00Z", true, vec![
                    competitor("home", "PHI", "21", "17"), competitor("away", "KC", "12", "17"),
                ]),
                event("c", "2025-09-21T17:00Z", true, vec![
                    competitor("home", "NYG", "19", "9"), competitor("away", "KC", "12", "22"),
                ]),
                event("d", "2025-09-28T17:00Z", false, vec![
                    competitor("home", "KC", "12", "0"), competitor("away", "BAL", "33", "0"),
                ]),
            ]
        });

        assert_eq!(parse_recent_form(&data, "12", 5), "W-T-L-W-W");
    }

    #[test]
    fn test_parse_key_players_priority_and_limit() {
        let data = json!({
            "athletes": [
                { "position": "offense", "items": [
                    { "displayName": "Xavier Worthy", "position": { "abbreviation": "WR" } },
                    { "displayName": "Patrick Mahomes", "position": { "abbreviation": "QB" } },
                    { "displayName": "Isiah Pacheco", "position": { "abbreviation": "RB" } },
                    { "displayName": "Travis Kelce", "position": { "abbreviation": "TE" } }
                ]},
                { "position": "defense", "items": [
                    { "displayName": "Chris Jones", "position": { "abbreviation": "DE" } }
                ]}
            ]
        });

        assert_eq!(
            parse_key_players(&data),
            vec!["Patrick Mahomes", "Isiah Pacheco", "Xavier Worthy"]
        );
    }

    #[test]
    fn test_parse_key_players_grouped_by_position() {
        let data = json!({
            "athletes": [
                { "position": { "abbreviation": "TE" }, "items": [{ "displayName": "Dallas Goedert" }] },
                { "position": { "abbreviation": "QB" }, "items": [{ "displayName": "Jalen Hurts" }] }
            ]
        });

        assert_eq!(parse_key_players(&data), vec!["Jalen Hurts", "Dallas Goedert"]);
    }

    #[test]
    fn test_parse_live_scores() {
        let mut ev = event(
            "55",
            "2025-09-07T17:00Z",
            false,
            vec![competitor("home", "SF", "25", "14"), competitor("away", "LA", "14", "10")],
        );
        ev["competitions"][0]["status"] = json!({ "period": 2, "type": { "description": "In Progress" } });

        let scores = parse_live_scores(&json!({ "events": [ev] }));
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].game_id, "55");
        assert_eq!(scores[0].away_team, "LAR");
        assert_eq!(scores[0].home_score, 14);
        assert_eq!(scores[0].quarter, "Q2");
        assert_eq!(scores[0].status, "In Progress");
    }

    #[test]
    fn test_sample_live_scores() {
        let scores = sample_live_scores();
        assert_eq!(scores.len(), 3);
        assert_eq!(scores[0].home_team, "KC");
        assert_eq!(scores[1].status, "Final");
    }
}
