//! Tests for accuracy tracking

use super::*;
use crate::types::{Game, GamePrediction, ProjectedScore};
use chrono::NaiveDate;
use tempfile::tempdir;

fn game(home: &str, away: &str, day: u32) -> Game {
    let date = NaiveDate::from_ymd_opt(2025, 9, day)
        .unwrap()
        .and_hms_opt(13, 0, 0)
        .unwrap();
    Game::new(home, away, date).with_week(1)
}

fn pick(winner: &str, confidence: f64) -> GamePrediction {
    GamePrediction {
        predicted_winner: winner.to_string(),
        confidence,
        predicted_score: ProjectedScore { home: 24, away: 20 },
        key_factors: vec![],
        reasoning: String::new(),
    }
}

#[tokio::test]
async fn test_empty_report() {
    let report = AccuracyTracker::new().report().await;
    assert_eq!(report.total_predictions, 0);
    assert_eq!(report.overall.rate(), 0.0);
    assert_eq!(report.average_confidence, 0.0);
}

#[tokio::test]
async fn test_grading() {
    let tracker = AccuracyTracker::new();
    let kc_buf = game("KC", "BUF", 7);
    tracker.record(&kc_buf, &pick("KC", 74.0)).await;

    // not played yet
    assert_eq!(tracker.grade(&kc_buf).await, None);

    assert_eq!(tracker.grade(&kc_buf.clone().with_scores(27, 20)).await, Some(true));
    let record = &tracker.records().await[0];
    let outcome = record.outcome.as_ref().unwrap();
    assert_eq!(outcome.actual_winner.as_deref(), Some("KC"));
    assert_eq!(outcome.home_score, 27);
}

#[tokio::test]
async fn test_ties_and_unknown_games() {
    let tracker = AccuracyTracker::new();
    let g = game("DAL", "NYG", 7);
    tracker.record(&g, &pick("DAL", 62.0)).await;

    assert_eq!(tracker.grade(&g.clone().with_scores(20, 20)).await, Some(false));
    assert_eq!(tracker.grade(&game("GB", "CHI", 7).with_scores(10, 3)).await, None);
}

#[tokio::test]
async fn test_record_replaces_same_matchup() {
    let tracker = AccuracyTracker::new();
    let g = game("SF", "LAR", 7);
    tracker.record(&g, &pick("SF", 70.0)).await;
    tracker.record(&g, &pick("LAR", 58.0)).await;

    let records = tracker.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].prediction.predicted_winner, "LAR");
}

#[tokio::test]
async fn test_report_buckets() {
    let tracker = AccuracyTracker::new();
    // (home, away, pick, confidence, home score, away score)
    let results = [
        ("KC", "BUF", "KC", 90.0, 30, 20),   // home pick, high, correct
        ("DAL", "NYG", "NYG", 56.0, 24, 17), // away pick, low, wrong
        ("GB", "CHI", "GB", 70.0, 14, 21),   // home pick, wrong
        ("MIA", "NYJ", "NYJ", 82.0, 9, 13),  // away pick, high, correct
    ];
    for (i, (home, away, winner, confidence, hs, aw)) in results.iter().enumerate() {
        let g = game(home, away, 7 + i as u32);
        tracker.record(&g, &pick(winner, *confidence)).await;
        tracker.grade(&g.with_scores(*hs, *aw)).await;
    }
    tracker.record(&game("PIT", "BAL", 20), &pick("PIT", 60.0)).await;

    let report = tracker.report().await;
    assert_eq!(report.total_predictions, 5);
    assert_eq!(report.pending, 1);
    assert_eq!(report.overall, HitRate { total: 4, correct: 2 });
    assert_eq!(report.overall.rate(), 50.0);
    assert_eq!(report.home_picks, HitRate { total: 2, correct: 1 });
    assert_eq!(report.away_picks, HitRate { total: 2, correct: 1 });
    assert_eq!(report.high_confidence, HitRate { total: 2, correct: 2 });
    assert_eq!(report.low_confidence, HitRate { total: 1, correct: 0 });
    assert_eq!(report.average_confidence, 71.6);
    assert_eq!(report.last_5, HitRate { total: 4, correct: 2 });
}

#[test]
fn test_last_windows() {
    let records: Vec<PredictionRecord> = (0..12)
        .map(|i| PredictionRecord {
            game: game("KC", "BUF", 1 + i),
            prediction: pick("KC", 65.0),
            recorded_at: Utc::now(),
            // first six wrong, last six right
            outcome: Some(GradedOutcome {
                home_score: 20,
                away_score: 10,
                actual_winner: Some("KC".to_string()),
                correct: i >= 6,
            }),
        })
        .collect();

    let report = build_report(&records);
    assert_eq!(report.last_10, HitRate { total: 10, correct: 6 });
    assert_eq!(report.last_5, HitRate { total: 5, correct: 5 });
}

#[tokio::test]
async fn test_ledger_persists() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("ledger.json");

    let tracker = AccuracyTracker::open(&path).await.unwrap();
    let g = game("PHI", "WAS", 7);
    tracker.record(&g, &pick("PHI", 66.0)).await;
    tracker.grade(&g.with_scores(31, 17)).await;
    tracker.save().await.unwrap();

    let reloaded = AccuracyTracker::open(&path).await.unwrap();
    let report = reloaded.report().await;
    assert_eq!(report.total_predictions, 1);
    assert_eq!(report.overall, HitRate { total: 1, correct: 1 });
}

#[test]
fn test_report_display() {
    let report = AccuracyReport {
        total_predictions: 2,
        overall: HitRate { total: 2, correct: 1 },
        ..Default::default()
    };
    let text = report.to_string();
    assert!(text.contains("Overall accuracy:     1/2 (50.0%)"));
    assert!(text.starts_with("Predictions recorded: 2 (0 pending)"));
}

#[tokio::test]
async fn test_pending_weeks() {
    let tracker = AccuracyTracker::new();
    let week3 = game("KC", "BUF", 21).with_week(3).with_season(2025);
    tracker.record(&week3, &pick("KC", 70.0)).await;
    tracker.record(&game("DAL", "NYG", 14).with_season(2025), &pick("DAL", 60.0)).await;
    tracker.record(&game("GB", "CHI", 14).with_season(2025), &pick("GB", 60.0)).await;
    // no season: can't be looked up again
    tracker.record(&game("SF", "LAR", 14), &pick("SF", 60.0)).await;

    assert_eq!(tracker.pending_weeks().await, vec![(1, 2025), (3, 2025)]);

    tracker.grade(&week3.with_scores(24, 21)).await;
    assert_eq!(tracker.pending_weeks().await, vec![(1, 2025)]);
}
