//! Tests for the calendar and the weekly runner

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::config::SchedulerConfig;
    use crate::data::{StaticHistory, StaticStats};
    use crate::error::PredictorError;
    use crate::model::{Analyst, MockTextCompletion};
    use crate::monitor::AccuracyTracker;
    use crate::predict::PredictionEngine;
    use crate::storage::PromptStore;
    use crate::types::{Game, GamePrediction, ProjectedScore};
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime, TimeZone, Timelike, Utc, Weekday};
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn season_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 5).unwrap()
    }

    fn eastern() -> chrono::FixedOffset {
        chrono::FixedOffset::west_opt(5 * 3600).unwrap()
    }

    struct FixedSchedule(Vec<Game>);

    #[async_trait]
    impl ScheduleSource for FixedSchedule {
        async fn weekly_games(&self, _week: u32, _season: i32) -> Vec<Game> {
            self.0.clone()
        }
    }

    /// Games keyed by week; finished scores can be filled in later
    #[derive(Default)]
    struct WeeklySchedule(parking_lot::Mutex<HashMap<u32, Vec<Game>>>);

    impl WeeklySchedule {
        fn set_week(&self, week: u32, games: Vec<Game>) {
            self.0.lock().insert(week, games);
        }
    }

    #[async_trait]
    impl ScheduleSource for WeeklySchedule {
        async fn weekly_games(&self, week: u32, _season: i32) -> Vec<Game> {
            self.0.lock().get(&week).cloned().unwrap_or_default()
        }
    }

    fn game(home: &str, away: &str) -> Game {
        let date = NaiveDate::from_ymd_opt(2025, 9, 14)
            .unwrap()
            .and_hms_opt(13, 0, 0)
            .unwrap();
        Game::new(home, away, date).with_week(2).with_season(2025)
    }

    fn runner(dir: &Path, schedule: Arc<dyn ScheduleSource>, tracker: Arc<AccuracyTracker>) -> WeeklyRunner {
        let engine = PredictionEngine::new(Arc::new(StaticStats::new()), Arc::new(StaticHistory::new()));
        let analyst = Analyst::new(None, engine.clone());
        let store = PromptStore::new(dir.join("prompts"), dir.join("state.json"));
        WeeklyRunner::new(engine, analyst, schedule, store, tracker, season_start())
    }

    #[test]
    fn test_cursor_advance_wraps_after_regular_season() {
        let mut cursor = WeekCursor::new(17, 2025).unwrap();
        cursor.advance();
        assert_eq!(cursor, WeekCursor { week: 18, season: 2025 });
        cursor.advance();
        assert_eq!(cursor, WeekCursor { week: 1, season: 2026 });
    }

    #[test]
    fn test_cursor_set_week_bounds() {
        let mut cursor = WeekCursor::new(1, 2025).unwrap();
        assert!(cursor.set_week(22).is_ok());
        assert!(cursor.is_playoffs());
        assert!(matches!(cursor.set_week(0), Err(PredictorError::InvalidWeek(0))));
        assert!(matches!(cursor.set_week(23), Err(PredictorError::InvalidWeek(23))));
        assert_eq!(cursor.week, 22);
        assert!(WeekCursor::new(30, 2025).is_err());
    }

    #[test]
    fn test_current_week() {
        let start = season_start();
        let day = |m, d| NaiveDate::from_ymd_opt(2025, m, d).unwrap();
        assert_eq!(current_week(day(9, 5), start), 1);
        assert_eq!(current_week(day(9, 11), start), 1);
        assert_eq!(current_week(day(9, 12), start), 2);
        assert_eq!(current_week(day(8, 1), start), 1);
        assert_eq!(current_week(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(), start), 22);

        let cursor = WeekCursor::for_date(day(10, 3), 2025, start);
        assert_eq!(cursor.week, 5);
    }

    #[test]
    fn test_fallback_schedule_week_one() {
        let games = fallback_schedule(1, 2025, season_start());
        assert_eq!(games.len(), 8);

        let first = &games[0];
        assert_eq!((first.home_team.as_str(), first.away_team.as_str()), ("KC", "BUF"));
        assert_eq!(
            first.date,
            NaiveDate::from_ymd_opt(2025, 9, 9).unwrap().and_hms_opt(20, 15, 0).unwrap()
        );
        assert_eq!(
            games[1].date,
            NaiveDate::from_ymd_opt(2025, 9, 12).unwrap().and_hms_opt(13, 0, 0).unwrap()
        );
        assert!(games.iter().all(|g| g.week == Some(1) && g.season == Some(2025) && !g.is_playoffs));
    }

    #[test]
    fn test_fallback_schedule_rotation() {
        let week5 = fallback_schedule(5, 2025, season_start());
        assert_eq!(week5[0].home_team, "JAX");
        assert_eq!(week5[0].date.date(), NaiveDate::from_ymd_opt(2025, 10, 10).unwrap());

        // wraps around the matchup list
        let week8 = fallback_schedule(8, 2025, season_start());
        let homes: Vec<&str> = week8.iter().map(|g| g.home_team.as_str()).collect();
        assert_eq!(homes, ["NO", "NE", "KC", "DAL", "GB", "SF", "MIA", "PIT"]);
        assert_eq!(week8[1].date.time(), NaiveTime::from_hms_opt(20, 15, 0).unwrap());

        // the cycle repeats every eight weeks
        let week9 = fallback_schedule(9, 2025, season_start());
        assert_eq!(week9[0].home_team, "KC");
        assert!(fallback_schedule(20, 2025, season_start())[0].is_playoffs);
    }

    #[test]
    fn test_prompt_filename() {
        assert_eq!(prompt_filename(&game("DAL", "NYG")), "week2_NYG@DAL_2025-09-14.txt");

        let date = NaiveDate::from_ymd_opt(2025, 9, 14).unwrap().and_hms_opt(13, 0, 0).unwrap();
        assert_eq!(prompt_filename(&Game::new("GB", "CHI", date)), "week1_CHI@GB_2025-09-14.txt");
    }

    #[test]
    fn test_next_fire() {
        // Tuesday 2025-09-09, 09:00 Eastern
        let now = Utc.with_ymd_and_hms(2025, 9, 9, 14, 0, 0).unwrap();
        let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let eight = NaiveTime::from_hms_opt(8, 0, 0).unwrap();

        let weekly = next_fire(now, eastern(), Some(Weekday::Tue), ten);
        assert_eq!(weekly, Utc.with_ymd_and_hms(2025, 9, 9, 15, 0, 0).unwrap());

        let daily = next_fire(now, eastern(), None, eight);
        assert_eq!(daily, Utc.with_ymd_and_hms(2025, 9, 10, 13, 0, 0).unwrap());

        // exactly at the fire time moves to the next week
        let again = next_fire(weekly, eastern(), Some(Weekday::Tue), ten);
        assert_eq!(again, Utc.with_ymd_and_hms(2025, 9, 16, 15, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_next_job_picks_earliest() {
        let dir = tempdir().unwrap();
        let runner = runner(dir.path(), Arc::new(NoSchedule), Arc::new(AccuracyTracker::new()));
        let scheduler = Scheduler::new(runner, &SchedulerConfig::default()).unwrap();

        let (job, at) = scheduler.next_job(Utc.with_ymd_and_hms(2025, 9, 9, 14, 0, 0).unwrap());
        assert_eq!(job, Job::Weekly);
        assert_eq!(at.hour(), 15);

        let (job, at) = scheduler.next_job(Utc.with_ymd_and_hms(2025, 9, 9, 16, 0, 0).unwrap());
        assert_eq!(job, Job::Daily);
        assert_eq!(at, Utc.with_ymd_and_hms(2025, 9, 10, 13, 0, 0).unwrap());
    }

    #[test]
    fn test_scheduler_rejects_bad_config() {
        let dir = tempdir().unwrap();
        let config = SchedulerConfig {
            weekly_time: "25:99".to_string(),
            ..Default::default()
        };
        let runner = runner(dir.path(), Arc::new(NoSchedule), Arc::new(AccuracyTracker::new()));
        assert!(Scheduler::new(runner, &config).is_err());
    }

    #[tokio::test]
    async fn test_run_week_uses_fallback_when_schedule_empty() {
        let dir = tempdir().unwrap();
        let runner = runner(dir.path(), Arc::new(NoSchedule), Arc::new(AccuracyTracker::new()));

        let report = runner.run_week(1, 2025).await;
        assert!(report.used_fallback);
        assert_eq!(report.games.len(), 8);
        assert_eq!(report.prompts_written(), 8);
        assert!(report.failures.is_empty());
        assert_eq!(report.graded, 0);

        let prompts = runner.store().list_prompts().await.unwrap();
        assert_eq!(prompts.len(), 8);
        assert!(prompts.iter().any(|p| p.ends_with("week1_BUF@KC_2025-09-09.txt")));
        assert_eq!(runner.tracker().records().await.len(), 8);
    }

    #[tokio::test]
    async fn test_run_week_grades_completed_games() {
        let dir = tempdir().unwrap();
        let tracker = Arc::new(AccuracyTracker::open(dir.path().join("ledger.json")).await.unwrap());
        let schedule = FixedSchedule(vec![game("KC", "BUF").with_scores(30, 20), game("DAL", "NYG")]);
        let runner = runner(dir.path(), Arc::new(schedule), tracker);

        let report = runner.run_week(2, 2025).await;
        assert!(!report.used_fallback);
        assert_eq!(report.games.len(), 2);
        assert_eq!(report.graded, 1);
        assert!(report.games.iter().all(|g| g.analysis_path.is_none()));

        let prompt = tokio::fs::read_to_string(report.games[0].prompt_path.as_ref().unwrap())
            .await
            .unwrap();
        assert!(prompt.contains("Kansas City Chiefs"));

        // ledger saved at the end of the batch
        let reloaded = AccuracyTracker::open(dir.path().join("ledger.json")).await.unwrap();
        assert_eq!(reloaded.report().await.total_predictions, 2);
    }

    #[tokio::test]
    async fn test_run_week_saves_analysis() {
        let dir = tempdir().unwrap();
        let mut mock = MockTextCompletion::new();
        mock.expect_complete()
            .times(1)
            .returning(|_, _| Ok("Chiefs by a field goal".to_string()));

        let engine = PredictionEngine::new(Arc::new(StaticStats::new()), Arc::new(StaticHistory::new()));
        let analyst = Analyst::new(Some(Arc::new(mock)), engine.clone());
        let store = PromptStore::new(dir.path().join("prompts"), dir.path().join("state.json"));
        let schedule = FixedSchedule(vec![game("KC", "BUF")]);
        let runner = WeeklyRunner::new(
            engine,
            analyst,
            Arc::new(schedule),
            store,
            Arc::new(AccuracyTracker::new()),
            season_start(),
        )
        .with_ai_analysis(true);

        let report = runner.run_week(2, 2025).await;
        let path = report.games[0].analysis_path.as_ref().unwrap();
        assert!(path.ends_with("week2_BUF@KC_2025-09-14.analysis.txt"));
        assert_eq!(tokio::fs::read_to_string(path).await.unwrap(), "Chiefs by a field goal");
    }

    #[tokio::test]
    async fn test_run_week_survives_analyst_failures() {
        let dir = tempdir().unwrap();
        let mut mock = MockTextCompletion::new();
        mock.expect_complete()
            .returning(|_, _| Err(PredictorError::Api("rate limited".to_string())));

        let engine = PredictionEngine::new(Arc::new(StaticStats::new()), Arc::new(StaticHistory::new()));
        let analyst = Analyst::new(Some(Arc::new(mock)), engine.clone());
        let store = PromptStore::new(dir.path().join("prompts"), dir.path().join("state.json"));
        let runner = WeeklyRunner::new(
            engine,
            analyst,
            Arc::new(NoSchedule),
            store,
            Arc::new(AccuracyTracker::new()),
            season_start(),
        )
        .with_ai_analysis(true);

        let report = runner.run_week(3, 2025).await;
        assert_eq!(report.games.len(), 8);
        assert_eq!(report.prompts_written(), 8);
        assert_eq!(report.failures.len(), 8);
        assert!(report.failures[0].1.contains("rate limited"));
        assert!(report.games.iter().all(|g| g.analysis_path.is_none()));
    }

    #[tokio::test]
    async fn test_check_schedule_grades_finished_games() {
        let dir = tempdir().unwrap();
        let tracker = Arc::new(AccuracyTracker::new());
        let pick = GamePrediction {
            predicted_winner: "KC".to_string(),
            confidence: 74.0,
            predicted_score: ProjectedScore { home: 30, away: 23 },
            key_factors: vec![],
            reasoning: String::new(),
        };
        tracker.record(&game("KC", "BUF"), &pick).await;

        let schedule = FixedSchedule(vec![game("KC", "BUF").with_scores(30, 20), game("DAL", "NYG")]);
        let runner = runner(dir.path(), Arc::new(schedule), tracker.clone());

        let check = runner.check_schedule(2, 2025).await;
        assert_eq!(check, ScheduleCheck { games: 2, completed: 1, graded: 1 });
        assert_eq!(tracker.report().await.overall.correct, 1);
    }

    #[tokio::test]
    async fn test_weekly_job_advances_cursor() {
        let dir = tempdir().unwrap();
        let runner = runner(dir.path(), Arc::new(NoSchedule), Arc::new(AccuracyTracker::new()));
        let scheduler = Scheduler::new(runner, &SchedulerConfig::default()).unwrap();

        let start = WeekCursor::new(18, 2025).unwrap();
        let next = scheduler.fire(Job::Weekly, start).await.unwrap();
        assert_eq!(next, WeekCursor { week: 1, season: 2026 });

        let stored = scheduler.runner().store().load_cursor(start).await;
        assert_eq!(stored, next);

        // the daily job leaves the cursor alone
        let same = scheduler.fire(Job::Daily, start).await.unwrap();
        assert_eq!(same, next);
    }

    #[tokio::test]
    async fn test_daily_job_grades_week_already_advanced_past() {
        let dir = tempdir().unwrap();
        let schedule = Arc::new(WeeklySchedule::default());
        schedule.set_week(2, vec![game("KC", "BUF"), game("DAL", "NYG")]);
        schedule.set_week(3, vec![game("GB", "CHI").with_week(3)]);

        let runner = runner(dir.path(), schedule.clone(), Arc::new(AccuracyTracker::new()));
        let scheduler = Scheduler::new(runner, &SchedulerConfig::default()).unwrap();

        let cursor = scheduler.fire(Job::Weekly, WeekCursor::new(2, 2025).unwrap()).await.unwrap();
        assert_eq!(cursor, WeekCursor { week: 3, season: 2025 });

        // week 2 finishes after the cursor moved on
        schedule.set_week(2, vec![game("KC", "BUF").with_scores(30, 20), game("DAL", "NYG")]);
        scheduler.fire(Job::Daily, cursor).await.unwrap();

        let tracker = scheduler.runner().tracker();
        let report = tracker.report().await;
        assert_eq!(report.overall.total, 1);
        assert_eq!(report.pending, 1);
        assert_eq!(tracker.pending_weeks().await, vec![(2, 2025)]);

        schedule.set_week(2, vec![game("KC", "BUF").with_scores(30, 20), game("DAL", "NYG").with_scores(17, 24)]);
        let check = scheduler.runner().grade_pending(cursor).await;
        // KC-BUF is graded again with the same score
        assert_eq!(check, ScheduleCheck { games: 3, completed: 2, graded: 2 });
        assert!(tracker.pending_weeks().await.is_empty());
    }
}
