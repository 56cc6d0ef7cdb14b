//! Weekly prediction batch and the daily schedule check

use crate::client::EspnClient;
use crate::data::LiveStats;
use crate::model::{Analyst, AnalystOutcome};
use crate::monitor::AccuracyTracker;
use crate::predict::PredictionEngine;
use crate::prompts::PromptKind;
use crate::storage::PromptStore;
use crate::types::{Game, GamePrediction};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::calendar::{fallback_schedule, WeekCursor};

/// Where a week's games come from
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    /// Games for the week; empty when the source has nothing or failed
    async fn weekly_games(&self, week: u32, season: i32) -> Vec<Game>;
}

#[async_trait]
impl ScheduleSource for EspnClient {
    async fn weekly_games(&self, week: u32, season: i32) -> Vec<Game> {
        match self.weekly_schedule(week, season).await {
            Ok(games) => games,
            Err(e) => {
                warn!("ESPN schedule for week {} unavailable: {}", week, e);
                Vec::new()
            }
        }
    }
}

/// Source with no games, used when ESPN is disabled
pub struct NoSchedule;

#[async_trait]
impl ScheduleSource for NoSchedule {
    async fn weekly_games(&self, _week: u32, _season: i32) -> Vec<Game> {
        Vec::new()
    }
}

#[derive(Debug, Clone)]
pub struct GameRun {
    pub game: Game,
    pub prediction: GamePrediction,
    pub prompt_path: Option<PathBuf>,
    pub analysis_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct WeekReport {
    pub week: u32,
    pub season: i32,
    pub used_fallback: bool,
    pub games: Vec<GameRun>,
    /// (matchup, error) for every step that failed
    pub failures: Vec<(String, String)>,
    pub graded: usize,
}

impl WeekReport {
    pub fn prompts_written(&self) -> usize {
        self.games.iter().filter(|g| g.prompt_path.is_some()).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleCheck {
    pub games: usize,
    pub completed: usize,
    pub graded: usize,
}

pub struct WeeklyRunner {
    engine: PredictionEngine,
    analyst: Analyst,
    schedule: Arc<dyn ScheduleSource>,
    store: PromptStore,
    tracker: Arc<AccuracyTracker>,
    season_start: NaiveDate,
    ai_analysis: bool,
    /// Refreshed before each batch when set
    live: Option<Arc<LiveStats>>,
}

impl WeeklyRunner {
    pub fn new(
        engine: PredictionEngine,
        analyst: Analyst,
        schedule: Arc<dyn ScheduleSource>,
        store: PromptStore,
        tracker: Arc<AccuracyTracker>,
        season_start: NaiveDate,
    ) -> Self {
        Self {
            engine,
            analyst,
            schedule,
            store,
            tracker,
            season_start,
            ai_analysis: false,
            live: None,
        }
    }

    pub fn with_ai_analysis(mut self, enabled: bool) -> Self {
        self.ai_analysis = enabled;
        self
    }

    pub fn with_live_stats(mut self, live: Arc<LiveStats>) -> Self {
        self.live = Some(live);
        self
    }

    pub fn store(&self) -> &PromptStore {
        &self.store
    }

    pub fn tracker(&self) -> &Arc<AccuracyTracker> {
        &self.tracker
    }

    /// The week's games, from the schedule source or the fallback slate
    pub async fn games_for_week(&self, week: u32, season: i32) -> (Vec<Game>, bool) {
        let games = self.schedule.weekly_games(week, season).await;
        if games.is_empty() {
            info!("No schedule for week {}, using fallback matchups", week);
            (fallback_schedule(week, season, self.season_start), true)
        } else {
            (games, false)
        }
    }

    pub async fn run_week(&self, week: u32, season: i32) -> WeekReport {
        info!("Generating predictions for week {} of {}", week, season);
        if let Some(live) = &self.live {
            live.refresh_if_stale().await;
        }
        let (games, used_fallback) = self.games_for_week(week, season).await;

        let mut report = WeekReport {
            week,
            season,
            used_fallback,
            ..Default::default()
        };

        for game in games {
            let prediction = self.engine.predict_game(&game);
            debug!(
                "{}: {} ({:.0}%)",
                game.matchup(),
                prediction.predicted_winner,
                prediction.confidence
            );

            let prompt = self.analyst.prompt(&game, PromptKind::Comprehensive);
            let prompt_path = match self.store.save_prompt(&game, &prompt).await {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("Failed to write prompt for {}: {}", game.matchup(), e);
                    report.failures.push((game.matchup(), e.to_string()));
                    None
                }
            };

            let analysis_path = if self.ai_analysis {
                self.analyze(&game, &prompt, &mut report).await
            } else {
                None
            };

            self.tracker.record(&game, &prediction).await;
            if self.tracker.grade(&game).await.is_some() {
                report.graded += 1;
            }

            report.games.push(GameRun {
                game,
                prediction,
                prompt_path,
                analysis_path,
            });
        }

        if let Err(e) = self.tracker.save().await {
            warn!("Failed to save accuracy ledger: {}", e);
            report.failures.push(("ledger".to_string(), e.to_string()));
        }

        info!(
            "Week {}: {} games, {} prompts written, {} failures",
            week,
            report.games.len(),
            report.prompts_written(),
            report.failures.len()
        );
        report
    }

    async fn analyze(&self, game: &Game, prompt: &str, report: &mut WeekReport) -> Option<PathBuf> {
        match self.analyst.analyze_prompt(prompt).await {
            AnalystOutcome::Text(text) => match self.store.save_analysis(game, &text).await {
                Ok(path) => Some(path),
                Err(e) => {
                    report.failures.push((game.matchup(), e.to_string()));
                    None
                }
            },
            AnalystOutcome::NotConfigured => None,
            AnalystOutcome::Unavailable(reason) => {
                report.failures.push((game.matchup(), reason));
                None
            }
        }
    }

    /// Daily job: re-read the schedule for the cursor week and for every week
    /// that still has ungraded predictions, grading finished games
    pub async fn grade_pending(&self, cursor: WeekCursor) -> ScheduleCheck {
        let mut weeks = self.tracker.pending_weeks().await;
        if !weeks.contains(&(cursor.week, cursor.season)) {
            weeks.push((cursor.week, cursor.season));
        }

        let mut total = ScheduleCheck::default();
        for (week, season) in weeks {
            let check = self.check_schedule(week, season).await;
            total.games += check.games;
            total.completed += check.completed;
            total.graded += check.graded;
        }
        total
    }

    /// Look at one week's schedule and grade finished games
    pub async fn check_schedule(&self, week: u32, season: i32) -> ScheduleCheck {
        let games = self.schedule.weekly_games(week, season).await;
        let mut check = ScheduleCheck {
            games: games.len(),
            ..Default::default()
        };

        for game in games.iter().filter(|g| g.is_completed()) {
            check.completed += 1;
            if self.tracker.grade(game).await.is_some() {
                check.graded += 1;
            }
        }

        if check.graded > 0 {
            if let Err(e) = self.tracker.save().await {
                warn!("Failed to save accuracy ledger: {}", e);
            }
        }
        info!(
            "Schedule check week {}: {} games, {} completed, {} graded",
            week, check.games, check.completed, check.graded
        );
        check
    }
}
