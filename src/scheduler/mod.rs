//! Calendar-driven jobs
//!
//! Two jobs share one loop: the weekly prediction batch (Tuesday morning by
//! default) and a daily schedule check that grades finished games. Times are
//! in a fixed UTC offset, Eastern by default.

pub mod calendar;
pub mod runner;
#[cfg(test)]
mod tests;

pub use calendar::{current_week, fallback_schedule, next_fire, prompt_filename, WeekCursor};
pub use runner::{GameRun, NoSchedule, ScheduleCheck, ScheduleSource, WeekReport, WeeklyRunner};

use crate::config::SchedulerConfig;
use crate::error::{PredictorError, Result};
use chrono::{DateTime, FixedOffset, NaiveTime, Utc, Weekday};
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Weekly,
    Daily,
}

pub struct Scheduler {
    runner: WeeklyRunner,
    offset: FixedOffset,
    weekly_day: Weekday,
    weekly_at: NaiveTime,
    daily_at: NaiveTime,
}

impl Scheduler {
    pub fn new(runner: WeeklyRunner, config: &SchedulerConfig) -> Result<Self> {
        let offset = FixedOffset::east_opt(config.utc_offset_hours * 3600).ok_or_else(|| {
            PredictorError::Internal(format!("Invalid UTC offset: {}", config.utc_offset_hours))
        })?;

        Ok(Self {
            runner,
            offset,
            weekly_day: config.weekday()?,
            weekly_at: config.weekly_at()?,
            daily_at: config.daily_at()?,
        })
    }

    pub fn runner(&self) -> &WeeklyRunner {
        &self.runner
    }

    /// The job that fires next after `now`, and when. The weekly job wins
    /// when both land on the same instant.
    pub fn next_job(&self, now: DateTime<Utc>) -> (Job, DateTime<Utc>) {
        let weekly = next_fire(now, self.offset, Some(self.weekly_day), self.weekly_at);
        let daily = next_fire(now, self.offset, None, self.daily_at);
        if weekly <= daily {
            (Job::Weekly, weekly)
        } else {
            (Job::Daily, daily)
        }
    }

    /// Run one job against the stored cursor
    pub async fn fire(&self, job: Job, default_cursor: WeekCursor) -> Result<WeekCursor> {
        let store = self.runner.store();
        let mut cursor = store.load_cursor(default_cursor).await;

        match job {
            Job::Weekly => {
                let report = self.runner.run_week(cursor.week, cursor.season).await;
                info!(
                    "Weekly job done: {} predictions for week {}",
                    report.games.len(),
                    report.week
                );
                cursor.advance();
                store.save_cursor(&cursor).await?;
                info!("Advanced to week {} of {}", cursor.week, cursor.season);
            }
            Job::Daily => {
                let check = self.runner.grade_pending(cursor).await;
                info!("Daily check graded {} games", check.graded);
            }
        }
        Ok(cursor)
    }

    /// Loop forever, sleeping until each fire time
    pub async fn run(&self, default_cursor: WeekCursor) -> Result<()> {
        info!(
            "Scheduler started: weekly {:?} {}, daily {} (UTC{})",
            self.weekly_day, self.weekly_at, self.daily_at, self.offset
        );

        loop {
            let now = Utc::now();
            let (job, at) = self.next_job(now);
            let wait = (at - now).to_std().unwrap_or(Duration::ZERO);
            info!("Next {:?} job at {} (in {}m)", job, at.with_timezone(&self.offset), wait.as_secs() / 60);

            tokio::time::sleep(wait).await;

            if let Err(e) = self.fire(job, default_cursor).await {
                error!("{:?} job failed: {}", job, e);
            }
        }
    }
}
