//! Season calendar: week cursor, fallback schedule and fire times

use crate::error::{PredictorError, Result};
use crate::types::Game;
use chrono::{
    DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday,
};
use serde::{Deserialize, Serialize};

pub const REGULAR_SEASON_WEEKS: u32 = 18;
/// Regular season plus four playoff rounds
pub const MAX_WEEK: u32 = 22;

/// Games generated per week when the live schedule is unavailable
pub const FALLBACK_GAMES_PER_WEEK: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Thursday,
    Sunday,
    Monday,
}

/// (home, away, slot)
const FALLBACK_MATCHUPS: [(&str, &str, Slot); 16] = [
    ("KC", "BUF", Slot::Thursday),
    ("DAL", "NYG", Slot::Sunday),
    ("GB", "CHI", Slot::Sunday),
    ("SF", "LAR", Slot::Sunday),
    ("MIA", "NYJ", Slot::Sunday),
    ("PIT", "BAL", Slot::Sunday),
    ("MIN", "DET", Slot::Sunday),
    ("TEN", "IND", Slot::Sunday),
    ("JAX", "HOU", Slot::Sunday),
    ("DEN", "LV", Slot::Sunday),
    ("LAC", "ARI", Slot::Sunday),
    ("SEA", "TB", Slot::Sunday),
    ("ATL", "CAR", Slot::Sunday),
    ("PHI", "WAS", Slot::Sunday),
    ("NO", "CLE", Slot::Monday),
    ("NE", "CIN", Slot::Monday),
];

/// The scheduler's notion of "now" in the season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekCursor {
    pub week: u32,
    pub season: i32,
}

impl WeekCursor {
    pub fn new(week: u32, season: i32) -> Result<Self> {
        let mut cursor = Self { week: 1, season };
        cursor.set_week(week)?;
        Ok(cursor)
    }

    /// Cursor for `today`, derived from the season start
    pub fn for_date(today: NaiveDate, season: i32, season_start: NaiveDate) -> Self {
        Self {
            week: current_week(today, season_start),
            season,
        }
    }

    /// Next week; after the regular season wraps to week 1 of the next season
    pub fn advance(&mut self) {
        if self.week >= REGULAR_SEASON_WEEKS {
            self.week = 1;
            self.season += 1;
        } else {
            self.week += 1;
        }
    }

    pub fn set_week(&mut self, week: u32) -> Result<()> {
        if !(1..=MAX_WEEK).contains(&week) {
            return Err(PredictorError::InvalidWeek(week));
        }
        self.week = week;
        Ok(())
    }

    pub fn is_playoffs(&self) -> bool {
        self.week > REGULAR_SEASON_WEEKS
    }
}

/// Week number for `today`: one week per seven days since kickoff, clamped
/// to 1..=22
pub fn current_week(today: NaiveDate, season_start: NaiveDate) -> u32 {
    let days = (today - season_start).num_days();
    let week = days.div_euclid(7) + 1;
    week.clamp(1, i64::from(MAX_WEEK)) as u32
}

fn kickoff(week_start: NaiveDate, slot: Slot) -> NaiveDateTime {
    let (offset, hour, minute) = match slot {
        Slot::Thursday => (4, 20, 15),
        Slot::Sunday => (7, 13, 0),
        Slot::Monday => (8, 20, 15),
    };
    let day = week_start
        .checked_add_days(Days::new(offset))
        .unwrap_or(week_start);
    day.and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default())
}

/// Stand-in slate: eight of sixteen fixed matchups, rotated two places per week
pub fn fallback_schedule(week: u32, season: i32, season_start: NaiveDate) -> Vec<Game> {
    let week = week.max(1);
    let start = ((week - 1) as usize * 2) % FALLBACK_MATCHUPS.len();
    let week_start = season_start
        .checked_add_days(Days::new(u64::from(week - 1) * 7))
        .unwrap_or(season_start);

    FALLBACK_MATCHUPS
        .iter()
        .cycle()
        .skip(start)
        .take(FALLBACK_GAMES_PER_WEEK)
        .map(|(home, away, slot)| {
            Game::new(*home, *away, kickoff(week_start, *slot))
                .with_week(week)
                .with_season(season)
                .with_playoffs(week > REGULAR_SEASON_WEEKS)
        })
        .collect()
}

/// `week<N>_<AWAY>@<HOME>_<YYYY-MM-DD>.txt`
pub fn prompt_filename(game: &Game) -> String {
    format!(
        "week{}_{}@{}_{}.txt",
        game.week.unwrap_or(1),
        game.away_team,
        game.home_team,
        game.date.format("%Y-%m-%d")
    )
}

/// Next instant after `now` at `at` local time in `offset`, optionally
/// restricted to `weekday`
pub fn next_fire(
    now: DateTime<Utc>,
    offset: FixedOffset,
    weekday: Option<Weekday>,
    at: NaiveTime,
) -> DateTime<Utc> {
    let local_today = now.with_timezone(&offset).date_naive();

    // a week and a day always contains a match
    for ahead in 0..=8u64 {
        let Some(day) = local_today.checked_add_days(Days::new(ahead)) else {
            break;
        };
        if weekday.is_some_and(|w| day.weekday() != w) {
            continue;
        }
        let Some(candidate) = offset.from_local_datetime(&day.and_time(at)).single() else {
            continue;
        };
        let candidate = candidate.with_timezone(&Utc);
        if candidate > now {
            return candidate;
        }
    }

    now + chrono::Duration::days(1)
}
