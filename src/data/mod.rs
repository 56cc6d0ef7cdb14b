//! Data access
//!
//! Team statistics and head-to-head history sit behind two small traits so the
//! prediction engine can run against the static tables, the ESPN-backed cache
//! or a test double without knowing which.

pub mod history;
pub mod live;
pub mod stats;
pub mod teams;


pub use history::{
    game_log, head_to_head_record, GameHistoryEntry, HeadToHeadRecord, StaticHistory,
    DEFAULT_SERIES_POINTS,
};
pub use live::LiveStats;
pub use stats::{fallback_stats, season_table, StaticStats};
pub use teams::{
    display_name, normalize_code, same_division, team_by_code, team_by_espn_id,
    teams_by_conference, teams_by_division, Conference, Division, NflTeam, TEAMS,
};

use crate::types::TeamStats;
use std::sync::Arc;

/// Source of per-team season statistics. Never fails: unknown teams get
/// [`fallback_stats`].
pub trait StatsProvider: Send + Sync {
    fn team_stats(&self, team: &str) -> TeamStats;

    /// Short label for logs
    fn name(&self) -> &str;
}

/// Source of head-to-head records. Argument order only decides which side is
/// `team1` in the result.
pub trait HistoryProvider: Send + Sync {
    fn head_to_head(&self, team_a: &str, team_b: &str) -> HeadToHeadRecord;
}

impl<T: StatsProvider + ?Sized> StatsProvider for Arc<T> {
    fn team_stats(&self, team: &str) -> TeamStats {
        (**self).team_stats(team)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: HistoryProvider + ?Sized> HistoryProvider for Arc<T> {
    fn head_to_head(&self, team_a: &str, team_b: &str) -> HeadToHeadRecord {
        (**self).head_to_head(team_a, team_b)
    }
}
