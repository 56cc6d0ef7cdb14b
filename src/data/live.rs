//! ESPN-backed statistics with an expiring cache
//!
//! Lookups only ever read the cache. The network is touched by [`LiveStats::refresh`],
//! which callers run before a batch of predictions.

use super::stats::StaticStats;
use super::teams::TEAMS;
use super::StatsProvider;
use crate::client::EspnClient;
use crate::error::Result;
use crate::types::TeamStats;
use chrono::{DateTime, Duration, Utc};
use futures_util::future::{join, join_all};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct StatsCache {
    entries: HashMap<String, TeamStats>,
    fetched_at: Option<DateTime<Utc>>,
}

/// Live standings in front of the static table
pub struct LiveStats {
    client: Option<EspnClient>,
    fallback: StaticStats,
    cache: RwLock<StatsCache>,
    ttl: Duration,
}

impl LiveStats {
    pub fn new(client: EspnClient, ttl_mins: i64) -> Self {
        Self::build(Some(client), ttl_mins)
    }

    /// No client: every lookup goes to the static table
    pub fn offline(ttl_mins: i64) -> Self {
        Self::build(None, ttl_mins)
    }

    fn build(client: Option<EspnClient>, ttl_mins: i64) -> Self {
        Self {
            client,
            fallback: StaticStats::new(),
            cache: RwLock::new(StatsCache::default()),
            ttl: Duration::minutes(ttl_mins),
        }
    }

    /// Replace the cache contents, as if fetched at `fetched_at`
    pub fn seed(&self, entries: HashMap<String, TeamStats>, fetched_at: DateTime<Utc>) {
        let mut cache = self.cache.write();
        cache.entries = entries;
        cache.fetched_at = Some(fetched_at);
    }

    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        let cache = self.cache.read();
        match cache.fetched_at {
            Some(at) => !cache.entries.is_empty() && now - at < self.ttl,
            None => false,
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Utc::now())
    }

    pub fn cached_teams(&self) -> usize {
        self.cache.read().entries.len()
    }

    pub fn clear(&self) {
        let mut cache = self.cache.write();
        cache.entries.clear();
        cache.fetched_at = None;
        info!("Live stats cache cleared");
    }

    /// Lookup against the cache as of `now`
    pub fn team_stats_at(&self, team: &str, now: DateTime<Utc>) -> TeamStats {
        let code = team.to_uppercase();
        if self.is_fresh_at(now) {
            if let Some(stats) = self.cache.read().entries.get(&code) {
                debug!("Using live data for {}", code);
                return stats.clone();
            }
        }
        self.fallback.team_stats(&code)
    }

    /// Fetch standings, recent form and key players for every team.
    ///
    /// On failure the previous cache stays in place. Returns the number of
    /// teams now cached.
    pub async fn refresh(&self) -> Result<usize> {
        let Some(client) = &self.client else {
            debug!("Live stats disabled, nothing to refresh");
            return Ok(0);
        };

        let mut standings = match client.standings().await {
            Ok(standings) => standings,
            Err(e) => {
                warn!("Standings fetch failed, keeping cached data: {}", e);
                return Err(e);
            }
        };

        let codes: Vec<&str> = TEAMS
            .iter()
            .map(|t| t.code)
            .filter(|code| standings.contains_key(*code))
            .collect();

        let (forms, rosters) = join(
            join_all(codes.iter().map(|code| client.recent_form(code))),
            join_all(codes.iter().map(|code| client.key_players(code))),
        )
        .await;

        let details = codes
            .iter()
            .zip(forms.into_iter().zip(rosters))
            .map(|(code, (form, players))| (code.to_string(), form, players));
        apply_team_details(&mut standings, details);

        let count = standings.len();
        self.seed(standings, Utc::now());
        info!("Live stats refreshed for {} teams", count);
        Ok(count)
    }

    /// Refresh only when the cache has expired; failures are logged and swallowed
    pub async fn refresh_if_stale(&self) {
        if self.is_fresh() {
            return;
        }
        if let Err(e) = self.refresh().await {
            warn!("Using static stats: {}", e);
        }
    }
}

impl StatsProvider for LiveStats {
    fn team_stats(&self, team: &str) -> TeamStats {
        self.team_stats_at(team, Utc::now())
    }

    fn name(&self) -> &str {
        if self.client.is_some() {
            "espn"
        } else {
            "static"
        }
    }
}

/// Merge per-team form and roster lookups into standings. A failed lookup
/// leaves that field as the standings parse produced it.
pub(crate) fn apply_team_details<I>(standings: &mut HashMap<String, TeamStats>, details: I)
where
    I: IntoIterator<Item = (String, Result<String>, Result<Vec<String>>)>,
{
    for (code, form, players) in details {
        let Some(stats) = standings.get_mut(&code) else { continue };
        match form {
            Ok(form) => stats.last_five_games = form,
            Err(e) => debug!("Recent form unavailable for {}: {}", code, e),
        }
        match players {
            Ok(players) if !players.is_empty() => stats.key_players = players,
            Ok(_) => {}
            Err(e) => debug!("Roster unavailable for {}: {}", code, e),
        }
    }
}
