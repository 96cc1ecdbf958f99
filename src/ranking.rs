use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::stats::PlayerStats;

/// Where players without any ranked game end up.
///
/// Their average placement is 0.0, so under [`ZeroGamesPolicy::Keep`] they sort above everyone
/// who actually played.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroGamesPolicy {
    /// Sort them by their 0.0 average like everyone else.
    #[default]
    Keep,
    /// Put them after every player with games.
    Last,
    /// Leave them off the leaderboard.
    Exclude,
}

/// A player's position on the leaderboard, starting from 1.
#[derive(Clone, Copy, Debug)]
pub struct LeaderboardEntry<'a> {
    pub rank: usize,
    pub stats: &'a PlayerStats,
}

/// Orders by average placement, lowest first.  Ties keep their collection order.
pub fn rank(stats: Vec<PlayerStats>, policy: ZeroGamesPolicy) -> Vec<PlayerStats> {
    let by_average = |a: &PlayerStats, b: &PlayerStats| a.avg_placement().total_cmp(&b.avg_placement());
    match policy {
        ZeroGamesPolicy::Keep => stats.into_iter().sorted_by(by_average).collect(),
        ZeroGamesPolicy::Last => {
            let (played, idle): (Vec<_>, Vec<_>) =
                stats.into_iter().partition(PlayerStats::has_games);
            played.into_iter().sorted_by(by_average).chain(idle).collect()
        }
        ZeroGamesPolicy::Exclude => stats
            .into_iter()
            .filter(PlayerStats::has_games)
            .sorted_by(by_average)
            .collect(),
    }
}

pub fn entries(ranked: &[PlayerStats]) -> impl Iterator<Item = LeaderboardEntry<'_>> {
    (1..)
        .zip(ranked)
        .map(|(rank, stats)| LeaderboardEntry { rank, stats })
}
