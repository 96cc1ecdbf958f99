use std::{fmt::Write, path::Path};

use anyhow::Context;
use tactics_leaderboard_utils::fs_json_util::write_json_pretty;

use crate::{
    ranking::{entries, LeaderboardEntry},
    stats::PlayerStats,
};

const WIDTH: usize = 130;
const SUMMONER_CHARS: usize = 24;

pub fn render_table(ranked: &[PlayerStats], season: &str) -> String {
    let mut out = String::new();
    // Writing into a `String` never fails.
    let _ = write_table(&mut out, ranked, season);
    out
}

fn write_table(out: &mut String, ranked: &[PlayerStats], season: &str) -> std::fmt::Result {
    let heavy = "=".repeat(WIDTH);
    writeln!(out)?;
    writeln!(out, "{heavy}")?;
    writeln!(
        out,
        "{:^WIDTH$}",
        "TFT RANKING BOARD (tactics.tools - All Ranked Games)"
    )?;
    writeln!(out, "{heavy}")?;
    writeln!(
        out,
        "{:<4} {:<25} {:<20} {:<7} {:<6} {:<7} {:<8} {:<8} {:<6}",
        "#", "Summoner", "Current Rank", "Games", "Wins", "Top 4", "Win %", "Top4 %", "Avg"
    )?;
    writeln!(out, "{}", "-".repeat(WIDTH))?;
    for entry in entries(ranked) {
        writeln!(out, "{}", row(entry))?;
    }
    writeln!(out, "{heavy}")?;
    writeln!(out)?;
    writeln!(
        out,
        "📊 Stats based on ALL ranked games ({season}) from tactics.tools"
    )?;
    Ok(())
}

fn row(LeaderboardEntry { rank, stats }: LeaderboardEntry) -> String {
    let summoner: String = stats.summoner().chars().take(SUMMONER_CHARS).collect();
    format!(
        "{:<4} {:<25} {:<20} {:<7} {:<6} {:<7} {:>5.1}%   {:>5.1}%   {:.2}",
        rank,
        summoner,
        stats.current_rank(),
        stats.total_games(),
        stats.wins(),
        stats.top4s(),
        stats.win_rate(),
        stats.top4_rate(),
        stats.avg_placement(),
    )
}

/// Overwrites `path` with the ranked list.
pub fn save(ranked: &[PlayerStats], path: &Path) -> anyhow::Result<()> {
    write_json_pretty(path, &ranked)
        .with_context(|| format!("While saving the ranking board to {path:?}"))?;
    println!();
    println!("✓ Ranking board saved to {}", path.display());
    Ok(())
}
