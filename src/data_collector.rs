use log::{info, warn};
use tokio::time::sleep;

use crate::{
    api::{FetchError, ProfileSource},
    config::Config,
    extract::{extract_page_props, ExtractError},
    player::PlayerIdentity,
    ranking::rank,
    report,
    stats::{aggregate, AggregateError, PlayerStats},
};

/// Why a player is missing from the leaderboard.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

/// Fetches, extracts and aggregates a single player.
pub async fn scrape_player<S: ProfileSource>(
    source: &S,
    player: &PlayerIdentity,
    ranked_queue_id: u32,
) -> Result<PlayerStats, ScrapeError> {
    let url = source.profile_url(player);
    println!("Scraping: {url}");
    let html = source.fetch_profile(player).await?;
    let page = extract_page_props(&html)?;
    let stats = aggregate(&page, player, &url, ranked_queue_id)?;
    Ok(stats)
}

/// Players scraped in one run, ranked.
#[derive(Debug)]
pub struct RankingBoard {
    /// How many players were scraped successfully, including those the ranking left out.
    pub scraped: usize,
    pub ranked: Vec<PlayerStats>,
}

/// Scrapes every configured player in order and ranks the results.
///
/// Players that fail are reported and skipped.
pub async fn create_ranking_board<S: ProfileSource>(source: &S, config: &Config) -> RankingBoard {
    let mut all_stats = vec![];
    for player in &config.players {
        match scrape_player(source, player, config.ranked_queue_id).await {
            Ok(stats) => {
                println!("✓ Successfully scraped {}", stats.summoner());
                all_stats.push(stats);
            }
            Err(e) => {
                match &e {
                    ScrapeError::Fetch(e) => println!("✗ Error scraping {player}: {e}"),
                    ScrapeError::Extract(e) => println!("✗ Could not extract data for {player}: {e}"),
                    ScrapeError::Aggregate(e) => println!("✗ Error parsing data for {player}: {e}"),
                }
                warn!("Skipping {player}: {:?}", anyhow::Error::from(e));
            }
        }
        sleep(config.request_interval).await;
    }
    info!("Scraped {} of {} players.", all_stats.len(), config.players.len());
    RankingBoard {
        scraped: all_stats.len(),
        ranked: rank(all_stats, config.zero_games),
    }
}

/// Outcome of a whole run.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RunOutcome {
    Saved { players: usize },
    NothingScraped,
    /// Every scraped player was left out by `zero_games = "exclude"`.
    NothingRanked { scraped: usize },
}

/// Scrapes, prints the table and saves the file.
///
/// When the board is empty, nothing is written, so the previous file is left as is.
pub async fn run<S: ProfileSource>(source: &S, config: &Config) -> anyhow::Result<RunOutcome> {
    println!("Starting tactics.tools scraper...");
    println!("Tracking {} summoners", config.players.len());
    println!();

    let RankingBoard { scraped, ranked } = create_ranking_board(source, config).await;
    if scraped == 0 {
        println!("No stats were successfully scraped.");
        return Ok(RunOutcome::NothingScraped);
    }
    if ranked.is_empty() {
        println!("No ranked games among the {scraped} scraped summoners; nothing to show.");
        return Ok(RunOutcome::NothingRanked { scraped });
    }
    print!("{}", report::render_table(&ranked, &config.season));
    report::save(&ranked, &config.output_path)?;
    Ok(RunOutcome::Saved {
        players: ranked.len(),
    })
}
