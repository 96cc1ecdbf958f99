use anyhow::Context;
use log::info;
use tactics_leaderboard::api::TacticsClient;
use tactics_leaderboard::config::{Config, CONFIG_PATH};
use tactics_leaderboard::data_collector::{run, RunOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let config = Config::load_or_default(CONFIG_PATH)?;
    let client = TacticsClient::new(&config).context("Failed to build the HTTP client")?;
    match run(&client, &config).await? {
        RunOutcome::Saved { players } => info!("Saved {players} players."),
        RunOutcome::NothingScraped => info!("Nothing was saved."),
        RunOutcome::NothingRanked { scraped } => {
            info!("Nothing was saved; all {scraped} scraped players were excluded.")
        }
    }
    Ok(())
}
