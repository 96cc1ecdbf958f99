use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use log::info;
use serde::{Deserialize, Deserializer};
use tactics_leaderboard_utils::fs_json_util::read_toml;
use typed_builder::TypedBuilder;
use url::Url;

use crate::{player::PlayerIdentity, ranking::ZeroGamesPolicy};

/// Looked up in the working directory on startup.
pub const CONFIG_PATH: &str = "./leaderboard.toml";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Queue id of ranked TFT games.
pub const RANKED_QUEUE_ID: u32 = 1100;

#[derive(Clone, Debug, TypedBuilder, Deserialize)]
#[serde(default)]
pub struct Config {
    #[builder(default = default_base_url())]
    pub base_url: Url,
    #[builder(default = DEFAULT_USER_AGENT.to_owned())]
    pub user_agent: String,
    #[builder(default = Duration::from_secs(15))]
    #[serde(rename = "request_timeout_secs", deserialize_with = "deserialize_secs")]
    pub request_timeout: Duration,
    /// Slept after every player, whether the fetch succeeded or not.
    #[builder(default = Duration::from_secs(1))]
    #[serde(rename = "request_interval_secs", deserialize_with = "deserialize_secs")]
    pub request_interval: Duration,
    #[builder(default = RANKED_QUEUE_ID)]
    pub ranked_queue_id: u32,
    #[builder(default = PathBuf::from("tft-leaderboard/public/ranking_board_tactics.json"))]
    pub output_path: PathBuf,
    #[builder(default = "Set 16".to_owned())]
    pub season: String,
    #[builder(default)]
    pub zero_games: ZeroGamesPolicy,
    #[builder(default = default_players())]
    pub players: Vec<PlayerIdentity>,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Config {
    /// Reads `path` if it exists, otherwise falls back to the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            info!("Loading configuration from {path:?}.");
            read_toml(path)
        } else {
            info!("{path:?} was not found.  Using the default configuration.");
            Ok(Self::default())
        }
    }
}

fn default_base_url() -> Url {
    Url::parse("https://tactics.tools").expect("the default base URL is valid")
}

fn default_players() -> Vec<PlayerIdentity> {
    [
        ("na", "Shμbbanuffa", "NA1"),
        ("na", "SUPER CHICKEN", "birds"),
        ("na", "Stelle", "def"),
        ("na", "Numinya", "flush"),
        ("na", "agz", "fif"),
    ]
    .into_iter()
    .map(|(region, name, tag)| PlayerIdentity::new(region, name, tag))
    .collect()
}

fn deserialize_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let secs = f64::deserialize(deserializer)?;
    Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
}
