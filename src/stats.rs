use chrono::{Local, TimeZone};
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};

use crate::{
    player::PlayerIdentity,
    schema::{PageProps, Placement, RankedMatch},
};

pub const NO_RANKED_MATCHES: &str = "No Ranked Matches";
pub const UNRANKED: &str = "Unranked";

const LAST_PLAYED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Summary of one player's ranked games.
///
/// The field names double as the keys of the output JSON, which is read by the web frontend.
#[derive(Clone, PartialEq, Debug, Getters, CopyGetters, Serialize, Deserialize)]
pub struct PlayerStats {
    #[getset(get = "pub")]
    summoner: String,
    #[getset(get = "pub")]
    region: String,
    #[getset(get = "pub")]
    url: String,
    /// Never filled in; kept because the frontend schema has it.
    #[getset(get = "pub")]
    rank: String,
    #[getset(get = "pub")]
    tier: String,
    #[getset(get_copy = "pub")]
    lp: i64,
    #[getset(get_copy = "pub")]
    win_rate: f64,
    #[getset(get_copy = "pub")]
    top4_rate: f64,
    #[getset(get_copy = "pub")]
    total_games: usize,
    #[getset(get_copy = "pub")]
    wins: usize,
    #[getset(get_copy = "pub")]
    top4s: usize,
    /// 0.0 when there are no games.
    #[getset(get_copy = "pub")]
    avg_placement: f64,
    #[getset(get = "pub")]
    last_played: String,
    #[getset(get = "pub")]
    current_rank: String,
}

impl PlayerStats {
    fn no_ranked_matches(player: &PlayerIdentity, url: &str) -> Self {
        Self {
            summoner: player.to_string(),
            region: player.region.to_string().to_uppercase(),
            url: url.to_owned(),
            rank: String::new(),
            tier: NO_RANKED_MATCHES.to_owned(),
            lp: 0,
            win_rate: 0.0,
            top4_rate: 0.0,
            total_games: 0,
            wins: 0,
            top4s: 0,
            avg_placement: 0.0,
            last_played: String::new(),
            current_rank: UNRANKED.to_owned(),
        }
    }

    pub fn has_games(&self) -> bool {
        self.total_games > 0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("ranked match #{index} has an unexpected shape: {source}")]
    MalformedMatch {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("ranked match #{0} has no placement")]
    MissingPlacement(usize),
    #[error("ranked match #{index} has placement {value}, expected 1 to 8")]
    PlacementOutOfRange { index: usize, value: i64 },
    #[error("the latest ranked match has an empty rank label")]
    EmptyRankLabel,
    #[error("timestamp {0} is not a representable date-time")]
    InvalidTimestamp(i64),
}

/// Computes the statistics of `player` from the matches of its profile page.
///
/// Only matches of `ranked_queue_id` count, and only those are required to be well-formed.
/// The first of them is trusted to be the most recent one and supplies the current rank and
/// the last-played time.
pub fn aggregate(
    page: &PageProps,
    player: &PlayerIdentity,
    url: &str,
    ranked_queue_id: u32,
) -> Result<PlayerStats, AggregateError> {
    let all_matches = page.matches();
    let ranked = all_matches
        .iter()
        .filter(|m| m.is_queue(ranked_queue_id))
        .enumerate()
        .map(|(index, m)| {
            m.ranked()
                .map_err(|source| AggregateError::MalformedMatch { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let Some(latest) = ranked.first() else {
        println!("No ranked matches found for {player}");
        return Ok(PlayerStats::no_ranked_matches(player, url));
    };
    println!(
        "  → Found {} total matches, {} ranked games",
        all_matches.len(),
        ranked.len()
    );

    let placements = ranked
        .iter()
        .enumerate()
        .map(|(index, m)| placement(index, m))
        .collect::<Result<Vec<_>, _>>()?;
    let total_games = placements.len();
    let wins = placements.iter().filter(|p| p.is_win()).count();
    let top4s = placements.iter().filter(|p| p.is_top4()).count();
    let placement_sum: u32 = placements.iter().map(|p| u32::from(p.get())).sum();
    let games = total_games as f64;

    let last_played = match latest.date_time {
        Some(ms) if ms != 0 => format_local(ms)?,
        _ => String::new(),
    };
    let (tier, lp, current_rank) = match &latest.rank_after {
        Some(rank) => {
            let tier = rank.tier().ok_or(AggregateError::EmptyRankLabel)?;
            (
                tier.to_owned(),
                rank.lp,
                format!("{} {} LP", rank.label, rank.lp),
            )
        }
        None => (UNRANKED.to_owned(), 0, UNRANKED.to_owned()),
    };

    Ok(PlayerStats {
        summoner: player.to_string(),
        region: player.region.to_string().to_uppercase(),
        url: url.to_owned(),
        rank: String::new(),
        tier,
        lp,
        win_rate: 100.0 * wins as f64 / games,
        top4_rate: 100.0 * top4s as f64 / games,
        total_games,
        wins,
        top4s,
        avg_placement: f64::from(placement_sum) / games,
        last_played,
        current_rank,
    })
}

fn placement(index: usize, record: &RankedMatch) -> Result<Placement, AggregateError> {
    let value = record
        .info
        .as_ref()
        .and_then(|info| info.placement)
        .ok_or(AggregateError::MissingPlacement(index))?;
    Placement::try_from(value).map_err(|value| AggregateError::PlacementOutOfRange { index, value })
}

fn format_local(epoch_millis: i64) -> Result<String, AggregateError> {
    let time = Local
        .timestamp_millis_opt(epoch_millis)
        .earliest()
        .ok_or(AggregateError::InvalidTimestamp(epoch_millis))?;
    Ok(time.format(LAST_PLAYED_FORMAT).to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use serde_json::{json, Value};
    use tactics_leaderboard_utils::regex;

    use super::{aggregate, AggregateError, PlayerStats, NO_RANKED_MATCHES, UNRANKED};
    use crate::{player::PlayerIdentity, schema::PageProps};

    const URL: &str = "https://tactics.tools/player/na/Stelle/def";

    pub(crate) fn ranked_match(placement: i64, date_time: i64, rank_after: Value) -> Value {
        json!({
            "queueId": 1100,
            "info": { "placement": placement },
            "dateTime": date_time,
            "rankAfter": rank_after,
        })
    }

    pub(crate) fn page(matches: Vec<Value>) -> PageProps {
        serde_json::from_value(json!({ "initialData": { "matches": matches } })).unwrap()
    }

    fn player() -> PlayerIdentity {
        PlayerIdentity::new("na", "Stelle", "def")
    }

    fn run(matches: Vec<Value>) -> Result<PlayerStats, AggregateError> {
        aggregate(&page(matches), &player(), URL, 1100)
    }

    #[test]
    fn ranked_placements_only() {
        let stats = run(vec![
            ranked_match(1, 1_700_000_000_000, json!(["Diamond II", 75])),
            ranked_match(3, 1_699_990_000_000, json!(["Diamond II", 40])),
            json!({ "queueId": 1090, "info": { "placement": 8 }, "dateTime": 1_699_980_000_000i64 }),
            ranked_match(5, 1_699_970_000_000, json!(["Diamond III", 90])),
        ])
        .unwrap();
        assert_eq!(stats.total_games(), 3);
        assert_eq!(stats.wins(), 1);
        assert_eq!(stats.top4s(), 2);
        assert!((stats.win_rate() - 33.33).abs() < 0.01);
        assert!((stats.top4_rate() - 66.67).abs() < 0.01);
        assert_eq!(stats.avg_placement(), 3.0);
        assert_eq!(stats.summoner(), "Stelle#def");
        assert_eq!(stats.region(), "NA");
        assert_eq!(stats.url(), URL);
        assert_eq!(stats.rank(), "");
        assert_eq!(stats.tier(), "Diamond");
        assert_eq!(stats.lp(), 75);
        assert_eq!(stats.current_rank(), "Diamond II 75 LP");
        assert!(regex!(r"^\d{4}-\d\d-\d\d \d\d:\d\d:\d\d$").is_match(stats.last_played()));
    }

    #[test]
    fn counts_and_rates_are_consistent() {
        let placements = [2, 8, 1, 4, 4, 7, 1, 6, 3, 5];
        let stats = run(placements
            .iter()
            .map(|&p| ranked_match(p, 1, json!(null)))
            .collect())
        .unwrap();
        let n = placements.len();
        assert_eq!(stats.total_games(), n);
        assert!(stats.wins() <= stats.top4s() && stats.top4s() <= n);
        assert_eq!(stats.wins(), 2);
        assert_eq!(stats.top4s(), 6);
        assert_eq!(stats.win_rate(), 100.0 * 2.0 / n as f64);
        assert_eq!(stats.top4_rate(), 100.0 * 6.0 / n as f64);
        assert!((1.0..=8.0).contains(&stats.avg_placement()));
        assert_eq!(stats.avg_placement(), 4.1);
    }

    #[test]
    fn no_ranked_matches() {
        let stats = run(vec![
            json!({ "queueId": 1090, "info": { "placement": 1 } }),
            json!({ "queueId": 1160 }),
        ])
        .unwrap();
        assert_eq!(stats.total_games(), 0);
        assert_eq!(stats.tier(), NO_RANKED_MATCHES);
        assert_eq!(stats.current_rank(), UNRANKED);
        assert_eq!(stats.win_rate(), 0.0);
        assert_eq!(stats.top4_rate(), 0.0);
        assert_eq!(stats.avg_placement(), 0.0);
        assert_eq!(stats.lp(), 0);
        assert_eq!(stats.last_played(), "");
        assert!(!stats.has_games());

        let stats = aggregate(&PageProps::default(), &player(), URL, 1100).unwrap();
        assert_eq!(stats.total_games(), 0);
    }

    #[test]
    fn unranked_latest_match() {
        let stats = run(vec![
            ranked_match(2, 0, json!(null)),
            ranked_match(6, 1_700_000_000_000, json!(["Gold I", 10])),
        ])
        .unwrap();
        assert_eq!(stats.tier(), UNRANKED);
        assert_eq!(stats.lp(), 0);
        assert_eq!(stats.current_rank(), UNRANKED);
        assert_eq!(stats.last_played(), "");
    }

    #[test]
    fn odd_entries_of_other_queues_are_ignored() {
        let stats = run(vec![
            ranked_match(2, 1_700_000_000_000, json!(["Gold II", 10])),
            json!({ "queueId": 1160, "info": { "placement": 1 }, "rankAfter": ["Gold II", 10, "x"] }),
            json!({ "queueId": 1090, "info": { "placement": 2.5 } }),
            json!({ "queueId": 1090, "rankAfter": ["Unranked", null] }),
            json!("garbage"),
        ])
        .unwrap();
        assert_eq!(stats.total_games(), 1);
        assert_eq!(stats.top4s(), 1);
        assert_eq!(stats.current_rank(), "Gold II 10 LP");
    }

    #[test]
    fn malformed_ranked_matches() {
        assert!(matches!(
            run(vec![
                ranked_match(1, 1, json!(null)),
                json!({ "queueId": 1100, "info": { "placement": 2.5 } }),
            ]),
            Err(AggregateError::MalformedMatch { index: 1, .. })
        ));
        assert!(matches!(
            run(vec![json!({ "queueId": 1100, "info": { "placement": 3 }, "rankAfter": ["Gold II", 10, "x"] })]),
            Err(AggregateError::MalformedMatch { index: 0, .. })
        ));
        assert!(matches!(
            run(vec![json!({ "queueId": 1100, "dateTime": 1 })]),
            Err(AggregateError::MissingPlacement(0))
        ));
        assert!(matches!(
            run(vec![ranked_match(1, 1, json!(null)), ranked_match(9, 1, json!(null))]),
            Err(AggregateError::PlacementOutOfRange { index: 1, value: 9 })
        ));
        assert!(matches!(
            run(vec![ranked_match(1, 1, json!(["", 3]))]),
            Err(AggregateError::EmptyRankLabel)
        ));
        assert!(matches!(
            run(vec![ranked_match(1, i64::MAX, json!(null))]),
            Err(AggregateError::InvalidTimestamp(i64::MAX))
        ));
    }

    #[test]
    fn json_round_trip() {
        let stats = aggregate(
            &page(vec![ranked_match(4, 1_700_000_000_000, json!(["Master I", 120]))]),
            &PlayerIdentity::new("na", "Shμbbanuffa", "NA1"),
            "https://tactics.tools/player/na/Sh%CE%BCbbanuffa/NA1",
            1100,
        )
        .unwrap();
        let path = std::env::temp_dir().join("tactics-leaderboard-stats-round-trip.json");
        tactics_leaderboard_utils::fs_json_util::write_json_pretty(&path, &vec![stats.clone()])
            .unwrap();
        let text = fs_err::read_to_string(&path).unwrap();
        assert!(text.contains("\"summoner\": \"Shμbbanuffa#NA1\""));
        let read: Vec<PlayerStats> = serde_json::from_str(&text).unwrap();
        assert_eq!(read, vec![stats]);
        fs_err::remove_file(&path).unwrap();
    }
}
