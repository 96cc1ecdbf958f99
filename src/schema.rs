//! Typed view of the `__NEXT_DATA__` payload embedded in a tactics.tools player page.
//!
//! Only the fields read by the aggregation are modeled.  A match entry is kept as raw JSON
//! until it is known to be a ranked game, so that entries of other queues never make the
//! whole page unreadable.

use std::fmt::Display;

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

/// Contents of `props.pageProps`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageProps {
    #[serde(default)]
    pub initial_data: Option<InitialData>,
}

impl PageProps {
    /// All matches listed on the page, newest first as served.
    pub fn matches(&self) -> &[MatchRecord] {
        self.initial_data
            .as_ref()
            .and_then(|data| data.matches.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct InitialData {
    #[serde(default)]
    pub matches: Option<Vec<MatchRecord>>,
}

/// One entry of the match history, of any queue.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct MatchRecord(Value);

impl MatchRecord {
    /// Whether `queueId` is `queue_id`.  Entries without a numeric `queueId` belong to no queue.
    pub fn is_queue(&self, queue_id: u32) -> bool {
        self.0.get("queueId").and_then(Value::as_f64) == Some(f64::from(queue_id))
    }

    /// Reads the fields of a ranked game.
    pub fn ranked(&self) -> Result<RankedMatch, serde_json::Error> {
        RankedMatch::deserialize(&self.0)
    }
}

impl From<Value> for MatchRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedMatch {
    #[serde(default)]
    pub info: Option<MatchInfo>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub date_time: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_rank_after")]
    pub rank_after: Option<RankAfter>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MatchInfo {
    #[serde(default)]
    pub placement: Option<i64>,
}

/// Final standing in an eight-player lobby.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Placement(u8);

impl TryFrom<i64> for Placement {
    type Error = i64;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1..=8 => Ok(Self(value as u8)),
            _ => Err(value),
        }
    }
}

impl Placement {
    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_win(self) -> bool {
        self.0 == 1
    }

    pub fn is_top4(self) -> bool {
        self.0 <= 4
    }
}

impl Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rank right after a match, e.g. `("Diamond II", 75)`.
#[derive(Clone, PartialEq, Debug)]
pub struct RankAfter {
    pub label: String,
    pub lp: i64,
}

impl RankAfter {
    /// The tier word of the label (`"Diamond"` for `"Diamond II"`).
    pub fn tier(&self) -> Option<&str> {
        self.label.split_whitespace().next()
    }
}

/// `rankAfter` is a `[label, lp]` pair.  `null` and `[]` both mean "no rank".
fn deserialize_rank_after<'de, D>(deserializer: D) -> Result<Option<RankAfter>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lp {
        Int(i64),
        Float(f64),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Pair(String, Lp),
        Empty([(); 0]),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None | Some(Raw::Empty(_)) => None,
        Some(Raw::Pair(label, lp)) => {
            let lp = match lp {
                Lp::Int(lp) => lp,
                Lp::Float(lp) if lp.fract() == 0.0 => lp as i64,
                Lp::Float(lp) => {
                    return Err(de::Error::custom(format!("LP must be an integer, got {lp}")))
                }
            };
            Some(RankAfter { label, lp })
        }
    })
}
