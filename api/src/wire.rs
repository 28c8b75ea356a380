//! Raw wire types for the league backend.
//! The backend grew two naming dialects for matches (`team1_id/winner_id` on
//! bracket endpoints, `home_team_id/winner_team_id/loser_team_id` on the v2
//! standings endpoints). Every field of both is optional here; client.rs maps
//! them onto the single `Match` domain type.
use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Ids arrive as strings on some endpoints and bare integers on others.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    /// Canonical string form; empty strings count as absent.
    pub fn normalize(&self) -> Option<String> {
        match self {
            RawId::Text(s) if s.trim().is_empty() => None,
            RawId::Text(s) => Some(s.trim().to_owned()),
            RawId::Number(n) => Some(n.to_string()),
        }
    }

}

/// Counts and round numbers. Some exports write them as strings ("3") or as
/// integral floats (1.0).
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawNumber {
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            RawNumber::Int(n) => u32::try_from(*n).ok(),
            RawNumber::Float(f) if f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX) => {
                Some(*f as u32)
            }
            RawNumber::Float(_) => None,
            RawNumber::Text(s) => s.trim().parse().ok(),
        }
    }
}

pub(crate) fn number(n: Option<RawNumber>) -> Option<u32> {
    n.as_ref().and_then(RawNumber::as_u32)
}

/// List endpoints answer with a bare array or with one of the envelope shapes
/// the v2 API wraps responses in.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Items { items: Vec<T> },
    Data { data: Vec<T> },
    DataItems { data: Items<T> },
}

#[derive(Debug, Deserialize)]
pub struct Items<T> {
    pub items: Vec<T>,
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Bare(v) => v,
            Listing::Items { items } => items,
            Listing::Data { data } => data,
            Listing::DataItems { data } => data.items,
        }
    }
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Listing::Bare(Vec::new())
    }
}

/// Decode list elements one at a time. A record that does not fit `T` is
/// dropped on its own instead of failing the whole response.
pub fn decode_each<T: DeserializeOwned>(listing: Listing<Value>, what: &str) -> Vec<T> {
    listing
        .into_vec()
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("skipping malformed {what} record #{i}: {e}");
                None
            }
        })
        .collect()
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawTeam {
    pub id: Option<RawId>,
    pub name: Option<String>,
    /// Some team listings use `team_name` in place of `name`.
    pub team_name: Option<String>,
    pub division_id: Option<RawId>,
    pub season_id: Option<RawId>,
    /// Some endpoints return the division as a bare name instead of an id.
    pub division: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawMatch {
    pub id: Option<RawId>,

    // bracket dialect
    pub team1_id: Option<RawId>,
    pub team2_id: Option<RawId>,
    pub winner_id: Option<RawId>,
    pub round: Option<RawNumber>,
    pub team1_score: Option<RawNumber>,
    pub team2_score: Option<RawNumber>,

    // v2 / standings dialect
    pub home_team_id: Option<RawId>,
    pub away_team_id: Option<RawId>,
    pub winner_team_id: Option<RawId>,
    pub loser_team_id: Option<RawId>,
    pub home_team_score: Option<RawNumber>,
    pub away_team_score: Option<RawNumber>,

    // result-submission dialect
    pub team_a_score: Option<RawNumber>,
    pub team_b_score: Option<RawNumber>,

    pub season_id: Option<RawId>,
    pub status: Option<String>,
}

/// One row of the server-aggregated `/api/v2/standings` table.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawStandingRow {
    pub team_id: Option<RawId>,
    pub id: Option<RawId>,
    pub team_name: Option<String>,
    pub name: Option<String>,
    pub wins: Option<RawNumber>,
    pub losses: Option<RawNumber>,
    pub draws: Option<RawNumber>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawSeason {
    pub id: Option<RawId>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawDivision {
    pub id: Option<RawId>,
    pub name: Option<String>,
    pub season_id: Option<RawId>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawLeague {
    pub id: Option<RawId>,
    pub name: Option<String>,
    pub season: Option<String>,
    pub status: Option<String>,
}
