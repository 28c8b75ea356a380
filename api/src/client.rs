use crate::standings::StandingRow;
use crate::wire::{
    self, Listing, RawDivision, RawId, RawLeague, RawMatch, RawSeason, RawStandingRow, RawTeam,
};
use crate::{Division, League, Match, MatchStatus, Season, Team};
use log::debug;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_BASE_URL: &str = "https://api.bodegacatsgc.gg";

/// League REST client. Every read goes through the normalization functions
/// below, so callers only ever see the canonical domain types.
#[derive(Debug, Clone)]
pub struct LeagueApi {
    client: Client,
    base_url: String,
    timeout: Duration,
    credentials: Option<Credentials>,
}

impl Default for LeagueApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Bearer token issued by the external auth service. Scoped to the client
/// it is attached to.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credentials(<redacted>)")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error for {1}: {0}")]
    Network(#[source] reqwest::Error, String),
    #[error("API error for {1}: {0}")]
    Api(#[source] reqwest::Error, String),
    #[error("parse error for {1}: {0}")]
    Parsing(#[source] reqwest::Error, String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid URL {0}")]
    Url(String),
}

/// Which team list a standings table is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamScope {
    Division(String),
    League(String),
}

impl LeagueApi {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("league-board/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url: base_url.as_ref().trim_end_matches('/').to_owned(),
            timeout: Duration::from_secs(10),
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /teams?league_id=<id>`
    pub async fn fetch_league_teams(&self, league_id: &str) -> ApiResult<Vec<Team>> {
        let raw = self.get_list("/teams", &[("league_id", league_id)], "team").await?;
        Ok(map_teams(raw))
    }

    /// `GET /api/v2/teams?division_id=<id>`
    pub async fn fetch_division_teams(&self, division_id: &str) -> ApiResult<Vec<Team>> {
        let raw = self.get_list("/api/v2/teams", &[("division_id", division_id)], "team").await?;
        Ok(map_teams(raw))
    }

    pub async fn fetch_teams(&self, scope: &TeamScope) -> ApiResult<Vec<Team>> {
        match scope {
            TeamScope::Division(id) => self.fetch_division_teams(id).await,
            TeamScope::League(id) => self.fetch_league_teams(id).await,
        }
    }

    /// `GET /matches?season_id=<id>`
    pub async fn fetch_season_matches(&self, season_id: &str) -> ApiResult<Vec<Match>> {
        let raw = self.get_list("/matches", &[("season_id", season_id)], "match").await?;
        Ok(map_matches(raw))
    }

    /// `GET /matches/bracket?league_id=<id>`
    pub async fn fetch_bracket_matches(&self, league_id: &str) -> ApiResult<Vec<Match>> {
        let raw = self.get_list("/matches/bracket", &[("league_id", league_id)], "match").await?;
        Ok(map_matches(raw))
    }

    /// `GET /matches/final-round?league_id=<id>`. The backend answers `null`
    /// before the final has been generated.
    pub async fn fetch_final_match(&self, league_id: &str) -> ApiResult<Option<Match>> {
        let raw: Option<Value> =
            self.get("/matches/final-round", &[("league_id", league_id)]).await?;
        let Some(value) = raw else {
            return Ok(None);
        };
        match serde_json::from_value::<RawMatch>(value) {
            Ok(m) => Ok(map_match(m)),
            Err(e) => {
                debug!("ignoring malformed final-round record: {e}");
                Ok(None)
            }
        }
    }

    /// `GET /api/v2/standings?season_id=<id>&division_id=<id>`: the table as
    /// the server aggregates it. Rows come back unranked; see
    /// [`crate::standings::rank_rows`].
    pub async fn fetch_division_standings(
        &self,
        season_id: &str,
        division_id: &str,
    ) -> ApiResult<Vec<StandingRow>> {
        let query = [("season_id", season_id), ("division_id", division_id)];
        let raw = self.get_list("/api/v2/standings", &query, "standings row").await?;
        Ok(raw.into_iter().filter_map(map_standing_row).collect())
    }

    pub async fn fetch_seasons(&self) -> ApiResult<Vec<Season>> {
        let raw: Vec<RawSeason> = self.get_list("/api/v2/seasons", &[], "season").await?;
        Ok(raw.into_iter().filter_map(map_season).collect())
    }

    pub async fn fetch_divisions(&self, season_id: &str) -> ApiResult<Vec<Division>> {
        let raw: Vec<RawDivision> =
            self.get_list("/api/v2/divisions", &[("season_id", season_id)], "division").await?;
        Ok(raw.into_iter().filter_map(map_division).collect())
    }

    pub async fn fetch_leagues(&self) -> ApiResult<Vec<League>> {
        let raw: Vec<RawLeague> = self.get_list("/leagues", &[], "league").await?;
        Ok(raw.into_iter().filter_map(map_league).collect())
    }

    /// Fetch a list body and decode its records one by one.
    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> ApiResult<Vec<T>> {
        let listing: Listing<Value> = self.get(path, query).await?;
        Ok(wire::decode_each(listing, what))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        let url = self.url(path, query)?;
        debug!("GET {url}");

        let mut request = self.client.get(url.clone()).timeout(self.timeout);
        if let Some(credentials) = &self.credentials {
            request = request.bearer_auth(&credentials.token);
        }

        let url = url.to_string();
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url));
        }

        match response.error_for_status() {
            Ok(res) => res.json::<T>().await.map_err(|e| ApiError::Parsing(e, url)),
            Err(e) => Err(ApiError::Api(e, url)),
        }
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<Url> {
        let raw = format!("{}{path}", self.base_url);
        let parsed = if query.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, query)
        };
        parsed.map_err(|e| ApiError::Url(format!("{raw}: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Mapping: wire dialects → canonical domain types
// ---------------------------------------------------------------------------

fn normalize(id: Option<RawId>) -> Option<String> {
    id.as_ref().and_then(RawId::normalize)
}

fn map_teams(raw: Vec<RawTeam>) -> Vec<Team> {
    raw.into_iter().filter_map(map_team).collect()
}

fn map_team(t: RawTeam) -> Option<Team> {
    let Some(id) = normalize(t.id) else {
        debug!("dropping team without id: {:?}", t.name.or(t.team_name));
        return None;
    };
    Some(Team {
        id,
        name: t.name.or(t.team_name).unwrap_or_default(),
        division_id: normalize(t.division_id).or(t.division),
        season_id: normalize(t.season_id),
    })
}

fn map_matches(raw: Vec<RawMatch>) -> Vec<Match> {
    raw.into_iter().filter_map(map_match).collect()
}

/// Fold both match dialects into one `Match`.
///
/// Participants come from `team1_id`/`team2_id`, else `home_team_id`/`away_team_id`.
/// Standings feeds sometimes carry only `winner_team_id`/`loser_team_id`; in
/// that case the winner takes side 1 and the loser side 2. A record naming
/// only the loser credits the win to the loser's opponent.
fn map_match(m: RawMatch) -> Option<Match> {
    let Some(id) = normalize(m.id) else {
        debug!("dropping match without id");
        return None;
    };

    let winner_team_id = normalize(m.winner_team_id);
    let loser_team_id = normalize(m.loser_team_id);
    let mut team1_id = normalize(m.team1_id).or_else(|| normalize(m.home_team_id));
    let mut team2_id = normalize(m.team2_id).or_else(|| normalize(m.away_team_id));
    if team1_id.is_none() && team2_id.is_none() {
        team1_id = winner_team_id.clone();
        team2_id = loser_team_id.clone();
    }

    let winner_id = normalize(m.winner_id).or(winner_team_id).or_else(|| {
        let loser = loser_team_id?;
        if team1_id.as_deref() == Some(loser.as_str()) {
            team2_id.clone()
        } else if team2_id.as_deref() == Some(loser.as_str()) {
            team1_id.clone()
        } else {
            None
        }
    });

    Some(Match {
        id,
        team1_id,
        team2_id,
        winner_id,
        round: wire::number(m.round),
        season_id: normalize(m.season_id),
        team1_score: wire::number(m.team1_score)
            .or_else(|| wire::number(m.home_team_score))
            .or_else(|| wire::number(m.team_a_score)),
        team2_score: wire::number(m.team2_score)
            .or_else(|| wire::number(m.away_team_score))
            .or_else(|| wire::number(m.team_b_score)),
        status: m.status.as_deref().map(MatchStatus::parse),
    })
}

/// Server rows are keyed by team name when they carry no id.
fn map_standing_row(r: RawStandingRow) -> Option<StandingRow> {
    let name = r.team_name.or(r.name);
    let Some(team_id) = normalize(r.team_id).or_else(|| normalize(r.id)).or_else(|| name.clone())
    else {
        debug!("dropping standings row without team");
        return None;
    };
    Some(StandingRow {
        name: name.unwrap_or_else(|| team_id.clone()),
        team_id,
        wins: wire::number(r.wins).unwrap_or(0),
        losses: wire::number(r.losses).unwrap_or(0),
        draws: wire::number(r.draws).unwrap_or(0),
        win_pct: 0.0,
    })
}

fn map_season(s: RawSeason) -> Option<Season> {
    Some(Season { id: normalize(s.id)?, name: s.name.unwrap_or_default() })
}

fn map_division(d: RawDivision) -> Option<Division> {
    Some(Division {
        id: normalize(d.id)?,
        name: d.name.unwrap_or_default(),
        season_id: normalize(d.season_id),
    })
}

fn map_league(l: RawLeague) -> Option<League> {
    Some(League {
        id: normalize(l.id)?,
        name: l.name.unwrap_or_default(),
        season: l.season,
        status: l.status,
    })
}
