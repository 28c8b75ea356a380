use league_api::bracket::Bracket;
use league_api::client::TeamScope;
use league_api::standings::Standings;
use league_api::{Division, League, Season};
use serde::Serialize;

/// Identifies the view a request was issued for. Responses carrying a token
/// other than the active one are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ViewToken(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Standings { season_id: String, teams: TeamScope },
    /// The server-aggregated table for one division.
    ReportedStandings { season_id: String, division_id: String },
    Bracket { league_id: String },
    Champion { league_id: String },
    Seasons,
    Divisions { season_id: String },
    Leagues,
}

#[derive(Debug, Clone)]
pub struct NetworkRequest {
    pub token: ViewToken,
    pub view: View,
}

#[derive(Debug)]
pub struct NetworkResponse {
    pub token: ViewToken,
    pub payload: Payload,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    Standings(Standings),
    Bracket(Bracket),
    Champion(Option<String>),
    Seasons(Vec<Season>),
    Divisions(Vec<Division>),
    Leagues(Vec<League>),
    Error { message: String },
}

/// Sent by the periodic refresher when the active view should be reloaded.
#[derive(Debug, Clone, Copy)]
pub struct RefreshTick;
