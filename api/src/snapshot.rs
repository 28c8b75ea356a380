//! Fetch boundary for the derived views.
//!
//! This is the only place where a failed request turns into an empty list.
//! The standings and bracket functions treat empty input as a valid, empty
//! view, so a broken feed shows up as "no data" rather than an error.

use crate::bracket::{self, Bracket};
use crate::client::{ApiResult, LeagueApi, TeamScope};
use crate::standings::{self, Standings};
use crate::{Match, Team};
use futures_util::future::join;
use log::warn;

#[derive(Debug, Clone, Default)]
pub struct StandingsSnapshot {
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
}

impl StandingsSnapshot {
    pub fn standings(&self) -> Standings {
        standings::compute_standings(&self.teams, &self.matches)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BracketSnapshot {
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
}

impl BracketSnapshot {
    pub fn bracket(&self) -> Bracket {
        bracket::project_bracket(&self.teams, &self.matches)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChampionSnapshot {
    pub teams: Vec<Team>,
    pub final_match: Option<Match>,
}

impl ChampionSnapshot {
    pub fn champion(&self) -> Option<String> {
        bracket::resolve_champion(self.final_match.as_ref(), &self.teams)
    }
}

impl LeagueApi {
    /// Teams for `scope` plus every match of `season_id`.
    pub async fn standings_snapshot(
        &self,
        season_id: &str,
        scope: &TeamScope,
    ) -> StandingsSnapshot {
        let (teams, matches) =
            join(self.fetch_teams(scope), self.fetch_season_matches(season_id)).await;
        StandingsSnapshot { teams: or_empty(teams, "teams"), matches: or_empty(matches, "matches") }
    }

    /// The server's own aggregated table for one division, ranked locally.
    pub async fn reported_standings(&self, season_id: &str, division_id: &str) -> Standings {
        let rows = self.fetch_division_standings(season_id, division_id).await;
        Standings { rows: standings::rank_rows(or_empty(rows, "standings")), skipped: Vec::new() }
    }

    pub async fn bracket_snapshot(&self, league_id: &str) -> BracketSnapshot {
        let (teams, matches) =
            join(self.fetch_league_teams(league_id), self.fetch_bracket_matches(league_id)).await;
        BracketSnapshot {
            teams: or_empty(teams, "teams"),
            matches: or_empty(matches, "bracket matches"),
        }
    }

    pub async fn champion_snapshot(&self, league_id: &str) -> ChampionSnapshot {
        let (teams, final_match) =
            join(self.fetch_league_teams(league_id), self.fetch_final_match(league_id)).await;
        let final_match = final_match.unwrap_or_else(|e| {
            warn!("final round unavailable, treating as not yet played: {e}");
            None
        });
        ChampionSnapshot { teams: or_empty(teams, "teams"), final_match }
    }
}

fn or_empty<T>(result: ApiResult<Vec<T>>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!("could not load {what}, showing none: {e}");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const JSON: &str = "application/json";

    #[tokio::test]
    async fn standings_snapshot_degrades_failed_matches_to_empty() {
        let mut server = mockito::Server::new_async().await;
        let _teams = server
            .mock("GET", "/api/v2/teams")
            .match_query(Matcher::UrlEncoded("division_id".into(), "d1".into()))
            .with_status(200)
            .with_header("content-type", JSON)
            .with_body(r#"[{"id": "a", "name": "Alpha"}, {"id": "b", "name": "Bravo"}]"#)
            .create_async()
            .await;
        let _matches = server
            .mock("GET", "/matches")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let api = LeagueApi::new(server.url());
        let snapshot = api.standings_snapshot("s1", &TeamScope::Division("d1".into())).await;
        assert_eq!(snapshot.teams.len(), 2);
        assert!(snapshot.matches.is_empty());

        let standings = snapshot.standings();
        assert_eq!(standings.rows.len(), 2);
        assert!(standings.rows.iter().all(|r| r.wins == 0 && r.losses == 0));
    }

    #[tokio::test]
    async fn reported_standings_rank_server_rows() {
        let mut server = mockito::Server::new_async().await;
        let _rows = server
            .mock("GET", "/api/v2/standings")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", JSON)
            .with_body(
                r#"{"data": [
                    {"team_name": "Alpha", "wins": 1, "losses": 3},
                    {"team_name": "Bravo", "wins": 4, "losses": 0}
                ]}"#,
            )
            .create_async()
            .await;

        let standings = LeagueApi::new(server.url()).reported_standings("s1", "d1").await;
        let names: Vec<&str> = standings.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Bravo", "Alpha"]);
        assert_eq!(standings.rows[1].win_pct_display(), "0.250");
    }

    #[tokio::test]
    async fn unreachable_backend_gives_empty_views() {
        // Nothing listens on port 9 in the test environment.
        let api = LeagueApi::new("http://127.0.0.1:9");
        let standings = api.standings_snapshot("s", &TeamScope::League("l".into())).await;
        assert!(standings.standings().is_empty());

        assert!(api.reported_standings("s", "d").await.is_empty());

        let bracket = api.bracket_snapshot("l").await;
        assert!(bracket.bracket().is_empty());

        assert_eq!(api.champion_snapshot("l").await.champion(), None);
    }

    #[tokio::test]
    async fn bracket_snapshot_projects_rounds() {
        let mut server = mockito::Server::new_async().await;
        let _teams = server
            .mock("GET", "/teams")
            .match_query(Matcher::UrlEncoded("league_id".into(), "L".into()))
            .with_status(200)
            .with_header("content-type", JSON)
            .with_body(r#"[{"id": 1, "name": "Alpha"}, {"id": 2, "name": "Bravo"}]"#)
            .create_async()
            .await;
        let _matches = server
            .mock("GET", "/matches/bracket")
            .match_query(Matcher::UrlEncoded("league_id".into(), "L".into()))
            .with_status(200)
            .with_header("content-type", JSON)
            .with_body(r#"[{"id": 10, "round": 1, "team1_id": 1, "team2_id": 2, "winner_id": 2}]"#)
            .create_async()
            .await;

        let bracket = LeagueApi::new(server.url()).bracket_snapshot("L").await.bracket();
        assert_eq!(bracket.champion(), Some("Bravo"));
    }

    #[tokio::test]
    async fn champion_snapshot_uses_final_round_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let _teams = server
            .mock("GET", "/teams")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", JSON)
            .with_body(r#"[{"id": "a", "name": "Alpha"}]"#)
            .create_async()
            .await;
        let _final = server
            .mock("GET", "/matches/final-round")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", JSON)
            .with_body(
                r#"{"id": "f", "round": 4, "team1_id": "a", "team2_id": "b", "winner_id": "a"}"#,
            )
            .create_async()
            .await;

        let snapshot = LeagueApi::new(server.url()).champion_snapshot("L").await;
        assert_eq!(snapshot.champion().as_deref(), Some("Alpha"));
    }
}
