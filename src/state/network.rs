use crate::state::messages::{NetworkRequest, NetworkResponse, Payload, View};
use league_api::client::{ApiError, LeagueApi};
use log::{debug, error, info};
use tokio::sync::mpsc;

/// Serves load requests one at a time. Derived views (standings, bracket,
/// champion) never fail here: the snapshot layer already degrades broken
/// feeds to empty input. Listings surface their errors.
pub struct NetworkWorker {
    client: LeagueApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
}

impl NetworkWorker {
    pub fn new(
        client: LeagueApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self { client, requests, responses }
    }

    pub async fn run(mut self) {
        while let Some(NetworkRequest { token, view }) = self.requests.recv().await {
            debug!("loading {view:?} for view {token:?}");

            let payload = self.load(view).await.unwrap_or_else(|err| Payload::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.send(NetworkResponse { token, payload }).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
        debug!("network worker stopped");
    }

    async fn load(&self, view: View) -> Result<Payload, ApiError> {
        Ok(match view {
            View::Standings { season_id, teams } => {
                let snapshot = self.client.standings_snapshot(&season_id, &teams).await;
                let standings = snapshot.standings();
                if !standings.skipped.is_empty() {
                    info!("{} malformed match records skipped", standings.skipped.len());
                }
                Payload::Standings(standings)
            }
            View::ReportedStandings { season_id, division_id } => {
                Payload::Standings(self.client.reported_standings(&season_id, &division_id).await)
            }
            View::Bracket { league_id } => {
                let bracket = self.client.bracket_snapshot(&league_id).await.bracket();
                if !bracket.unplaced.is_empty() {
                    info!("{} bracket matches carry no round", bracket.unplaced.len());
                }
                Payload::Bracket(bracket)
            }
            View::Champion { league_id } => {
                Payload::Champion(self.client.champion_snapshot(&league_id).await.champion())
            }
            View::Seasons => Payload::Seasons(self.client.fetch_seasons().await?),
            View::Divisions { season_id } => {
                Payload::Divisions(self.client.fetch_divisions(&season_id).await?)
            }
            View::Leagues => Payload::Leagues(self.client.fetch_leagues().await?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::messages::ViewToken;

    #[tokio::test]
    async fn derived_views_degrade_while_listings_report_errors() {
        let (req_tx, req_rx) = mpsc::channel(4);
        let (resp_tx, mut resp_rx) = mpsc::channel(4);
        let worker = NetworkWorker::new(LeagueApi::new("http://127.0.0.1:9"), req_rx, resp_tx);
        let task = tokio::spawn(worker.run());

        let bracket = View::Bracket { league_id: "l".into() };
        req_tx
            .send(NetworkRequest { token: ViewToken(1), view: bracket })
            .await
            .unwrap();
        req_tx.send(NetworkRequest { token: ViewToken(2), view: View::Leagues }).await.unwrap();

        let first = resp_rx.recv().await.unwrap();
        assert_eq!(first.token, ViewToken(1));
        assert!(matches!(first.payload, Payload::Bracket(ref b) if b.is_empty()));

        let second = resp_rx.recv().await.unwrap();
        assert_eq!(second.token, ViewToken(2));
        assert!(matches!(second.payload, Payload::Error { .. }));

        drop(req_tx);
        task.await.unwrap();
    }
}
