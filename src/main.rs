mod cli;
mod render;
mod settings;
mod state;

use crate::cli::Cli;
use crate::settings::Settings;
use crate::state::messages::{NetworkRequest, NetworkResponse, Payload, RefreshTick, View};
use crate::state::network::NetworkWorker;
use crate::state::refresher::PeriodicRefresher;
use crate::state::view::ViewState;
use anyhow::Context;
use clap::Parser;
use log::{LevelFilter, debug, error, info};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let view = cli.command.view()?;

    better_panic::install();

    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    if let Some(url) = &cli.api_url {
        settings.api_base_url = url.clone();
    }
    let level = if cli.verbose { LevelFilter::Debug } else { settings.level_filter() };
    pretty_env_logger::formatted_builder().filter_level(level).try_init()?;

    debug!("using API at {}", settings.api_base_url);

    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(16);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(16);
    let (refresh_tx, refresh_rx) = mpsc::channel::<RefreshTick>(1);

    // Network thread
    let network_worker = NetworkWorker::new(settings.client(), network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Periodic refresh thread, only when watching
    let periodic_task = cli.watch.then(|| {
        tokio::spawn(PeriodicRefresher::new(refresh_tx, settings.refresh_period()).run())
    });

    let result = main_loop(&cli, view, network_req_tx, network_resp_rx, refresh_rx).await;

    network_task.abort();
    if let Some(task) = periodic_task {
        task.abort();
    }

    result
}

async fn main_loop(
    cli: &Cli,
    view: View,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
    mut refresh_ticks: mpsc::Receiver<RefreshTick>,
) -> anyhow::Result<()> {
    let mut view_state = ViewState::default();
    request(&mut view_state, &view, &network_requests).await?;

    loop {
        tokio::select! {
            response = network_responses.recv() => {
                let Some(NetworkResponse { token, payload }) = response else {
                    anyhow::bail!("network worker stopped");
                };
                if !view_state.accept(token, payload) {
                    continue;
                }
                let Some(payload) = view_state.latest.as_ref() else {
                    continue;
                };
                print_payload(cli, &view_state, payload)?;
                if cli.watch {
                    continue;
                }
                let failure = match payload {
                    Payload::Error { message } => Some(message.clone()),
                    _ => None,
                };
                view_state.close();
                return match failure {
                    Some(message) => Err(anyhow::anyhow!(message)),
                    None => Ok(()),
                };
            }

            Some(RefreshTick) = refresh_ticks.recv() => {
                request(&mut view_state, &view, &network_requests).await?;
            }

            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                view_state.close();
                return Ok(());
            }
        }
    }
}

async fn request(
    view_state: &mut ViewState,
    view: &View,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> anyhow::Result<()> {
    let token = view_state.begin();
    network_requests
        .send(NetworkRequest { token, view: view.clone() })
        .await
        .map_err(|e| {
            error!("Failed to send network request: {e}");
            anyhow::anyhow!("network worker stopped")
        })
}

fn print_payload(cli: &Cli, view_state: &ViewState, payload: &Payload) -> anyhow::Result<()> {
    let text = render::render(payload, cli.json)?;
    if cli.watch
        && !cli.json
        && let Some(at) = view_state.updated_at
    {
        println!("-- updated {} --", at.format("%H:%M:%S"));
    }
    print!("{text}");
    if cli.json {
        println!();
    }
    Ok(())
}
