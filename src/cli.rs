use crate::settings::CONFIG_ENV;
use crate::state::messages::View;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use league_api::client::TeamScope;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "league-board",
    version,
    about = "League standings and brackets from the league API"
)]
pub struct Cli {
    /// JSON settings file
    #[arg(long, global = true, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Keep reloading the view until interrupted
    #[arg(long, global = true)]
    pub watch: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Win/loss table for one season
    Standings(StandingsArgs),
    /// Bracket grouped by round
    Bracket {
        #[arg(long)]
        league: String,
    },
    /// Winner of the league's final
    Champion {
        #[arg(long)]
        league: String,
    },
    Seasons,
    Divisions {
        #[arg(long)]
        season: String,
    },
    Leagues,
}

#[derive(Debug, Args)]
pub struct StandingsArgs {
    #[arg(long)]
    pub season: String,

    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Show the table the server aggregates instead of deriving it from matches
    #[arg(long, requires = "division")]
    pub server: bool,
}

/// Exactly one team list to rank.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct ScopeArgs {
    /// Rank the teams of this division
    #[arg(long)]
    pub division: Option<String>,
    /// Rank the teams of this league
    #[arg(long)]
    pub league: Option<String>,
}

impl ScopeArgs {
    pub fn team_scope(&self) -> anyhow::Result<TeamScope> {
        self.division
            .clone()
            .map(TeamScope::Division)
            .or_else(|| self.league.clone().map(TeamScope::League))
            .context("one of --division or --league is required")
    }
}

impl StandingsArgs {
    fn view(&self) -> anyhow::Result<View> {
        let season_id = self.season.clone();
        Ok(match self.scope.team_scope()? {
            TeamScope::Division(division_id) if self.server => {
                View::ReportedStandings { season_id, division_id }
            }
            TeamScope::League(_) if self.server => {
                anyhow::bail!("--server needs --division")
            }
            teams => View::Standings { season_id, teams },
        })
    }
}

impl Command {
    pub fn view(&self) -> anyhow::Result<View> {
        Ok(match self {
            Command::Standings(args) => args.view()?,
            Command::Bracket { league } => View::Bracket { league_id: league.clone() },
            Command::Champion { league } => View::Champion { league_id: league.clone() },
            Command::Seasons => View::Seasons,
            Command::Divisions { season } => View::Divisions { season_id: season.clone() },
            Command::Leagues => View::Leagues,
        })
    }
}
