pub mod bracket;
pub mod client;
pub mod snapshot;
pub mod standings;
pub mod wire;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Domain types, independent of the backend's wire dialects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub division_id: Option<String>,
    pub season_id: Option<String>,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), ..Default::default() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Match {
    pub id: String,
    pub team1_id: Option<String>, // None = bye / not yet seeded
    pub team2_id: Option<String>,
    pub winner_id: Option<String>, // None = undecided
    pub round: Option<u32>,        // tournament context
    pub season_id: Option<String>, // standings context
    pub team1_score: Option<u32>,
    pub team2_score: Option<u32>,
    pub status: Option<MatchStatus>,
}

impl Match {
    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.team1_id.as_deref().into_iter().chain(self.team2_id.as_deref())
    }

    pub fn has_participant(&self, team_id: &str) -> bool {
        self.participants().any(|id| id == team_id)
    }

    /// The other side of the match from `team_id`. `None` when `team_id`
    /// does not play here or faces a bye.
    pub fn opponent_of(&self, team_id: &str) -> Option<&str> {
        if self.team1_id.as_deref() == Some(team_id) {
            self.team2_id.as_deref()
        } else if self.team2_id.as_deref() == Some(team_id) {
            self.team1_id.as_deref()
        } else {
            None
        }
    }

    /// Exactly one participant.
    pub fn is_bye(&self) -> bool {
        self.team1_id.is_some() != self.team2_id.is_some()
    }

    /// `winner_id` is the only thing that moves a match to `Decided`; the
    /// backend status field is not consulted.
    pub fn state(&self) -> MatchState {
        if self.winner_id.is_some() {
            MatchState::Decided
        } else if self.team1_id.is_none() && self.team2_id.is_none() {
            MatchState::Unscheduled
        } else {
            MatchState::Scheduled
        }
    }

    /// A completed match with no winner and level scores.
    pub fn is_draw(&self) -> bool {
        self.winner_id.is_none()
            && self.status == Some(MatchStatus::Completed)
            && matches!((self.team1_score, self.team2_score), (Some(a), Some(b)) if a == b)
    }

    pub fn validate(&self) -> Result<(), MatchDefect> {
        if self.team1_id.is_none() && self.team2_id.is_none() {
            return Err(MatchDefect::MissingParticipants);
        }
        if let Some(winner) = self.winner_id.as_deref()
            && !self.has_participant(winner)
        {
            return Err(MatchDefect::WinnerNotParticipant(winner.to_owned()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
pub enum MatchDefect {
    #[error("match has no participants")]
    MissingParticipants,
    #[error("winner {0} is not a participant")]
    WinnerNotParticipant(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum MatchState {
    #[default]
    Unscheduled,
    Scheduled,
    Decided,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Canceled,
}

impl MatchStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "in_progress" | "live" => MatchStatus::InProgress,
            "completed" | "final" | "finished" => MatchStatus::Completed,
            "canceled" | "cancelled" => MatchStatus::Canceled,
            _ => MatchStatus::Scheduled,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Season {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Division {
    pub id: String,
    pub name: String,
    pub season_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct League {
    pub id: String,
    pub name: String,
    pub season: Option<String>,
    pub status: Option<String>,
}
