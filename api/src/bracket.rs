//! Round-grouped bracket view over flat tournament match rows.
//!
//! The backend owns pairing and round generation; this module only renders
//! whatever rounds currently exist.

use crate::{Match, MatchState, Team};
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Display name for an empty bracket side.
pub const BYE: &str = "BYE";
/// Display name for a team id missing from the team list.
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketSlot {
    pub match_id: String,
    pub team1_name: String,
    pub team2_name: String,
    pub outcome: SlotOutcome,
    pub state: MatchState,
    pub is_bye: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum SlotOutcome {
    Pending,
    Winner(String),
}

impl SlotOutcome {
    pub fn winner_name(&self) -> Option<&str> {
        match self {
            SlotOutcome::Winner(name) => Some(name),
            SlotOutcome::Pending => None,
        }
    }
}

impl fmt::Display for SlotOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotOutcome::Pending => f.write_str("Pending"),
            SlotOutcome::Winner(name) => write!(f, "Winner: {name}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundLabel {
    Final,
    Round(u32),
}

impl fmt::Display for RoundLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundLabel::Final => f.write_str("Final"),
            RoundLabel::Round(n) => write!(f, "Round {n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketRound {
    pub number: u32,
    pub label: RoundLabel,
    pub slots: Vec<BracketSlot>,
}

impl BracketRound {
    /// A lone match is shown as the final. This is a heuristic: a short or
    /// odd-sized bracket can have a single-match round that is not the last.
    fn label_for(number: u32, slots: &[BracketSlot]) -> RoundLabel {
        if slots.len() == 1 { RoundLabel::Final } else { RoundLabel::Round(number) }
    }

    pub fn is_final(&self) -> bool {
        self.label == RoundLabel::Final
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|s| s.state == MatchState::Decided)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bracket {
    pub rounds: BTreeMap<u32, BracketRound>,
    /// Ids of matches that carry no round number.
    pub unplaced: Vec<String>,
}

impl Bracket {
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Rounds in ascending order.
    pub fn rounds(&self) -> impl Iterator<Item = &BracketRound> {
        self.rounds.values()
    }

    /// The winner of the last round, when that round is a decided final.
    pub fn champion(&self) -> Option<&str> {
        let last = self.rounds.values().next_back()?;
        if !last.is_final() {
            return None;
        }
        last.slots.first()?.outcome.winner_name()
    }

    /// Earliest round that still has undecided matches.
    pub fn current_round(&self) -> Option<&BracketRound> {
        self.rounds.values().find(|r| !r.is_complete())
    }
}

struct NameBook<'a> {
    names: HashMap<&'a str, &'a str>,
}

impl<'a> NameBook<'a> {
    fn new(teams: &'a [Team]) -> Self {
        let mut names = HashMap::with_capacity(teams.len());
        for team in teams {
            names.entry(team.id.as_str()).or_insert(team.name.as_str());
        }
        Self { names }
    }

    fn side(&self, id: Option<&str>) -> String {
        match id {
            None => BYE.to_owned(),
            Some(id) => self.lookup(id),
        }
    }

    fn lookup(&self, id: &str) -> String {
        self.names.get(id).copied().unwrap_or(UNKNOWN).to_owned()
    }
}

/// Group `matches` by round and resolve display names against `teams`.
pub fn project_bracket(teams: &[Team], matches: &[Match]) -> Bracket {
    let book = NameBook::new(teams);

    let mut grouped: BTreeMap<u32, Vec<BracketSlot>> = BTreeMap::new();
    let mut unplaced = Vec::new();
    for m in matches {
        let Some(round) = m.round else {
            debug!("match {} has no round, leaving it out of the bracket", m.id);
            unplaced.push(m.id.clone());
            continue;
        };
        grouped.entry(round).or_default().push(slot(&book, m));
    }

    let rounds = grouped
        .into_iter()
        .map(|(number, slots)| {
            let label = BracketRound::label_for(number, &slots);
            (number, BracketRound { number, label, slots })
        })
        .collect();

    Bracket { rounds, unplaced }
}

fn slot(book: &NameBook<'_>, m: &Match) -> BracketSlot {
    let outcome = match m.winner_id.as_deref() {
        Some(winner) => SlotOutcome::Winner(book.lookup(winner)),
        None => SlotOutcome::Pending,
    };
    BracketSlot {
        match_id: m.id.clone(),
        team1_name: book.side(m.team1_id.as_deref()),
        team2_name: book.side(m.team2_id.as_deref()),
        outcome,
        state: m.state(),
        is_bye: m.is_bye(),
    }
}

/// Champion name from the backend's final-round match. `None` when the final
/// has not been generated or is undecided.
pub fn resolve_champion(final_match: Option<&Match>, teams: &[Team]) -> Option<String> {
    let winner = final_match?.winner_id.as_deref()?;
    Some(NameBook::new(teams).lookup(winner))
}
