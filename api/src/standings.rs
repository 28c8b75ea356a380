//! Win/loss standings derived from raw match records.

use crate::{Match, MatchDefect, Team};
use log::debug;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StandingRow {
    pub team_id: String,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub win_pct: f64,
}

impl StandingRow {
    fn seed(team: &Team) -> Self {
        Self { team_id: team.id.clone(), name: team.name.clone(), ..Default::default() }
    }

    /// Matches with a winner; draws are not part of the percentage.
    pub fn decided(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn played(&self) -> u32 {
        self.decided() + self.draws
    }

    /// "1.000", "0.500", "0.000".
    pub fn win_pct_display(&self) -> String {
        format!("{:.3}", self.win_pct)
    }

    pub fn record(&self) -> String {
        if self.draws > 0 {
            format!("{}-{}-{}", self.wins, self.losses, self.draws)
        } else {
            format!("{}-{}", self.wins, self.losses)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Standings {
    pub rows: Vec<StandingRow>,
    /// Match records that could not be attributed at all.
    pub skipped: Vec<SkippedMatch>,
}

impl Standings {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, team_id: &str) -> Option<&StandingRow> {
        self.rows.iter().find(|r| r.team_id == team_id)
    }

    pub fn total_wins(&self) -> u32 {
        self.rows.iter().map(|r| r.wins).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedMatch {
    pub match_id: String,
    pub reason: MatchDefect,
}

/// Build the standings table for `teams` from `matches`.
///
/// Both lists are expected to be pre-filtered to one season/division. Every
/// team gets a row even without matches. A winner or loser that is not in
/// `teams` is ignored for that side only, so a match against a team from
/// another division still credits the in-scope side. Malformed records are
/// skipped and reported in [`Standings::skipped`].
///
/// Ordering: win percentage descending, then wins descending, then team id
/// ascending.
pub fn compute_standings(teams: &[Team], matches: &[Match]) -> Standings {
    let mut rows: Vec<StandingRow> = Vec::with_capacity(teams.len());
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(teams.len());
    for team in teams {
        if !index.contains_key(team.id.as_str()) {
            index.insert(team.id.as_str(), rows.len());
            rows.push(StandingRow::seed(team));
        }
    }

    let mut skipped = Vec::new();
    for m in matches {
        if let Err(reason) = m.validate() {
            debug!("skipping match {}: {reason}", m.id);
            skipped.push(SkippedMatch { match_id: m.id.clone(), reason });
            continue;
        }

        if let Some(winner) = m.winner_id.as_deref() {
            if let Some(&i) = index.get(winner) {
                rows[i].wins += 1;
            }
            if let Some(&i) = m.opponent_of(winner).and_then(|loser| index.get(loser)) {
                rows[i].losses += 1;
            }
        } else if m.is_draw() {
            for &i in m.participants().filter_map(|id| index.get(id)) {
                rows[i].draws += 1;
            }
        }
    }

    Standings { rows: rank_rows(rows), skipped }
}

/// Recompute each row's percentage and put the rows in table order. Used both
/// for locally derived rows and for rows the server aggregated.
pub fn rank_rows(mut rows: Vec<StandingRow>) -> Vec<StandingRow> {
    for row in &mut rows {
        row.win_pct = win_pct(row.wins, row.losses);
    }
    rows.sort_by(rank_order);
    rows
}

pub fn win_pct(wins: u32, losses: u32) -> f64 {
    match wins + losses {
        0 => 0.0,
        decided => f64::from(wins) / f64::from(decided),
    }
}

/// Percentages are compared as exact fractions so that 1/3 and 2/6 tie.
fn rank_order(a: &StandingRow, b: &StandingRow) -> Ordering {
    let (a_num, a_den) = (u64::from(a.wins), u64::from(a.decided().max(1)));
    let (b_num, b_den) = (u64::from(b.wins), u64::from(b.decided().max(1)));
    (b_num * a_den)
        .cmp(&(a_num * b_den))
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| a.team_id.cmp(&b.team_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchStatus;

    fn teams(ids: &[&str]) -> Vec<Team> {
        ids.iter().map(|id| Team::new(*id, format!("Team {id}"))).collect()
    }

    fn played(id: &str, team1: &str, team2: &str, winner: Option<&str>) -> Match {
        Match {
            id: id.into(),
            team1_id: Some(team1.into()),
            team2_id: Some(team2.into()),
            winner_id: winner.map(Into::into),
            ..Default::default()
        }
    }

    fn order(standings: &Standings) -> Vec<&str> {
        standings.rows.iter().map(|r| r.team_id.as_str()).collect()
    }

    #[test]
    fn empty_input_gives_empty_standings() {
        let standings = compute_standings(&[], &[]);
        assert!(standings.is_empty());
        assert!(standings.skipped.is_empty());
    }

    #[test]
    fn teams_without_matches_get_zero_records() {
        let standings = compute_standings(&teams(&["c", "a", "b"]), &[]);
        assert_eq!(standings.rows.len(), 3);
        for row in &standings.rows {
            assert_eq!((row.wins, row.losses, row.draws), (0, 0, 0));
            assert_eq!(row.win_pct_display(), "0.000");
        }
        assert_eq!(order(&standings), vec!["a", "b", "c"], "all tied, so by team id");
    }

    #[test]
    fn pending_match_does_not_count() {
        let matches = vec![
            played("1", "A", "B", Some("A")),
            played("2", "B", "C", Some("C")),
            played("3", "A", "C", None),
        ];
        let standings = compute_standings(&teams(&["A", "B", "C"]), &matches);

        let a = standings.row("A").unwrap();
        let b = standings.row("B").unwrap();
        let c = standings.row("C").unwrap();
        assert_eq!((a.wins, a.losses), (1, 0));
        assert_eq!((b.wins, b.losses), (1, 1));
        assert_eq!((c.wins, c.losses), (1, 0));
        assert_eq!(a.win_pct_display(), "1.000");
        assert_eq!(b.win_pct_display(), "0.500");

        assert_eq!(order(&standings), vec!["A", "C", "B"]);
    }

    #[test]
    fn winner_on_either_side_is_attributed() {
        let matches = vec![played("1", "a", "b", Some("b")), played("2", "a", "b", Some("a"))];
        let standings = compute_standings(&teams(&["a", "b"]), &matches);
        for id in ["a", "b"] {
            let row = standings.row(id).unwrap();
            assert_eq!((row.wins, row.losses), (1, 1), "team {id}");
        }
    }

    #[test]
    fn out_of_scope_opponent_only_credits_the_known_side() {
        // "x" plays in another division; its side is not attributed.
        let matches = vec![played("1", "a", "x", Some("a")), played("2", "x", "b", Some("x"))];
        let standings = compute_standings(&teams(&["a", "b"]), &matches);

        assert_eq!(standings.rows.len(), 2);
        assert_eq!(standings.row("a").unwrap().wins, 1);
        assert_eq!(standings.row("b").unwrap().losses, 1);
        assert!(standings.row("x").is_none());
        assert!(standings.skipped.is_empty());
    }

    #[test]
    fn malformed_records_are_skipped_and_reported() {
        let matches = vec![
            played("bad-winner", "a", "b", Some("z")),
            Match { id: "no-teams".into(), winner_id: Some("a".into()), ..Default::default() },
            played("ok", "a", "b", Some("a")),
        ];
        let standings = compute_standings(&teams(&["a", "b"]), &matches);

        assert_eq!(standings.total_wins(), 1);
        assert_eq!(
            standings.skipped,
            vec![
                SkippedMatch {
                    match_id: "bad-winner".into(),
                    reason: MatchDefect::WinnerNotParticipant("z".into()),
                },
                SkippedMatch {
                    match_id: "no-teams".into(),
                    reason: MatchDefect::MissingParticipants,
                },
            ]
        );
    }

    #[test]
    fn total_wins_matches_resolvable_winners() {
        let matches = vec![
            played("1", "a", "b", Some("a")),
            played("2", "c", "b", Some("c")),
            played("3", "c", "a", Some("c")),
            played("4", "c", "x", Some("x")), // winner out of scope
            played("5", "a", "b", None),
        ];
        let standings = compute_standings(&teams(&["a", "b", "c"]), &matches);
        assert_eq!(standings.total_wins(), 3);
        assert_eq!(standings.row("c").unwrap().record(), "2-1");
    }

    #[test]
    fn rows_sorted_non_increasing_by_pct() {
        let matches = vec![
            played("1", "a", "b", Some("a")),
            played("2", "a", "c", Some("c")),
            played("3", "b", "c", Some("b")),
            played("4", "d", "c", Some("d")),
            played("5", "d", "a", Some("d")),
        ];
        let standings = compute_standings(&teams(&["a", "b", "c", "d"]), &matches);
        assert!(standings.rows.windows(2).all(|w| w[0].win_pct >= w[1].win_pct));
        assert_eq!(standings.rows[0].team_id, "d");
    }

    #[test]
    fn equal_pct_ranks_more_wins_first() {
        // a: 2-2, b: 1-1, both .500
        let matches = vec![
            played("1", "a", "c", Some("a")),
            played("2", "a", "c", Some("a")),
            played("3", "a", "c", Some("c")),
            played("4", "a", "c", Some("c")),
            played("5", "b", "c", Some("b")),
            played("6", "b", "c", Some("c")),
        ];
        let standings = compute_standings(&teams(&["b", "a"]), &matches);
        assert_eq!(order(&standings), vec!["a", "b"]);
    }

    #[test]
    fn server_rows_are_ranked_like_local_ones() {
        let row = |id: &str, wins, losses| StandingRow {
            team_id: id.into(),
            name: id.into(),
            wins,
            losses,
            win_pct: 0.9,
            ..Default::default()
        };
        let ranked =
            rank_rows(vec![row("b", 1, 1), row("a", 0, 0), row("c", 2, 2), row("d", 3, 0)]);
        let order: Vec<&str> = ranked.iter().map(|r| r.team_id.as_str()).collect();
        assert_eq!(order, ["d", "c", "b", "a"]);
        assert_eq!(ranked[0].win_pct, 1.0);
        assert_eq!(ranked[3].win_pct, 0.0);
    }

    #[test]
    fn draws_are_counted_but_do_not_move_pct() {
        let mut drawn = played("1", "a", "b", None);
        drawn.status = Some(MatchStatus::Completed);
        drawn.team1_score = Some(1);
        drawn.team2_score = Some(1);
        let matches = vec![drawn, played("2", "a", "b", Some("a"))];

        let standings = compute_standings(&teams(&["a", "b"]), &matches);
        let a = standings.row("a").unwrap();
        assert_eq!((a.wins, a.losses, a.draws), (1, 0, 1));
        assert_eq!(a.played(), 2);
        assert_eq!(a.record(), "1-0-1");
        assert_eq!(a.win_pct_display(), "1.000");
        assert_eq!(standings.row("b").unwrap().draws, 1);
    }

    #[test]
    fn duplicate_team_ids_keep_first_entry() {
        let list = vec![Team::new("a", "First"), Team::new("a", "Second")];
        let standings = compute_standings(&list, &[played("1", "a", "b", Some("a"))]);
        assert_eq!(standings.rows.len(), 1);
        assert_eq!(standings.rows[0].name, "First");
        assert_eq!(standings.rows[0].wins, 1);
    }
}
