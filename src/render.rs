use crate::state::messages::Payload;
use league_api::bracket::Bracket;
use league_api::standings::Standings;
use std::fmt::Write;

const NAME_WIDTH: usize = 24;

pub fn render(payload: &Payload, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(payload)?);
    }
    Ok(match payload {
        Payload::Standings(standings) => standings_table(standings),
        Payload::Bracket(bracket) => bracket_listing(bracket),
        Payload::Champion(Some(name)) => format!("Champion: {name}\n"),
        Payload::Champion(None) => "No champion yet.\n".to_owned(),
        Payload::Seasons(seasons) => listing(seasons.iter().map(|s| (&s.id, &s.name))),
        Payload::Divisions(divisions) => listing(divisions.iter().map(|d| (&d.id, &d.name))),
        Payload::Leagues(leagues) => listing(leagues.iter().map(|l| (&l.id, &l.name))),
        Payload::Error { message } => format!("Error: {message}\n"),
    })
}

pub fn standings_table(standings: &Standings) -> String {
    if standings.is_empty() {
        return "No standings available.\n".to_owned();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:<w$}  {:>3}  {:>3}  {:>3}  {:>5}",
        "#",
        "Team",
        "W",
        "L",
        "D",
        "PCT",
        w = NAME_WIDTH,
    );
    for (i, row) in standings.rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<w$}  {:>3}  {:>3}  {:>3}  {:>5}",
            i + 1,
            truncate(&row.name, NAME_WIDTH),
            row.wins,
            row.losses,
            row.draws,
            row.win_pct_display(),
            w = NAME_WIDTH,
        );
    }
    if !standings.skipped.is_empty() {
        let _ = writeln!(out, "({} malformed match records skipped)", standings.skipped.len());
    }
    out
}

pub fn bracket_listing(bracket: &Bracket) -> String {
    if bracket.is_empty() {
        return "No matches available.\n".to_owned();
    }

    let mut out = String::new();
    for round in bracket.rounds() {
        let _ = writeln!(out, "{}", round.label);
        for slot in &round.slots {
            let _ = writeln!(out, "  {} vs {}  {}", slot.team1_name, slot.team2_name, slot.outcome);
        }
    }
    if let Some(champion) = bracket.champion() {
        let _ = writeln!(out, "Champion: {champion}");
    }
    out
}

fn listing<'a>(items: impl Iterator<Item = (&'a String, &'a String)>) -> String {
    let mut out = String::new();
    for (id, name) in items {
        let _ = writeln!(out, "{id:>8}  {name}");
    }
    if out.is_empty() {
        out.push_str("Nothing found.\n");
    }
    out
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_owned()
    } else {
        let mut cut: String = s.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
