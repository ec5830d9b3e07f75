//! Per-player summaries over a list of recent matches.

use crate::error::MatchError;
use crate::features::{MatchRecord, Participant};
use crate::riot_api::MatchSource;
use log::warn;
use std::collections::HashMap;

/// Neutral rate returned when there is nothing to measure.
pub const NEUTRAL_RATE: f64 = 0.5;
pub const UNKNOWN_ROLE: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSummary {
    pub matches: usize,
    pub win_rate: f64,
    pub preferred_role: String,
    pub champion_win_rate: Option<(i64, f64)>,
}

/// The player's participant record in one match, if the match could be read.
type Appearance = Result<Option<Participant>, MatchError>;

fn player_in_match(source: &dyn MatchSource, match_id: &str, puuid: &str) -> Appearance {
    let value = source.match_record(match_id)?;
    let record = MatchRecord::from_value(&value)?;
    Ok(record.participant(puuid).cloned())
}

/// Fetches every match once; failures are logged and kept in place.
fn fetch_appearances(
    source: &dyn MatchSource,
    puuid: &str,
    match_ids: &[String],
) -> Vec<Appearance> {
    match_ids
        .iter()
        .map(|match_id| {
            let appearance = player_in_match(source, match_id, puuid);
            if let Err(err) = &appearance {
                warn!("Error processing match {}: {}", match_id, err);
            }
            appearance
        })
        .collect()
}

fn win_rate_from(appearances: Vec<Appearance>) -> Result<f64, MatchError> {
    if appearances.is_empty() {
        return Ok(NEUTRAL_RATE);
    }

    let total = appearances.len();
    let mut wins = 0usize;
    for appearance in appearances {
        if let Some(p) = appearance? {
            if p.win {
                wins += 1;
            }
        }
    }

    Ok(wins as f64 / total as f64)
}

fn preferred_role_from(appearances: &[Appearance]) -> String {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for participant in appearances.iter().filter_map(|a| a.as_ref().ok()).flatten() {
        let Some(position) = participant.team_position.as_deref() else {
            continue;
        };
        if position.is_empty() || position == "NONE" {
            continue;
        }

        let first_seen = counts.len();
        counts.entry(position).or_insert((0, first_seen)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (a_count, a_seen)), (_, (b_count, b_seen))| {
            a_count.cmp(b_count).then(b_seen.cmp(a_seen))
        })
        .map(|(role, _)| role.to_string())
        .unwrap_or_else(|| UNKNOWN_ROLE.to_string())
}

fn champion_win_rate_from(appearances: &[Appearance], champion_id: i64) -> f64 {
    let mut played = 0usize;
    let mut wins = 0usize;

    for participant in appearances.iter().filter_map(|a| a.as_ref().ok()).flatten() {
        if participant.champion_id != champion_id {
            continue;
        }
        played += 1;
        if participant.win {
            wins += 1;
        }
    }

    if played == 0 {
        return NEUTRAL_RATE;
    }

    wins as f64 / played as f64
}

/// Fraction of `match_ids` the player won. Any failed fetch aborts.
pub fn win_rate(
    source: &dyn MatchSource,
    puuid: &str,
    match_ids: &[String],
) -> Result<f64, MatchError> {
    win_rate_from(fetch_appearances(source, puuid, match_ids))
}

/// Most common `teamPosition` of the player, ignoring blank and `NONE`.
///
/// Matches that cannot be fetched or parsed are logged and skipped. Ties go
/// to the role that was seen first.
pub fn preferred_role(source: &dyn MatchSource, puuid: &str, match_ids: &[String]) -> String {
    preferred_role_from(&fetch_appearances(source, puuid, match_ids))
}

/// Win fraction of the player on `champion_id` among `match_ids`.
pub fn champion_win_rate(
    source: &dyn MatchSource,
    puuid: &str,
    champion_id: i64,
    match_ids: &[String],
) -> f64 {
    champion_win_rate_from(&fetch_appearances(source, puuid, match_ids), champion_id)
}

/// All three summaries from a single pass over `match_ids`.
pub fn summarize(
    source: &dyn MatchSource,
    puuid: &str,
    match_ids: &[String],
    champion_id: Option<i64>,
) -> Result<PlayerSummary, MatchError> {
    let appearances = fetch_appearances(source, puuid, match_ids);
    let preferred_role = preferred_role_from(&appearances);
    let champion_win_rate =
        champion_id.map(|id| (id, champion_win_rate_from(&appearances, id)));

    Ok(PlayerSummary {
        matches: match_ids.len(),
        win_rate: win_rate_from(appearances)?,
        preferred_role,
        champion_win_rate,
    })
}
