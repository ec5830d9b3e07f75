use crate::error::FeatureError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Team id Riot assigns to the first side; its win flag is the label.
pub const TEAM1_ID: i64 = 100;
pub const TEAM2_ID: i64 = 200;

pub const WINNER_COLUMN: &str = "winner";
pub const AGGREGATE_COLUMNS: [&str; 6] = [
    "team1_kills",
    "team1_deaths",
    "team1_assists",
    "team2_kills",
    "team2_deaths",
    "team2_assists",
];

#[derive(Debug, Clone, Deserialize)]
pub struct MatchRecord {
    pub info: MatchInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchInfo {
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub team_id: i64,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub champion_id: i64,
    pub win: bool,
    #[serde(default)]
    pub puuid: Option<String>,
    #[serde(default)]
    pub team_position: Option<String>,
}

impl MatchRecord {
    pub fn from_value(value: &Value) -> Result<Self, FeatureError> {
        Ok(MatchRecord::deserialize(value)?)
    }

    pub fn participant(&self, puuid: &str) -> Option<&Participant> {
        self.info
            .participants
            .iter()
            .find(|p| p.puuid.as_deref() == Some(puuid))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamAggregate {
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub champions: BTreeSet<i64>,
}

impl TeamAggregate {
    fn from_participants<'a>(participants: impl Iterator<Item = &'a Participant>) -> Self {
        let mut team = TeamAggregate::default();
        for p in participants {
            team.kills += p.kills;
            team.deaths += p.deaths;
            team.assists += p.assists;
            team.champions.insert(p.champion_id);
        }
        team
    }
}

/// One training example: per-team aggregates, champion picks and the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRow {
    pub team1: TeamAggregate,
    pub team2: TeamAggregate,
    pub winner: u8,
}

impl FeatureRow {
    pub fn aggregate_values(&self) -> [i64; 6] {
        [
            self.team1.kills,
            self.team1.deaths,
            self.team1.assists,
            self.team2.kills,
            self.team2.deaths,
            self.team2.assists,
        ]
    }

    /// `(team number, champion id)` for every champion indicator set on this row.
    pub fn champion_keys(&self) -> impl Iterator<Item = (u8, i64)> + '_ {
        self.team1
            .champions
            .iter()
            .map(|c| (1u8, *c))
            .chain(self.team2.champions.iter().map(|c| (2u8, *c)))
    }

    /// Flat column -> value view of the row.
    pub fn to_map(&self) -> BTreeMap<String, i64> {
        let mut map = BTreeMap::new();
        for (team, champion) in self.champion_keys() {
            map.insert(champion_column(team, champion), 1);
        }
        for (name, value) in AGGREGATE_COLUMNS.iter().zip(self.aggregate_values()) {
            map.insert(name.to_string(), value);
        }
        map.insert(WINNER_COLUMN.to_string(), i64::from(self.winner));
        map
    }
}

pub fn champion_column(team: u8, champion_id: i64) -> String {
    format!("team{}_champ_{}", team, champion_id)
}

/// Builds the feature row of a single match.
///
/// Participants are split on `teamId` 100/200; anything else is ignored.
/// The label is read from the first team-100 participant only, so a match
/// without a team 100 cannot be labelled.
pub fn extract(record: &MatchRecord) -> Result<FeatureRow, FeatureError> {
    let participants = &record.info.participants;

    let first_team1 = participants
        .iter()
        .find(|p| p.team_id == TEAM1_ID)
        .ok_or(FeatureError::MissingTeam(TEAM1_ID))?;

    let team1 =
        TeamAggregate::from_participants(participants.iter().filter(|p| p.team_id == TEAM1_ID));
    let team2 =
        TeamAggregate::from_participants(participants.iter().filter(|p| p.team_id == TEAM2_ID));

    Ok(FeatureRow {
        team1,
        team2,
        winner: if first_team1.win { 1 } else { 0 },
    })
}

pub fn extract_value(value: &Value) -> Result<FeatureRow, FeatureError> {
    extract(&MatchRecord::from_value(value)?)
}
