//! In-memory doubles shared by the unit tests.

use crate::config::RiotConfig;
use crate::error::RiotError;
use crate::riot_api::{MatchSource, RawResponse, RiotClient, Sleeper, Transport};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde_json::{Value, json};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

pub fn ok(body: &str) -> RawResponse {
    status(200, body)
}

pub fn status(code: u16, body: &str) -> RawResponse {
    RawResponse {
        status: StatusCode::from_u16(code).expect("valid status code"),
        retry_after: None,
        body: body.to_string(),
    }
}

impl RawResponse {
    pub fn with_retry_after(mut self, value: &str) -> Self {
        self.retry_after = Some(value.to_string());
        self
    }
}

/// Replays canned responses in order and records every request.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Rc<RefCell<VecDeque<RawResponse>>>,
    urls: Rc<RefCell<Vec<String>>>,
    tokens: Rc<RefCell<Vec<String>>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<RawResponse>) -> Self {
        Self {
            script: Rc::new(RefCell::new(script.into())),
            ..Default::default()
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.borrow().clone()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &str, headers: &HeaderMap) -> Result<RawResponse, RiotError> {
        self.urls.borrow_mut().push(url.to_string());
        if let Some(token) = headers.get("X-Riot-Token").and_then(|v| v.to_str().ok()) {
            self.tokens.borrow_mut().push(token.to_string());
        }
        self.script
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| RiotError::Transport(format!("no scripted response for {url}")))
    }
}

#[derive(Clone, Default)]
pub struct RecordingSleeper {
    calls: Rc<RefCell<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn calls(&self) -> Vec<Duration> {
        self.calls.borrow().clone()
    }

    pub fn total(&self) -> Duration {
        self.calls.borrow().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.calls.borrow_mut().push(duration);
    }
}

pub fn client_with(transport: &ScriptedTransport, sleeper: &RecordingSleeper) -> RiotClient {
    RiotClient::with_parts(
        &RiotConfig::new("test-key"),
        Box::new(transport.clone()),
        Box::new(sleeper.clone()),
    )
    .expect("valid test config")
    .with_base_urls("http://regional.test", "http://platform.test")
}

/// Match records keyed by id; unknown ids fail like a 404.
#[derive(Default)]
pub struct FakeMatches {
    records: HashMap<String, Value>,
    fetches: Cell<usize>,
}

impl FakeMatches {
    pub fn insert(&mut self, match_id: &str, record: Value) {
        self.records.insert(match_id.to_string(), record);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.get()
    }
}

impl MatchSource for FakeMatches {
    fn match_record(&self, match_id: &str) -> Result<Value, RiotError> {
        self.fetches.set(self.fetches.get() + 1);
        self.records
            .get(match_id)
            .cloned()
            .ok_or_else(|| RiotError::Api {
                status: 404,
                url: format!("fake://{match_id}"),
                body: "Data not found".to_string(),
            })
    }
}

/// Compact participant description for building match fixtures.
pub struct ParticipantSpec<'a> {
    pub team: i64,
    pub champ: i64,
    pub k: i64,
    pub d: i64,
    pub a: i64,
    pub win: bool,
    pub puuid: &'a str,
    pub position: &'a str,
}

pub fn participant(p: &ParticipantSpec) -> Value {
    json!({
        "puuid": p.puuid,
        "teamId": p.team,
        "championId": p.champ,
        "championName": format!("Champ{}", p.champ),
        "kills": p.k,
        "deaths": p.d,
        "assists": p.a,
        "win": p.win,
        "teamPosition": p.position,
    })
}

pub fn match_json(match_id: &str, participants: &[ParticipantSpec]) -> Value {
    json!({
        "metadata": { "matchId": match_id },
        "info": {
            "participants": participants.iter().map(participant).collect::<Vec<_>>(),
        }
    })
}

/// Two teams of five; team 100 wins when `blue_wins`. Champions are
/// `blue[i]` for team 100 and `red[i]` for team 200.
pub fn five_v_five(match_id: &str, blue: [i64; 5], red: [i64; 5], blue_wins: bool) -> Value {
    const ROLES: [&str; 5] = ["TOP", "JUNGLE", "MIDDLE", "BOTTOM", "UTILITY"];
    let mut list = Vec::new();
    for (i, champ) in blue.iter().enumerate() {
        list.push(ParticipantSpec {
            team: 100,
            champ: *champ,
            k: 2,
            d: 1,
            a: 3,
            win: blue_wins,
            puuid: BLUE_PUUIDS[i],
            position: ROLES[i],
        });
    }
    for (i, champ) in red.iter().enumerate() {
        list.push(ParticipantSpec {
            team: 200,
            champ: *champ,
            k: 1,
            d: 2,
            a: 1,
            win: !blue_wins,
            puuid: RED_PUUIDS[i],
            position: ROLES[i],
        });
    }
    match_json(match_id, &list)
}

pub const BLUE_PUUIDS: [&str; 5] = ["b0", "b1", "b2", "b3", "b4"];
pub const RED_PUUIDS: [&str; 5] = ["r0", "r1", "r2", "r3", "r4"];
