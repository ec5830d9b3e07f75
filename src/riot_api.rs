use crate::config::RiotConfig;
use crate::error::{ConfigError, RiotError};
use log::{debug, warn};
use reqwest::{StatusCode, Url};
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::thread;
use std::time::Duration;

/// Largest page the match-v5 ids endpoint will serve.
pub const MAX_PAGE_SIZE: usize = 100;
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;
const TOKEN_HEADER: HeaderName = HeaderName::from_static("x-riot-token");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub puuid: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerResponse {
    pub puuid: String,
    #[serde(default)]
    pub account_id: Option<String>,
}

/// Result of the two identity lookups for a Riot ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlayer {
    pub puuid: String,
    pub account_id: Option<String>,
}

/// Status, `Retry-After` header and body of one HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub retry_after: Option<String>,
    pub body: String,
}

pub trait Transport {
    fn get(&self, url: &str, headers: &HeaderMap) -> Result<RawResponse, RiotError>;
}

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str, headers: &HeaderMap) -> Result<RawResponse, RiotError> {
        let response = self
            .client
            .get(url)
            .headers(headers.clone())
            .send()
            .map_err(|err| RiotError::Transport(err.to_string()))?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let body = response
            .text()
            .map_err(|err| RiotError::Transport(err.to_string()))?;

        Ok(RawResponse {
            status,
            retry_after,
            body,
        })
    }
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Anything that can hand out the raw JSON of a match by id.
pub trait MatchSource {
    fn match_record(&self, match_id: &str) -> Result<Value, RiotError>;
}

fn build_headers(config: &RiotConfig) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        TOKEN_HEADER,
        HeaderValue::from_str(&config.api_key).map_err(|_| ConfigError::InvalidHeader)?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(headers)
}

pub struct RiotClient {
    transport: Box<dyn Transport>,
    sleeper: Box<dyn Sleeper>,
    headers: HeaderMap,
    regional_base: String,
    platform_base: String,
}

impl RiotClient {
    pub fn new(config: &RiotConfig) -> Result<Self, ConfigError> {
        Self::with_parts(
            config,
            Box::new(ReqwestTransport::new()),
            Box::new(ThreadSleeper),
        )
    }

    pub fn with_parts(
        config: &RiotConfig,
        transport: Box<dyn Transport>,
        sleeper: Box<dyn Sleeper>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            transport,
            sleeper,
            headers: build_headers(config)?,
            regional_base: config.regional_base_url(),
            platform_base: config.platform_base_url(),
        })
    }

    pub fn with_base_urls(mut self, regional: &str, platform: &str) -> Self {
        self.regional_base = regional.to_string();
        self.platform_base = platform.to_string();
        self
    }

    pub fn get_account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountResponse, RiotError> {
        let url = endpoint(
            &self.regional_base,
            &["riot", "account", "v1", "accounts", "by-riot-id", game_name, tag_line],
            &[],
        )?;

        self.get_json(&url)
    }

    pub fn get_summoner_by_puuid(&self, puuid: &str) -> Result<SummonerResponse, RiotError> {
        let url = endpoint(
            &self.platform_base,
            &["lol", "summoner", "v4", "summoners", "by-puuid", puuid],
            &[],
        )?;

        self.get_json(&url)
    }

    /// One page of match ids, most recent first.
    pub fn get_match_ids_page(
        &self,
        puuid: &str,
        start: usize,
        count: usize,
    ) -> Result<Vec<String>, RiotError> {
        let url = endpoint(
            &self.regional_base,
            &["lol", "match", "v5", "matches", "by-puuid", puuid, "ids"],
            &[("start", start), ("count", count.min(MAX_PAGE_SIZE))],
        )?;

        self.get_json(&url)
    }

    pub fn get_match_json(&self, match_id: &str) -> Result<Value, RiotError> {
        let url = endpoint(
            &self.regional_base,
            &["lol", "match", "v5", "matches", match_id],
            &[],
        )?;

        self.get_json(&url)
    }

    /// GETs `url` and decodes the JSON body.
    ///
    /// A 429 is never surfaced: the client sleeps for the server's
    /// `Retry-After` plus one second and asks again, without limit. Any
    /// other non-200 status fails immediately.
    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RiotError> {
        let response = self.request_with_retry(url)?;
        serde_json::from_str(&response.body).map_err(|source| RiotError::Decode {
            url: url.to_string(),
            source,
        })
    }

    fn request_with_retry(&self, url: &str) -> Result<RawResponse, RiotError> {
        loop {
            debug!("GET {}", url);
            let response = self.transport.get(url, &self.headers)?;

            if response.status == StatusCode::TOO_MANY_REQUESTS {
                let wait = retry_wait(response.retry_after.as_deref());
                warn!("Rate limited on {}; retrying in {}s", url, wait.as_secs());
                self.sleeper.sleep(wait);
                continue;
            }

            if response.status != StatusCode::OK {
                return Err(RiotError::Api {
                    status: response.status.as_u16(),
                    url: url.to_string(),
                    body: response.body,
                });
            }

            return Ok(response);
        }
    }
}

impl MatchSource for RiotClient {
    fn match_record(&self, match_id: &str) -> Result<Value, RiotError> {
        self.get_match_json(match_id)
    }
}

fn endpoint(base: &str, segments: &[&str], query: &[(&str, usize)]) -> Result<String, RiotError> {
    let mut url = Url::parse(base).map_err(|err| RiotError::Url(err.to_string()))?;

    url.path_segments_mut()
        .map_err(|_| RiotError::Url(format!("{} cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(segments);

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, &value.to_string());
        }
    }

    Ok(url.to_string())
}

/// Cooldown for a throttled request: the server hint (default 1s) plus one.
fn retry_wait(retry_after: Option<&str>) -> Duration {
    let hint = retry_after
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

    Duration::from_secs(hint.saturating_add(1))
}

/// Riot ID -> PUUID -> summoner, in that order.
pub fn resolve_player(
    client: &RiotClient,
    game_name: &str,
    tag_line: &str,
) -> Result<ResolvedPlayer, RiotError> {
    let account = client.get_account_by_riot_id(game_name, tag_line)?;
    let summoner = client.get_summoner_by_puuid(&account.puuid)?;

    Ok(ResolvedPlayer {
        puuid: account.puuid,
        account_id: summoner.account_id,
    })
}
