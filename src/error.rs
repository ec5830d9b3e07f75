use thiserror::Error;

/// Problems detected before any request is sent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please set the RIOT_API_KEY environment variable.")]
    MissingApiKey,
    #[error("API key is not a valid header value")]
    InvalidHeader,
}

/// Failures of a single call against the Riot API.
#[derive(Debug, Error)]
pub enum RiotError {
    #[error("Request to {url} failed with status {status}: {body}")]
    Api {
        status: u16,
        url: String,
        body: String,
    },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Unexpected response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid URL: {0}")]
    Url(String),
}

impl RiotError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            RiotError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("match has no participants on team {0}")]
    MissingTeam(i64),
    #[error("malformed match record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Why a single match could not become a row.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error(transparent)]
    Fetch(#[from] RiotError),
    #[error(transparent)]
    Extract(#[from] FeatureError),
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Parquet error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
