//! Riot match-history ingestion and team feature extraction for a
//! win/loss classifier.

pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod history;
pub mod player_stats;
pub mod riot_api;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::RiotConfig;
pub use dataset::{DatasetReport, FeatureTable, MatchFailure, MatchOutcome, build_dataset};
pub use error::{ConfigError, DatasetError, FeatureError, MatchError, RiotError};
pub use features::{FeatureRow, MatchRecord, extract};
pub use history::fetch_history;
pub use riot_api::{MatchSource, ResolvedPlayer, RiotClient, resolve_player};
