use crate::error::ConfigError;
use std::env;

pub const API_KEY_VAR: &str = "RIOT_API_KEY";
pub const REGION_VAR: &str = "RIOT_REGION";
pub const PLATFORM_VAR: &str = "RIOT_PLATFORM";

pub const DEFAULT_REGION: &str = "americas";
pub const DEFAULT_PLATFORM: &str = "na1";

/// Credential and routing used by a [`crate::riot_api::RiotClient`].
///
/// Account and match endpoints are served from the regional route
/// (`americas`, `europe`, ...), summoner endpoints from the platform
/// route (`na1`, `euw1`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiotConfig {
    pub api_key: String,
    pub regional_route: String,
    pub platform_route: String,
}

impl RiotConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            regional_route: DEFAULT_REGION.to_string(),
            platform_route: DEFAULT_PLATFORM.to_string(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key);

        if let Some(region) = non_blank(lookup(REGION_VAR)) {
            config.regional_route = region;
        }
        if let Some(platform) = non_blank(lookup(PLATFORM_VAR)) {
            config.platform_route = platform;
        }

        Ok(config)
    }

    pub fn with_region(mut self, region: Option<String>) -> Self {
        if let Some(region) = non_blank(region) {
            self.regional_route = region;
        }
        self
    }

    pub fn with_platform(mut self, platform: Option<String>) -> Self {
        if let Some(platform) = non_blank(platform) {
            self.platform_route = platform;
        }
        self
    }

    pub fn regional_base_url(&self) -> String {
        format!("https://{}.api.riotgames.com", self.regional_route)
    }

    pub fn platform_base_url(&self) -> String {
        format!("https://{}.api.riotgames.com", self.platform_route)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}
