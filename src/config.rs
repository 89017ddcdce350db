use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{anyhow, Result};
use log::info;

pub struct Config {
    pub api_url: String,
    pub geo_lookup_url: String,
    pub token_file: PathBuf,
    pub http_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timeout_secs: u64 = try_load(&lookup, "VOTING_HTTP_TIMEOUT_SECS", "15")?;
        Ok(Self {
            api_url: try_load::<String>(&lookup, "VOTING_API_URL", "http://localhost:8000")?
                .trim_end_matches('/')
                .to_owned(),
            geo_lookup_url: try_load(&lookup, "VOTING_GEO_URL", "http://ip-api.com/json")?,
            token_file: try_load(&lookup, "VOTING_TOKEN_FILE", "voting_tokens.json")?,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T>
where
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| anyhow!("Invalid {key} value: {e}"))
}
