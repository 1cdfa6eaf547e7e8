use std::env;
use std::time::Duration;

use crate::error::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub http_timeout_secs: u64,
    pub unread_poll_interval_secs: u64,
    pub dropdown_page_size: u32,
    pub notifications_page_size: u32,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Self::from_env_with_base_url(None)
    }

    /// Like [`Config::from_env`], but `base_url` wins over `API_BASE_URL`.
    /// The remaining settings still come from the environment.
    pub fn from_env_with_base_url(base_url: Option<String>) -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(base_url, |key| env::var(key).ok())
    }

    fn from_lookup<F>(base_url: Option<String>, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = base_url
            .or_else(|| lookup("API_BASE_URL"))
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AppError::Config("API_BASE_URL is not set".to_string()))?;

        Ok(Config {
            api_base_url,
            api_token: lookup("API_TOKEN").filter(|t| !t.is_empty()),
            http_timeout_secs: parse_or(&lookup, "HTTP_TIMEOUT_SECS", 30),
            unread_poll_interval_secs: parse_or(&lookup, "UNREAD_POLL_INTERVAL_SECS", 30),
            dropdown_page_size: parse_or(&lookup, "DROPDOWN_PAGE_SIZE", 10),
            notifications_page_size: parse_or(&lookup, "NOTIFICATIONS_PAGE_SIZE", 20),
        })
    }

    /// Defaults for everything except the base URL.
    pub fn with_base_url(api_base_url: impl Into<String>) -> Self {
        Config {
            api_base_url: api_base_url.into(),
            api_token: None,
            http_timeout_secs: 30,
            unread_poll_interval_secs: 30,
            dropdown_page_size: 10,
            notifications_page_size: 20,
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn unread_poll_interval(&self) -> Duration {
        Duration::from_secs(self.unread_poll_interval_secs.max(1))
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
