use std::env;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CHROME_PATH: &str = "/usr/bin/google-chrome";
const DEFAULT_FETCH_CONCURRENCY: usize = 64;

const LOGIN_URL: &str = "https://leetify.com/login";
const MATCH_LIST_URL: &str = "https://leetify.com/app/matches/list";
const STATS_API_BASE: &str = "https://api.leetify.com";

/// Default allow-list of tracked steam64 ids, overridable via
/// `TRACKED_STEAM_IDS`.
const DEFAULT_TRACKED_STEAM_IDS: [&str; 2] = ["76561198002392306", "76561198040886804"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Selects the browser launch preset. `Production` targets restricted
/// containers where Chrome needs extra flags to run at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    Production,
    Development,
}

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub mode: DeploymentMode,
    pub executable_path: Option<String>,
}

impl BrowserOptions {
    pub fn chrome_executable(&self) -> &str {
        self.executable_path.as_deref().unwrap_or(DEFAULT_CHROME_PATH)
    }
}

/// URLs the scrape pipeline talks to. `api_base` is configurable so the
/// stats fetcher can be pointed at a local server in tests.
#[derive(Debug, Clone)]
pub struct ScrapeTarget {
    pub login_url: String,
    pub match_list_url: String,
    pub api_base: String,
}

impl Default for ScrapeTarget {
    fn default() -> Self {
        Self {
            login_url: LOGIN_URL.to_string(),
            match_list_url: MATCH_LIST_URL.to_string(),
            api_base: STATS_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub browser: BrowserOptions,
    pub credentials: Credentials,
    pub target: ScrapeTarget,
    pub tracked_steam_ids: Vec<String>,
    pub fetch_concurrency: usize,
    pub fetch_retries: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or(&get, "PORT", DEFAULT_PORT)?;

        let mode = match get("APP_ENV").as_deref() {
            Some("production") => DeploymentMode::Production,
            _ => DeploymentMode::Development,
        };

        let credentials = Credentials {
            email: get("LEETIFY_EMAIL").ok_or(ConfigError::Missing("LEETIFY_EMAIL"))?,
            password: get("LEETIFY_PASSWORD").ok_or(ConfigError::Missing("LEETIFY_PASSWORD"))?,
        };

        let tracked_steam_ids = match get("TRACKED_STEAM_IDS") {
            Some(raw) => {
                let ids: Vec<String> = raw
                    .split(',')
                    .map(|id| id.trim().to_string())
                    .filter(|id| !id.is_empty())
                    .collect();
                if ids.is_empty() {
                    return Err(ConfigError::Invalid {
                        name: "TRACKED_STEAM_IDS",
                        value: raw,
                    });
                }
                ids
            }
            None => DEFAULT_TRACKED_STEAM_IDS
                .iter()
                .map(|id| id.to_string())
                .collect(),
        };

        Ok(Self {
            port,
            browser: BrowserOptions {
                mode,
                executable_path: get("CHROME_EXECUTABLE_PATH"),
            },
            credentials,
            target: ScrapeTarget::default(),
            tracked_steam_ids,
            fetch_concurrency: parse_or(&get, "FETCH_CONCURRENCY", DEFAULT_FETCH_CONCURRENCY)?,
            fetch_retries: parse_or(&get, "FETCH_RETRIES", 0)?,
        })
    }
}

fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}
