use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::patterns::WageThresholds;

const DEFAULT_FILE: &str = "duck_jobs";
const ENV_PREFIX: &str = "DUCK_JOBS";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub wage: WageThresholds,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub endpoint: String,
    /// DuckDuckGo region code (`kl`).
    pub region: String,
    pub safesearch: SafeSearch,
    pub user_agent: String,
    /// Pause between result-page requests.
    pub request_delay_ms: u64,
    pub timeout_secs: u64,
    /// Upper bound on result pages fetched per query.
    pub max_pages: usize,
    pub exclude_blocked: bool,
    pub blocked_domains: Vec<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            endpoint: "https://html.duckduckgo.com/html/".to_string(),
            region: "th-th".to_string(),
            safesearch: SafeSearch::Off,
            user_agent: concat!("duck_jobs/", env!("CARGO_PKG_VERSION")).to_string(),
            request_delay_ms: 50,
            timeout_secs: 20,
            max_pages: 10,
            exclude_blocked: false,
            blocked_domains: [
                "facebook.com",
                "m.facebook.com",
                "web.facebook.com",
                "fb.com",
                "fb.me",
                "instagram.com",
            ]
            .iter()
            .map(|d| d.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SafeSearch {
    #[default]
    Off,
    Moderate,
    Strict,
}

impl SafeSearch {
    /// Value of DuckDuckGo's `kp` form field.
    pub fn as_kp(&self) -> &'static str {
        match self {
            SafeSearch::Off => "-2",
            SafeSearch::Moderate => "-1",
            SafeSearch::Strict => "1",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub dir: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            dir: PathBuf::from("."),
        }
    }
}

/// Defaults, then `duck_jobs.toml` (or `path`), then `DUCK_JOBS__*` env vars.
pub fn load(path: Option<&Path>) -> Result<Settings> {
    let file = match path {
        Some(p) => File::from(p).required(true),
        None => File::with_name(DEFAULT_FILE).required(false),
    };
    let settings = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;
    Ok(settings)
}
