// crates/countrydb-core/src/config.rs

//! # Configuration
//!
//! Constants used as defaults, plus [`Config`], the runtime knobs. Credentials
//! are read from the environment by [`Config::from_env`]; the CLI layers its
//! own flags on top.

use std::path::PathBuf;
use std::time::Duration;

/// Page size used when `pageSize` is absent from the query string.
pub const DEFAULT_PAGE_SIZE: u32 = 15;

/// Quiet period after the last keystroke before a search is committed.
pub const DEBOUNCE_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Mean earth radius used by the haversine distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Upper bound on images requested for a detail page.
pub const MAX_IMAGES: usize = 3;

/// How long an on-disk country catalog stays fresh.
pub const CATALOG_MAX_AGE: Duration = Duration::from_secs(10 * 60);

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_USER_AGENT: &str = concat!("countrydb/", env!("CARGO_PKG_VERSION"));

/// Sentinel for "no region filter" in the query string.
pub const ALL_REGIONS: &str = "All";

/// Region labels offered by the region filter, in display order.
pub const REGIONS: &[&str] = &[
    ALL_REGIONS,
    "Africa",
    "Americas",
    "Asia",
    "Europe",
    "Oceania",
    "Antarctic",
];

// Credential environment variables
pub const OPENWEATHER_API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const UNSPLASH_ACCESS_KEY_ENV: &str = "UNSPLASH_ACCESS_KEY";
pub const CATALOG_CACHE_ENV: &str = "COUNTRYDB_CACHE";

/// Runtime configuration shared by the codec, the synchronizer and the
/// HTTP collaborators.
#[derive(Debug, Clone)]
pub struct Config {
    /// `pageSize` value that is elided from the query string.
    pub default_page_size: u32,
    pub debounce: Duration,
    pub http_timeout: Duration,
    pub user_agent: String,
    pub openweather_api_key: Option<String>,
    pub unsplash_access_key: Option<String>,
    /// Where the catalog cache lives; `None` disables caching.
    pub catalog_cache: Option<PathBuf>,
    pub catalog_max_age: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            debounce: DEBOUNCE_QUIET_PERIOD,
            http_timeout: HTTP_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            openweather_api_key: None,
            unsplash_access_key: None,
            catalog_cache: None,
            catalog_max_age: CATALOG_MAX_AGE,
        }
    }
}

impl Config {
    /// Defaults plus whatever credentials and cache path the environment holds.
    ///
    /// Empty variables count as unset.
    pub fn from_env() -> Self {
        Self {
            openweather_api_key: non_empty_env(OPENWEATHER_API_KEY_ENV),
            unsplash_access_key: non_empty_env(UNSPLASH_ACCESS_KEY_ENV),
            catalog_cache: non_empty_env(CATALOG_CACHE_ENV).map(PathBuf::from),
            ..Self::default()
        }
    }

    /// Overrides the page size that gets elided. Zero is ignored.
    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        if page_size > 0 {
            self.default_page_size = page_size;
        }
        self
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
