// crates/countrydb-core/src/http/mod.rs

//! # Live Collaborators
//!
//! reqwest-backed implementations of the [`crate::source`] traits. All
//! clients share one connection pool built by [`build_client`]; clone the
//! [`reqwest::Client`] freely, it is reference-counted.
//!
//! Every client takes its base URL from a constructor argument so it can be
//! pointed at a mirror or a local stub.

mod openweather;
mod restcountries;
mod unsplash;
mod wikipedia;

pub use openweather::OpenWeatherClient;
pub use restcountries::RestCountriesClient;
pub use unsplash::UnsplashClient;
pub use wikipedia::WikipediaClient;

use crate::aggregate::DetailAggregator;
use crate::config::Config;
use crate::error::{CountryDbError, Result};
use url::Url;

/// The aggregator wired to the four live services.
pub type LiveAggregator =
    DetailAggregator<RestCountriesClient, OpenWeatherClient, WikipediaClient, UnsplashClient>;

/// Shared client with the configured timeout and user agent.
pub fn build_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.http_timeout)
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(CountryDbError::from)
}

/// Builds a [`LiveAggregator`] from one configuration.
pub fn live_aggregator(config: &Config) -> Result<LiveAggregator> {
    let client = build_client(config)?;
    Ok(DetailAggregator::new(
        RestCountriesClient::new(client.clone())?,
        OpenWeatherClient::new(client.clone(), config.openweather_api_key.clone())?,
        WikipediaClient::new(client.clone())?,
        UnsplashClient::new(client, config.unsplash_access_key.clone())?,
    ))
}

/// Parses a base URL, forcing a trailing slash so `join` appends.
fn parse_base(base: &str) -> Result<Url> {
    let mut base = base.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base).map_err(|e| CountryDbError::InvalidInput(format!("base url {base:?}: {e}")))
}

/// `base` with `segments` appended, each percent-encoded as one segment.
fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
