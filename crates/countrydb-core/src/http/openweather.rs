// crates/countrydb-core/src/http/openweather.rs

use super::{endpoint, parse_base};
use crate::config::OPENWEATHER_API_KEY_ENV;
use crate::error::{CountryDbError, Result};
use crate::model::{Coordinate, Weather};
use crate::raw::WeatherRaw;
use crate::source::WeatherSource;
use log::debug;
use url::Url;

pub const OPENWEATHER_BASE: &str = "https://api.openweathermap.org/data/3.0";

/// OpenWeather One Call 3.0, current conditions only, metric units.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base: Url,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Result<Self> {
        Self::with_base_url(client, api_key, OPENWEATHER_BASE)
    }

    pub fn with_base_url(
        client: reqwest::Client,
        api_key: Option<String>,
        base: &str,
    ) -> Result<Self> {
        Ok(Self {
            client,
            base: parse_base(base)?,
            api_key,
        })
    }

    /// Request URL without the `appid` parameter (safe to log).
    pub fn onecall_url(&self, at: Coordinate) -> Url {
        let mut url = endpoint(&self.base, &["onecall"]);
        url.query_pairs_mut()
            .append_pair("lat", &at.lat.to_string())
            .append_pair("lon", &at.lon.to_string())
            .append_pair("units", "metric")
            .append_pair("exclude", "minutely,hourly,daily,alerts");
        url
    }
}

impl WeatherSource for OpenWeatherClient {
    async fn current_weather(&self, at: Coordinate) -> Result<Weather> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(CountryDbError::MissingCredential(OPENWEATHER_API_KEY_ENV));
        };
        let mut url = self.onecall_url(at);
        debug!("GET {url}");
        url.query_pairs_mut().append_pair("appid", key);

        let raw: WeatherRaw = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(redact)?
            .json()
            .await
            .map_err(redact)?;
        Ok(raw.into())
    }
}

// The request URL carries the API key.
fn redact(err: reqwest::Error) -> CountryDbError {
    CountryDbError::UpstreamUnavailable(err.without_url().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_carries_metric_units() {
        let client = OpenWeatherClient::new(reqwest::Client::new(), None).unwrap();
        let url = client.onecall_url(Coordinate::new(48.87, 2.33));
        assert_eq!(
            url.as_str(),
            "https://api.openweathermap.org/data/3.0/onecall?lat=48.87&lon=2.33&units=metric&exclude=minutely%2Chourly%2Cdaily%2Calerts"
        );
    }

    #[tokio::test]
    async fn missing_key_fails_every_call() {
        let client = OpenWeatherClient::new(reqwest::Client::new(), None).unwrap();
        for _ in 0..2 {
            let err = client
                .current_weather(Coordinate::new(0.0, 0.0))
                .await
                .unwrap_err();
            assert!(err.is_configuration());
            assert!(err.to_string().contains(OPENWEATHER_API_KEY_ENV));
        }
    }
}
