// Shared fixtures for the integration tests.
#![allow(dead_code)]

use countrydb_core::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn country(code: &str, name: &str, region: &str, capital: (f64, f64)) -> Country {
    Country::new(code, name, region)
        .with_population(1_000_000)
        .with_capital(format!("{name} City"), capital.0, capital.1)
}

/// A small world: enough for two pages at page size 5.
pub fn world() -> Vec<Country> {
    vec![
        country("FRA", "France", "Europe", (48.87, 2.33)),
        country("DEU", "Germany", "Europe", (52.52, 13.40)),
        country("ESP", "Spain", "Europe", (40.40, -3.68)),
        country("GBR", "United Kingdom", "Europe", (51.50, -0.08)),
        country("JPN", "Japan", "Asia", (35.68, 139.75)),
        country("BRA", "Brazil", "Americas", (-15.79, -47.88)),
        country("USA", "United States", "Americas", (38.90, -77.04)),
        country("ZAF", "South Africa", "Africa", (-25.70, 28.22)),
        country("AUS", "Australia", "Oceania", (-35.27, 149.13)),
        Country::new("ATA", "Antarctica", "Antarctic"),
    ]
}

pub struct Countries {
    pub list: Vec<Country>,
    /// Per-key artificial latency.
    pub delays: Vec<(&'static str, Duration)>,
}

impl Countries {
    pub fn new(list: Vec<Country>) -> Self {
        Self {
            list,
            delays: Vec::new(),
        }
    }
}

impl CountrySource for Countries {
    async fn country(&self, key: &str) -> Result<Country> {
        if let Some((_, delay)) = self.delays.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            tokio::time::sleep(*delay).await;
        }
        self.list
            .iter()
            .find(|c| c.matches_code(key))
            .cloned()
            .ok_or_else(|| CountryDbError::EntityNotFound(key.to_string()))
    }

    async fn countries(&self) -> Result<Vec<Country>> {
        Ok(self.list.clone())
    }
}

#[derive(Default)]
pub struct Weathers {
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl WeatherSource for Weathers {
    async fn current_weather(&self, at: Coordinate) -> Result<Weather> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CountryDbError::UpstreamUnavailable("timeout".into()));
        }
        Ok(Weather {
            temp: at.lat / 2.0,
            humidity: 50.0,
            wind_speed: 1.0,
            conditions: Vec::new(),
        })
    }
}

#[derive(Default)]
pub struct Summaries {
    pub missing: bool,
}

impl SummarySource for Summaries {
    async fn summary(&self, title: &str) -> Result<Option<Summary>> {
        if self.missing {
            return Ok(None);
        }
        Ok(Some(Summary {
            title: title.to_string(),
            extract: format!("{title} has a summary."),
            thumbnail: None,
        }))
    }
}

/// Image search that always lacks its credential.
pub struct NoImages;

impl ImageSource for NoImages {
    async fn images(&self, _query: &str) -> Result<ImageSet> {
        Err(CountryDbError::MissingCredential("UNSPLASH_ACCESS_KEY"))
    }
}
