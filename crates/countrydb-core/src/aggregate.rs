// crates/countrydb-core/src/aggregate.rs

//! # Detail Aggregator
//!
//! Builds one [`AggregateResult`] for a detail page:
//!
//! 1. fetch the primary country (failure aborts everything)
//! 2. resolve a coordinate: explicit hint -> capital -> centroid -> none
//! 3. weather (only with a coordinate), summary and images, concurrently,
//!    each outcome kept independently (settle-all, no fail-fast, no retry)
//! 4. merge
//!
//! The aggregator keeps no state between calls and caches nothing.

use crate::error::{CountryDbError, Result};
use crate::model::{AggregateResult, Auxiliaries, Coordinate, CoordinateSource, Country};
use crate::source::{CountrySource, ImageSource, SummarySource, WeatherSource};
use log::{debug, error, warn};

/// Route parameters of a detail page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetailRequest {
    /// cca3 (or cca2) from the route.
    pub key: String,
    /// Coordinate propagated from the list page, tried first.
    pub coordinate_hint: Option<Coordinate>,
    /// Display name propagated from the list page; keys the summary and
    /// image lookups when present.
    pub name_hint: Option<String>,
}

impl DetailRequest {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_coordinate(mut self, hint: Coordinate) -> Self {
        self.coordinate_hint = Some(hint);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name_hint = Some(name.into());
        self
    }
}

/// First candidate of the fallback chain whose components are both finite.
pub fn resolve_coordinate(
    hint: Option<Coordinate>,
    country: &Country,
) -> (Option<Coordinate>, CoordinateSource) {
    let candidates = [
        (hint, CoordinateSource::Explicit),
        (country.capital_latlng, CoordinateSource::Capital),
        (country.latlng, CoordinateSource::Centroid),
    ];
    candidates
        .into_iter()
        .find_map(|(coordinate, source)| {
            coordinate
                .and_then(Coordinate::finite)
                .map(|c| (Some(c), source))
        })
        .unwrap_or((None, CoordinateSource::None))
}

/// Fan-out over the four detail-page collaborators.
#[derive(Debug, Clone)]
pub struct DetailAggregator<C, W, S, I> {
    countries: C,
    weather: W,
    summaries: S,
    images: I,
}

impl<C, W, S, I> DetailAggregator<C, W, S, I>
where
    C: CountrySource,
    W: WeatherSource,
    S: SummarySource,
    I: ImageSource,
{
    pub fn new(countries: C, weather: W, summaries: S, images: I) -> Self {
        Self {
            countries,
            weather,
            summaries,
            images,
        }
    }

    /// Shorthand for `aggregate(&DetailRequest::new(key))`.
    pub async fn aggregate_key(&self, key: &str) -> Result<AggregateResult> {
        self.aggregate(&DetailRequest::new(key)).await
    }

    /// Fails only when the primary lookup fails.
    pub async fn aggregate(&self, request: &DetailRequest) -> Result<AggregateResult> {
        let primary = self.countries.country(&request.key).await?;

        let (resolved_coordinate, coordinate_source) =
            resolve_coordinate(request.coordinate_hint, &primary);
        debug!(
            "{}: weather coordinate from {} tier",
            primary.code,
            coordinate_source.as_str()
        );

        let title = request
            .name_hint
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(primary.name.as_str());

        let weather = async {
            match resolved_coordinate {
                Some(at) => {
                    settle("weather", &primary.code, self.weather.current_weather(at).await)
                }
                None => None,
            }
        };
        let summary = async {
            settle("summary", &primary.code, self.summaries.summary(title).await).flatten()
        };
        let images = async {
            settle("images", &primary.code, self.images.images(title).await)
                .filter(|set| !set.is_empty())
        };

        // All three run to completion whatever the others do.
        let (weather, summary, images) = tokio::join!(weather, summary, images);

        Ok(AggregateResult {
            primary,
            auxiliaries: Auxiliaries {
                weather,
                summary,
                images,
            },
            resolved_coordinate,
            coordinate_source,
        })
    }
}

/// Turns one auxiliary outcome into presence/absence, logging the cause.
fn settle<T>(what: &str, code: &str, outcome: Result<T>) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(err @ CountryDbError::MissingCredential(_)) => {
            error!("{code}: {what} disabled: {err}");
            None
        }
        Err(err) => {
            warn!("{code}: {what} unavailable: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Image, ImageSet, Summary, Weather};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    struct Countries(Vec<Country>);

    impl CountrySource for Countries {
        async fn country(&self, key: &str) -> Result<Country> {
            self.0
                .iter()
                .find(|c| c.matches_code(key))
                .cloned()
                .ok_or_else(|| CountryDbError::EntityNotFound(key.to_string()))
        }

        async fn countries(&self) -> Result<Vec<Country>> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct FakeWeather {
        fail: bool,
        calls: AtomicUsize,
        seen: Mutex<Vec<Coordinate>>,
    }

    impl WeatherSource for FakeWeather {
        async fn current_weather(&self, at: Coordinate) -> Result<Weather> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(at);
            if self.fail {
                return Err(CountryDbError::UpstreamUnavailable("connection reset".into()));
            }
            Ok(Weather {
                temp: 18.5,
                humidity: 60.0,
                wind_speed: 3.2,
                conditions: Vec::new(),
            })
        }
    }

    #[derive(Default)]
    struct FakeSummaries {
        delay: Option<Duration>,
        titles: Mutex<Vec<String>>,
    }

    impl SummarySource for FakeSummaries {
        async fn summary(&self, title: &str) -> Result<Option<Summary>> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.titles.lock().unwrap().push(title.to_string());
            Ok(Some(Summary {
                title: title.to_string(),
                extract: format!("{title} is a country."),
                thumbnail: None,
            }))
        }
    }

    struct FakeImages {
        fail: bool,
    }

    impl ImageSource for FakeImages {
        async fn images(&self, query: &str) -> Result<ImageSet> {
            if self.fail {
                return Err(CountryDbError::MissingCredential("UNSPLASH_ACCESS_KEY"));
            }
            Ok(ImageSet {
                images: vec![Image {
                    id: "1".into(),
                    url: format!("https://img/{query}"),
                    thumb_url: String::new(),
                    alt: None,
                    author: "Ann".into(),
                    author_username: "ann".into(),
                }],
                total: 1,
            })
        }
    }

    fn france() -> Country {
        Country::new("FRA", "France", "Europe")
            .with_latlng(46.0, 2.0)
            .with_capital("Paris", 48.87, 2.33)
    }

    fn aggregator(
        weather: FakeWeather,
        images_fail: bool,
    ) -> DetailAggregator<Countries, FakeWeather, FakeSummaries, FakeImages> {
        DetailAggregator::new(
            Countries(vec![
                france(),
                Country::new("ATA", "Antarctica", "Antarctic"),
                Country::new("ESP", "Spain", "Europe").with_latlng(40.0, -4.0),
            ]),
            weather,
            FakeSummaries::default(),
            FakeImages { fail: images_fail },
        )
    }

    #[tokio::test]
    async fn weather_failure_degrades_only_weather() {
        let agg = aggregator(FakeWeather { fail: true, ..Default::default() }, false);
        let result = agg.aggregate_key("FRA").await.unwrap();
        assert!(result.auxiliaries.weather.is_none());
        assert!(result.auxiliaries.summary.is_some());
        assert!(result.auxiliaries.images.is_some());
        assert_eq!(result.primary.name, "France");
    }

    #[tokio::test]
    async fn image_failure_degrades_only_images() {
        let agg = aggregator(FakeWeather::default(), true);
        let result = agg.aggregate_key("FRA").await.unwrap();
        assert!(result.auxiliaries.weather.is_some());
        assert!(result.auxiliaries.summary.is_some());
        assert!(result.auxiliaries.images.is_none());
    }

    #[tokio::test]
    async fn missing_primary_aborts() {
        let agg = aggregator(FakeWeather::default(), false);
        let err = agg.aggregate_key("XXX").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(agg.weather.calls.load(Ordering::SeqCst), 0);
        assert!(agg.summaries.titles.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn capital_beats_centroid() {
        let agg = aggregator(FakeWeather::default(), false);
        let result = agg.aggregate_key("fra").await.unwrap();
        assert_eq!(result.coordinate_source, CoordinateSource::Capital);
        assert_eq!(result.resolved_coordinate, Some(Coordinate::new(48.87, 2.33)));
        assert_eq!(*agg.weather.seen.lock().unwrap(), vec![Coordinate::new(48.87, 2.33)]);
    }

    #[tokio::test]
    async fn explicit_hint_wins() {
        let agg = aggregator(FakeWeather::default(), false);
        let hint = Coordinate::new(43.3, 5.4);
        let request = DetailRequest::new("FRA").with_coordinate(hint);
        let result = agg.aggregate(&request).await.unwrap();
        assert_eq!(result.coordinate_source, CoordinateSource::Explicit);
        assert_eq!(result.resolved_coordinate, Some(hint));
    }

    #[tokio::test]
    async fn non_finite_hint_falls_through() {
        let agg = aggregator(FakeWeather::default(), false);
        let request = DetailRequest::new("ESP").with_coordinate(Coordinate::new(f64::NAN, 1.0));
        let result = agg.aggregate(&request).await.unwrap();
        assert_eq!(result.coordinate_source, CoordinateSource::Centroid);
    }

    #[tokio::test]
    async fn no_coordinate_skips_weather_entirely() {
        let agg = aggregator(FakeWeather::default(), false);
        let result = agg.aggregate_key("ATA").await.unwrap();
        assert_eq!(result.coordinate_source, CoordinateSource::None);
        assert_eq!(result.resolved_coordinate, None);
        assert!(result.auxiliaries.weather.is_none());
        assert_eq!(agg.weather.calls.load(Ordering::SeqCst), 0);
        assert!(result.auxiliaries.summary.is_some());
    }

    #[tokio::test]
    async fn name_hint_keys_the_text_lookups() {
        let agg = aggregator(FakeWeather::default(), false);
        let request = DetailRequest::new("FRA").with_name("French Republic");
        let result = agg.aggregate(&request).await.unwrap();
        assert_eq!(result.auxiliaries.summary.unwrap().title, "French Republic");

        let request = DetailRequest::new("FRA").with_name("  ");
        agg.aggregate(&request).await.unwrap();
        assert_eq!(agg.summaries.titles.lock().unwrap().last().unwrap(), "France");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_auxiliary_does_not_null_out_the_others() {
        let agg = DetailAggregator::new(
            Countries(vec![france()]),
            FakeWeather { fail: true, ..Default::default() },
            FakeSummaries {
                delay: Some(Duration::from_secs(5)),
                ..Default::default()
            },
            FakeImages { fail: false },
        );
        let result = agg.aggregate_key("FRA").await.unwrap();
        assert!(result.auxiliaries.summary.is_some());
        assert!(result.auxiliaries.images.is_some());
        assert!(result.auxiliaries.weather.is_none());
    }
}
