// crates/countrydb-core/src/source.rs

//! Collaborator contracts consumed by the catalog and the detail aggregator.
//!
//! Live implementations are in [`crate::http`]; tests use in-memory fakes.
//! The futures are `Send` so callers may spawn them on a multi-threaded
//! runtime.

use crate::error::Result;
use crate::model::{Coordinate, Country, ImageSet, Summary, Weather};
use std::future::Future;

/// Country records by key, and the full list.
pub trait CountrySource: Send + Sync {
    /// Looks a country up by cca3 (or cca2). Missing -> `EntityNotFound`.
    fn country(&self, key: &str) -> impl Future<Output = Result<Country>> + Send;

    fn countries(&self) -> impl Future<Output = Result<Vec<Country>>> + Send;
}

/// Current conditions at a coordinate.
///
/// Implementations that need a credential return `MissingCredential` when it
/// is not configured, on every call.
pub trait WeatherSource: Send + Sync {
    fn current_weather(&self, at: Coordinate) -> impl Future<Output = Result<Weather>> + Send;
}

/// Encyclopedia summary by title. `Ok(None)` when there is no article.
pub trait SummarySource: Send + Sync {
    fn summary(&self, title: &str) -> impl Future<Output = Result<Option<Summary>>> + Send;
}

/// Free-text image search, at most [`crate::config::MAX_IMAGES`] results.
pub trait ImageSource: Send + Sync {
    fn images(&self, query: &str) -> impl Future<Output = Result<ImageSet>> + Send;
}

// Shared references delegate, so one client can back several aggregators.

impl<T: CountrySource> CountrySource for &T {
    fn country(&self, key: &str) -> impl Future<Output = Result<Country>> + Send {
        (**self).country(key)
    }

    fn countries(&self) -> impl Future<Output = Result<Vec<Country>>> + Send {
        (**self).countries()
    }
}

impl<T: WeatherSource> WeatherSource for &T {
    fn current_weather(&self, at: Coordinate) -> impl Future<Output = Result<Weather>> + Send {
        (**self).current_weather(at)
    }
}

impl<T: SummarySource> SummarySource for &T {
    fn summary(&self, title: &str) -> impl Future<Output = Result<Option<Summary>>> + Send {
        (**self).summary(title)
    }
}

impl<T: ImageSource> ImageSource for &T {
    fn images(&self, query: &str) -> impl Future<Output = Result<ImageSet>> + Send {
        (**self).images(query)
    }
}
