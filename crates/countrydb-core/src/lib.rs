// crates/countrydb-core/src/lib.rs

//! # countrydb-core
//!
//! The state machines behind a country explorer:
//!
//! - [`query`]: the URL parameter codec for the list view (`?query=fra&page=2`)
//! - [`pipeline`]: filter -> filter -> sort -> paginate over the country list
//! - [`debounce`]: the search-box synchronizer that commits after a quiet period
//! - [`aggregate`]: the detail-page fan-out with settle-all auxiliaries
//!
//! Everything that talks to the outside world (REST Countries, OpenWeather,
//! Wikipedia, Unsplash, favorites storage, geolocation) sits behind a trait in
//! [`source`], [`favorites`] or [`geolocation`]. Live HTTP implementations
//! live in [`http`] behind the `http` feature.
//!
//! ```rust
//! use countrydb_core::prelude::*;
//!
//! let config = Config::default();
//! let state = decode("?query=fra&page=2", &config);
//! assert_eq!(state.search_text, "fra");
//! assert_eq!(state.page, 2);
//!
//! let href = encode("?query=fra&page=2", &[QueryUpdate::Page(1)], &config);
//! assert_eq!(href, "?query=fra");
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod debounce;
pub mod detail;
pub mod error;
pub mod favorites;
pub mod gate;
pub mod geo;
pub mod geolocation;
#[cfg(feature = "http")]
pub mod http;
pub mod model;
pub mod pipeline;
pub mod query;
#[doc(hidden)]
pub mod raw;
pub mod source;
pub mod text;

pub mod prelude;

// Re-exports
pub use crate::config::Config;
pub use crate::error::{CountryDbError, Result};
pub use crate::model::{
    AggregateResult, Auxiliaries, Coordinate, CoordinateSource, Country, ImageSet, Summary,
    UserLocation, Weather,
};
pub use crate::pipeline::{list_view, ListView};
pub use crate::query::{decode, encode, QueryState, QueryUpdate, RegionFilter};
