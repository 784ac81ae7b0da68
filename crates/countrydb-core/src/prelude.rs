// crates/countrydb-core/src/prelude.rs

//! One-stop import for applications: `use countrydb_core::prelude::*;`

pub use crate::aggregate::{DetailAggregator, DetailRequest};
pub use crate::catalog::Catalog;
pub use crate::config::Config;
pub use crate::debounce::{DebouncedSearch, SearchSynchronizer, SyncState};
pub use crate::detail::{DetailView, Gallery};
pub use crate::error::{CountryDbError, Result};
pub use crate::favorites::{FavoritesStore, FileFavorites, MemoryFavorites};
pub use crate::gate::{GenerationGate, LatestAggregator, Ticket};
pub use crate::geo::{distance, distance_between, parse_coordinate};
pub use crate::geolocation::{FixedLocator, Geolocator};
pub use crate::model::{
    AggregateResult, Auxiliaries, Coordinate, CoordinateSource, Country, ImageSet, Summary,
    UserLocation, Weather,
};
pub use crate::pipeline::{list_view, ListPipeline, ListView};
pub use crate::query::{
    decode, encode, encode_state, page_window, ListAction, MemoryNavigator, Navigator,
    QueryState, QueryUpdate,
    RegionFilter,
};
pub use crate::source::{CountrySource, ImageSource, SummarySource, WeatherSource};
pub use crate::text::TextMatch;
