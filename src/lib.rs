//! Workspace facade: re-exports `countrydb-core` so the demos can
//! `use countrydb_rs::prelude::*`.

pub use countrydb_core::*;
