//! countrydb-cli
//! =============
//!
//! Command-line interface for the `countrydb-core` country explorer.
//!
//! This crate primarily provides a binary (`countrydb`). The library target
//! only exists so docs.rs renders this overview.
//!
//! Quick start
//! -----------
//!
//! ```text
//! countrydb --help
//! countrydb list --region Europe --page-size 10
//! countrydb country FRA
//! countrydb favorites add JPN
//! ```
//!
//! For programmatic access to the codec, the list pipeline and the detail
//! aggregator, use the [`countrydb-core`] crate directly.
//!
#![cfg_attr(docsrs, feature(doc_cfg))]

// The binary is the deliverable; no API here.
