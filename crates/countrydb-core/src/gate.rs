// crates/countrydb-core/src/gate.rs

//! Stale-response suppression.
//!
//! Rapid re-navigation can leave several aggregations (or geolocation
//! requests) in flight at once. Each request takes a [`Ticket`] when it
//! starts; when it finishes, its result is only used if no newer ticket has
//! been issued in the meantime.

use crate::aggregate::{DetailAggregator, DetailRequest};
use crate::error::{CountryDbError, Result};
use crate::geolocation::Geolocator;
use crate::model::{AggregateResult, UserLocation};
use crate::source::{CountrySource, ImageSource, SummarySource, WeatherSource};
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};

/// Generation number handed out by [`GenerationGate::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Monotonic generation counter.
#[derive(Debug, Default)]
pub struct GenerationGate {
    current: AtomicU64,
}

impl GenerationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation, superseding every earlier ticket.
    pub fn begin(&self) -> Ticket {
        Ticket(self.current.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current.load(Ordering::Acquire) == ticket.0
    }

    /// Passes `value` through if `ticket` is still current.
    pub fn admit<T>(&self, ticket: Ticket, value: T) -> Result<T> {
        if self.is_current(ticket) {
            Ok(value)
        } else {
            debug!("dropping result of superseded generation {}", ticket.0);
            Err(CountryDbError::Superseded)
        }
    }

    /// Invalidates all outstanding tickets without starting new work.
    pub fn invalidate(&self) {
        self.begin();
    }
}

/// [`DetailAggregator`] that only delivers the latest request's result.
///
/// Errors of superseded requests are swallowed into
/// [`CountryDbError::Superseded`] as well, so a late "not found" for an old
/// page cannot replace a newer page.
#[derive(Debug)]
pub struct LatestAggregator<C, W, S, I> {
    inner: DetailAggregator<C, W, S, I>,
    gate: GenerationGate,
}

impl<C, W, S, I> LatestAggregator<C, W, S, I>
where
    C: CountrySource,
    W: WeatherSource,
    S: SummarySource,
    I: ImageSource,
{
    pub fn new(inner: DetailAggregator<C, W, S, I>) -> Self {
        Self {
            inner,
            gate: GenerationGate::new(),
        }
    }

    pub async fn aggregate(&self, request: &DetailRequest) -> Result<AggregateResult> {
        let ticket = self.gate.begin();
        let outcome = self.inner.aggregate(request).await;
        if !self.gate.is_current(ticket) {
            debug!("detail request for {} superseded", request.key);
            return Err(CountryDbError::Superseded);
        }
        outcome
    }

    /// Abandons whatever is in flight, e.g. when the page is left.
    pub fn cancel(&self) {
        self.gate.invalidate();
    }
}

/// Geolocator wrapper applying the same rule to repeated "near me" clicks.
///
/// A failure of a superseded request is reported as
/// [`CountryDbError::Superseded`], not as the geolocation error.
#[derive(Debug)]
pub struct LatestLocator<G> {
    inner: G,
    gate: GenerationGate,
}

impl<G: Geolocator> LatestLocator<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            gate: GenerationGate::new(),
        }
    }

    pub async fn locate(&self) -> Result<UserLocation> {
        let ticket = self.gate.begin();
        let outcome = self.inner.locate().await;
        if !self.gate.is_current(ticket) {
            debug!("location request {} superseded", ticket.0);
            return Err(CountryDbError::Superseded);
        }
        Ok(outcome?)
    }
}
