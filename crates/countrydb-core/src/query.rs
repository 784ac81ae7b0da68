// crates/countrydb-core/src/query.rs

//! # Query State Codec
//!
//! Maps [`QueryState`] to and from the list page's query string.
//!
//! | key              | default              | elided when     |
//! |------------------|----------------------|-----------------|
//! | `query`          | `""`                 | empty           |
//! | `region`         | `"All"`              | `"All"`         |
//! | `page`           | `1`                  | `1`             |
//! | `pageSize`       | `Config::default_page_size` | equal to it |
//! | `sortByDistance` | `false`              | `false`         |
//!
//! Elision is what makes the encoding canonical: two states that only differ
//! in spelled-out defaults produce the same string.

use crate::config::{Config, ALL_REGIONS};
use std::sync::Mutex;
use url::form_urlencoded;

pub const KEY_QUERY: &str = "query";
pub const KEY_REGION: &str = "region";
pub const KEY_PAGE: &str = "page";
pub const KEY_PAGE_SIZE: &str = "pageSize";
pub const KEY_SORT_BY_DISTANCE: &str = "sortByDistance";

/// Region filter: everything, or one region label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegionFilter {
    #[default]
    All,
    Only(String),
}

impl RegionFilter {
    /// `"All"` and the empty string mean no filter; anything else is a label.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "" | ALL_REGIONS => RegionFilter::All,
            label => RegionFilter::Only(label.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RegionFilter::All => ALL_REGIONS,
            RegionFilter::Only(label) => label,
        }
    }

    pub fn matches(&self, region: &str) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Only(label) => label == region,
        }
    }
}

/// The canonical filter/sort/page state of the list view.
///
/// Always derived fresh from the query string via [`decode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub search_text: String,
    pub region: RegionFilter,
    /// 1-based; always `>= 1`.
    pub page: u32,
    /// Always `> 0`.
    pub page_size: u32,
    pub sort_by_distance: bool,
}

impl QueryState {
    /// The canonical empty state for `config`; encodes to `""`.
    pub fn canonical(config: &Config) -> Self {
        Self {
            search_text: String::new(),
            region: RegionFilter::All,
            page: 1,
            page_size: config.default_page_size,
            sort_by_distance: false,
        }
    }

    pub fn is_canonical(&self, config: &Config) -> bool {
        *self == Self::canonical(config)
    }

    /// The five updates that spell this state out in full.
    pub fn to_updates(&self) -> Vec<QueryUpdate> {
        vec![
            QueryUpdate::Query(self.search_text.clone()),
            QueryUpdate::Region(self.region.clone()),
            QueryUpdate::Page(self.page),
            QueryUpdate::PageSize(self.page_size),
            QueryUpdate::SortByDistance(self.sort_by_distance),
        ]
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::canonical(&Config::default())
    }
}

/// One key change requested by a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryUpdate {
    Query(String),
    Region(RegionFilter),
    Page(u32),
    PageSize(u32),
    SortByDistance(bool),
}

impl QueryUpdate {
    pub fn key(&self) -> &'static str {
        match self {
            QueryUpdate::Query(_) => KEY_QUERY,
            QueryUpdate::Region(_) => KEY_REGION,
            QueryUpdate::Page(_) => KEY_PAGE,
            QueryUpdate::PageSize(_) => KEY_PAGE_SIZE,
            QueryUpdate::SortByDistance(_) => KEY_SORT_BY_DISTANCE,
        }
    }

    /// String form to store, or `None` when the value is a default and the
    /// key must be removed instead.
    pub fn value(&self, config: &Config) -> Option<String> {
        match self {
            QueryUpdate::Query(text) if text.is_empty() => None,
            QueryUpdate::Query(text) => Some(text.clone()),
            QueryUpdate::Region(RegionFilter::All) => None,
            // Normalized the way decode reads it back.
            QueryUpdate::Region(RegionFilter::Only(label)) => match RegionFilter::parse(label) {
                RegionFilter::All => None,
                RegionFilter::Only(label) => Some(label),
            },
            QueryUpdate::Page(1) => None,
            QueryUpdate::Page(page) => Some(page.to_string()),
            QueryUpdate::PageSize(size) if *size == config.default_page_size => None,
            QueryUpdate::PageSize(size) => Some(size.to_string()),
            QueryUpdate::SortByDistance(false) => None,
            QueryUpdate::SortByDistance(true) => Some("true".to_string()),
        }
    }
}

// -----------------------------------------------------------------------------
// PARAMETER SET
// -----------------------------------------------------------------------------

/// Insertion-ordered, form-urlencoded parameter list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parses `?a=1&b=2` or `a=1&b=2`.
    pub fn parse(input: &str) -> Self {
        let input = input.trim().trim_start_matches('?');
        Self {
            pairs: form_urlencoded::parse(input.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces the first occurrence in place and drops the rest, or appends.
    pub fn set(&mut self, key: &str, value: String) {
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(idx) => {
                self.pairs[idx].1 = value;
                let mut seen = 0usize;
                self.pairs.retain(|(k, _)| {
                    if k != key {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub fn delete(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn apply(&mut self, update: &QueryUpdate, config: &Config) {
        match update.value(config) {
            Some(value) => self.set(update.key(), value),
            None => self.delete(update.key()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `?`-prefixed query string, or `""` when there are no keys.
    pub fn to_href(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }
        let mut serializer = form_urlencoded::Serializer::new(String::from("?"));
        for (k, v) in &self.pairs {
            serializer.append_pair(k, v);
        }
        serializer.finish()
    }
}

// -----------------------------------------------------------------------------
// CODEC
// -----------------------------------------------------------------------------

/// Applies `updates` on top of `existing` and returns the canonical href.
///
/// Keys not named by an update are kept as they were, unknown keys included.
///
/// ```rust
/// use countrydb_core::query::{encode, QueryUpdate, RegionFilter};
/// use countrydb_core::Config;
///
/// let config = Config::default();
/// let href = encode(
///     "?query=fra&utm=x",
///     &[QueryUpdate::Region(RegionFilter::Only("Europe".into())), QueryUpdate::Page(1)],
///     &config,
/// );
/// assert_eq!(href, "?query=fra&utm=x&region=Europe");
/// ```
pub fn encode(existing: &str, updates: &[QueryUpdate], config: &Config) -> String {
    let mut params = QueryParams::parse(existing);
    for update in updates {
        params.apply(update, config);
    }
    params.to_href()
}

/// Writes every field of `state` over `existing`.
pub fn encode_state(existing: &str, state: &QueryState, config: &Config) -> String {
    encode(existing, &state.to_updates(), config)
}

/// Reads a [`QueryState`] out of a query string. Never fails: anything
/// missing or unparseable takes its default.
pub fn decode(input: &str, config: &Config) -> QueryState {
    let params = QueryParams::parse(input);
    let defaults = QueryState::canonical(config);

    QueryState {
        search_text: params.get(KEY_QUERY).unwrap_or_default().to_string(),
        region: params
            .get(KEY_REGION)
            .map(RegionFilter::parse)
            .unwrap_or_default(),
        page: params
            .get(KEY_PAGE)
            .and_then(parse_positive)
            .unwrap_or(defaults.page),
        page_size: params
            .get(KEY_PAGE_SIZE)
            .and_then(parse_positive)
            .unwrap_or(defaults.page_size),
        sort_by_distance: params.get(KEY_SORT_BY_DISTANCE) == Some("true"),
    }
}

fn parse_positive(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

// -----------------------------------------------------------------------------
// NAVIGATION
// -----------------------------------------------------------------------------

/// The location bar: where the list page reads its state from and where
/// controls write it back (history "replace", never "push").
pub trait Navigator: Send + Sync {
    /// Current query string, `?`-prefixed or empty.
    fn location(&self) -> String;
    fn replace(&self, href: &str);
}

/// In-process navigator that records every replacement.
#[derive(Debug, Default)]
pub struct MemoryNavigator {
    inner: Mutex<NavigatorState>,
}

#[derive(Debug, Default)]
struct NavigatorState {
    location: String,
    history: Vec<String>,
}

impl MemoryNavigator {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(NavigatorState {
                location: location.into(),
                history: Vec::new(),
            }),
        }
    }

    /// Every href passed to [`Navigator::replace`], oldest first.
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    /// Simulates back/forward: moves the location without recording a replace.
    pub fn jump_to(&self, href: impl Into<String>) {
        self.lock().location = href.into();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NavigatorState> {
        // A poisoned lock still holds a valid string.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Navigator for MemoryNavigator {
    fn location(&self) -> String {
        self.lock().location.clone()
    }

    fn replace(&self, href: &str) {
        let mut state = self.lock();
        state.location = href.to_string();
        state.history.push(href.to_string());
    }
}

// -----------------------------------------------------------------------------
// LIST CONTROLS
// -----------------------------------------------------------------------------

/// A direct list-page control (filters, pager, sort toggle).
#[derive(Debug, Clone, PartialEq)]
pub enum ListAction {
    Search(String),
    SelectRegion(RegionFilter),
    GoToPage(u32),
    Previous,
    Next,
    SetPageSize(u32),
    /// Flip distance sorting.
    ToggleDistance,
    /// A location was just obtained: sort by distance from it.
    NearMe,
}

impl ListAction {
    /// Codec updates for this action given the current state.
    ///
    /// Anything that changes the result set sends the user back to page 1.
    pub fn updates(&self, state: &QueryState, total_pages: usize) -> Vec<QueryUpdate> {
        match self {
            ListAction::Search(text) => vec![QueryUpdate::Query(text.clone()), QueryUpdate::Page(1)],
            ListAction::SelectRegion(region) => {
                vec![QueryUpdate::Region(region.clone()), QueryUpdate::Page(1)]
            }
            ListAction::GoToPage(page) => vec![QueryUpdate::Page((*page).max(1))],
            ListAction::Previous => vec![QueryUpdate::Page(state.page.saturating_sub(1).max(1))],
            ListAction::Next => {
                let last = u32::try_from(total_pages).unwrap_or(u32::MAX).max(1);
                vec![QueryUpdate::Page(state.page.saturating_add(1).min(last))]
            }
            ListAction::SetPageSize(size) => vec![QueryUpdate::PageSize(*size)],
            ListAction::ToggleDistance => vec![
                QueryUpdate::SortByDistance(!state.sort_by_distance),
                QueryUpdate::Page(1),
            ],
            ListAction::NearMe => vec![QueryUpdate::SortByDistance(true), QueryUpdate::Page(1)],
        }
    }

    /// Applies the action to the navigator's current location.
    pub fn dispatch(&self, navigator: &dyn Navigator, total_pages: usize, config: &Config) {
        let location = navigator.location();
        let state = decode(&location, config);
        let href = encode(&location, &self.updates(&state, total_pages), config);
        navigator.replace(&href);
    }
}

/// Page numbers the pager shows: at most five, centred on `current` and
/// clamped to both ends.
pub fn page_window(current: u32, total_pages: u32) -> Vec<u32> {
    const WIDTH: u32 = 5;
    let len = WIDTH.min(total_pages);
    let first = if total_pages <= WIDTH || current <= 3 {
        1
    } else if current >= total_pages - 2 {
        total_pages - (WIDTH - 1)
    } else {
        current - 2
    };
    (first..first + len).collect()
}
