// crates/countrydb-core/src/text.rs

//! Text matching for the search filter.

use crate::model::Country;

/// Convert a string into a folded key suitable for comparison.
///
/// 1\) Transliterate Unicode → ASCII (e.g. `Åland` -> `Aland`)
/// 2\) Normalize to lowercase
///
/// ```rust
/// use countrydb_core::text::fold_key;
///
/// assert_eq!(fold_key("Åland Islands"), "aland islands");
/// assert_eq!(fold_key("Côte d'Ivoire"), "cote d'ivoire");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// How the search text is compared against a display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMatch {
    /// Unicode lowercase on both sides, then substring.
    #[default]
    CaseInsensitive,
    /// Transliterate and lowercase both sides, then substring.
    Folded,
}

impl TextMatch {
    /// Prepares the needle once so the per-row check is a plain `contains`.
    pub fn needle(self, query: &str) -> String {
        match self {
            TextMatch::CaseInsensitive => query.to_lowercase(),
            TextMatch::Folded => fold_key(query),
        }
    }

    /// Whether `haystack` contains an already prepared `needle`.
    pub fn contains(self, haystack: &str, needle: &str) -> bool {
        match self {
            TextMatch::CaseInsensitive => haystack.to_lowercase().contains(needle),
            TextMatch::Folded => fold_key(haystack).contains(needle),
        }
    }
}

/// Name-based matching for types that expose a display name.
///
/// ```rust
/// use countrydb_core::text::{NameMatch, TextMatch};
///
/// struct Place(&'static str);
/// impl NameMatch for Place {
///     fn name_str(&self) -> &str { self.0 }
/// }
///
/// assert!(Place("France").name_contains("FRA", TextMatch::CaseInsensitive));
/// assert!(Place("Åland Islands").name_contains("aland", TextMatch::Folded));
/// assert!(!Place("Åland Islands").name_contains("aland", TextMatch::CaseInsensitive));
/// ```
pub trait NameMatch {
    fn name_str(&self) -> &str;

    #[inline]
    fn name_contains(&self, q: &str, mode: TextMatch) -> bool {
        mode.contains(self.name_str(), &mode.needle(q))
    }
}

impl NameMatch for Country {
    fn name_str(&self) -> &str {
        &self.name
    }
}
