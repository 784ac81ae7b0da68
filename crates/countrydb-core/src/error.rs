// crates/countrydb-core/src/error.rs
use thiserror::Error;

/// Every failure the core can report.
///
/// The list pipeline never produces one of these; malformed list state is
/// corrected to defaults instead. The detail aggregator only returns an error
/// when the primary country lookup fails.
#[derive(Debug, Error)]
pub enum CountryDbError {
    /// Malformed caller input at a validating boundary (coordinates, codes).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A collaborator could not be reached or answered with a failure.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// A required API credential is not configured. Names the variable.
    #[error("Missing credential: {0} is not set")]
    MissingCredential(&'static str),

    /// The primary lookup found nothing for the given key.
    #[error("Not found: {0}")]
    EntityNotFound(String),

    /// A newer request started before this one finished.
    #[error("Request superseded by a newer one")]
    Superseded,

    #[error("Geolocation failed: {0}")]
    Geolocation(#[from] crate::geolocation::GeolocationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bincode error: {0}")]
    Bincode(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, CountryDbError>;

impl CountryDbError {
    /// HTTP-style status class used by request boundaries.
    pub fn status_code(&self) -> u16 {
        match self {
            CountryDbError::InvalidInput(_) => 400,
            CountryDbError::EntityNotFound(_) => 404,
            CountryDbError::Superseded => 409,
            CountryDbError::UpstreamUnavailable(_) => 502,
            _ => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CountryDbError::EntityNotFound(_))
    }

    /// `true` for configuration failures that retrying cannot fix.
    pub fn is_configuration(&self) -> bool {
        matches!(self, CountryDbError::MissingCredential(_))
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for CountryDbError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if status == reqwest::StatusCode::NOT_FOUND => {
                CountryDbError::EntityNotFound(err.url().map(|u| u.to_string()).unwrap_or_default())
            }
            _ => CountryDbError::UpstreamUnavailable(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classes() {
        assert_eq!(CountryDbError::InvalidInput("x".into()).status_code(), 400);
        assert_eq!(CountryDbError::EntityNotFound("FRA".into()).status_code(), 404);
        assert_eq!(CountryDbError::UpstreamUnavailable("x".into()).status_code(), 502);
        assert_eq!(CountryDbError::MissingCredential("KEY").status_code(), 500);
        assert!(CountryDbError::MissingCredential("KEY").is_configuration());
        assert!(CountryDbError::EntityNotFound("XXX".into()).is_not_found());
    }

    #[test]
    fn missing_credential_names_the_variable() {
        let err = CountryDbError::MissingCredential("OPENWEATHER_API_KEY");
        assert_eq!(err.to_string(), "Missing credential: OPENWEATHER_API_KEY is not set");
    }
}
