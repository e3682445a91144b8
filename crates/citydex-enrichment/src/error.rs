use std::time::Duration;
use thiserror::Error;

/// A failed call to an upstream HTTP provider.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("upstream request timed out: {0}")]
    Timeout(String),
    #[error("upstream responded with status {0}")]
    Status(u16),
    #[error("upstream payload could not be decoded: {0}")]
    Decode(String),
    #[error("upstream request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// The country directory could not be obtained at all.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    #[error("country directory unavailable: {0}")]
    Unavailable(#[source] FetchError),
}

/// Reasons a weather lookup produced no snapshot.
#[derive(Debug, Clone, Error)]
pub enum WeatherError {
    #[error("weather provider credential is not configured")]
    MissingCredential,
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("weather payload is malformed: {0}")]
    Malformed(String),
}

/// Reasons a city came back unenriched.
#[derive(Debug, Clone, Error)]
pub enum EnrichmentError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error("city enrichment exceeded its {0:?} deadline")]
    DeadlineExceeded(Duration),
    #[error("city enrichment panicked: {0}")]
    Panicked(String),
}
