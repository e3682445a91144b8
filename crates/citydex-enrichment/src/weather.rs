pub mod openweather;

use crate::error::WeatherError;
use async_trait::async_trait;
use citydex_core::WeatherSnapshot;
use std::fmt::{Display, Formatter};
use tracing::{debug, warn};

/// The place to look up weather for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
    /// ISO alpha-2 code, used to disambiguate same-named cities.
    pub country_code: Option<String>,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>, country_code: Option<&str>) -> Self {
        Self {
            city: city.into(),
            country_code: country_code.map(str::to_owned),
        }
    }
}

impl Display for WeatherQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.country_code {
            Some(code) => write!(f, "{},{}", self.city, code),
            None => f.write_str(&self.city),
        }
    }
}

/// An upstream provider of current weather.
#[async_trait]
pub trait WeatherSource: Send + Sync + 'static {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, WeatherError>;
}

/// The result of a weather lookup: a snapshot, or the reason there is none.
#[derive(Debug, Clone)]
pub enum WeatherOutcome {
    Observed(WeatherSnapshot),
    Absent(WeatherError),
}

impl WeatherOutcome {
    pub fn is_observed(&self) -> bool {
        matches!(self, WeatherOutcome::Observed(_))
    }

    pub fn into_snapshot(self) -> Option<WeatherSnapshot> {
        match self {
            WeatherOutcome::Observed(snapshot) => Some(snapshot),
            WeatherOutcome::Absent(_) => None,
        }
    }
}

/// Weather lookup that never fails.
///
/// Every error from the source (missing credential, timeout, error status,
/// malformed payload) collapses into [`WeatherOutcome::Absent`].
#[derive(Debug, Clone)]
pub struct WeatherLookup<S> {
    source: S,
}

impl<S: WeatherSource> WeatherLookup<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn lookup(&self, city: &str, country_code: Option<&str>) -> WeatherOutcome {
        let query = WeatherQuery::new(city, country_code);

        match self.source.current(&query).await {
            Ok(snapshot) => {
                debug!(query = %query, "weather observed");
                WeatherOutcome::Observed(snapshot)
            }
            Err(WeatherError::MissingCredential) => {
                debug!(query = %query, "weather credential not configured, skipping lookup");
                WeatherOutcome::Absent(WeatherError::MissingCredential)
            }
            Err(error) => {
                warn!(query = %query, error = %error, "weather lookup failed");
                WeatherOutcome::Absent(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use std::sync::Mutex;

    struct RecordingSource {
        queries: Mutex<Vec<String>>,
        result: Result<WeatherSnapshot, WeatherError>,
    }

    #[async_trait]
    impl WeatherSource for RecordingSource {
        async fn current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, WeatherError> {
            self.queries.lock().unwrap().push(query.to_string());
            self.result.clone()
        }
    }

    fn sunny() -> WeatherSnapshot {
        WeatherSnapshot {
            temperature: 24.0,
            description: "clear sky".to_string(),
            humidity: 40,
            wind_speed: 2.5,
        }
    }

    #[test]
    fn query_includes_country_code_when_known() {
        assert_eq!(WeatherQuery::new("Paris", Some("FR")).to_string(), "Paris,FR");
        assert_eq!(WeatherQuery::new("Paris", None).to_string(), "Paris");
    }

    #[tokio::test]
    async fn observed_weather() {
        let lookup = WeatherLookup::new(RecordingSource {
            queries: Mutex::new(Vec::new()),
            result: Ok(sunny()),
        });

        let outcome = lookup.lookup("Paris", Some("US")).await;

        assert!(outcome.is_observed());
        assert_eq!(outcome.into_snapshot(), Some(sunny()));
        assert_eq!(*lookup.source.queries.lock().unwrap(), ["Paris,US"]);
    }

    #[tokio::test]
    async fn failures_become_absent() {
        for error in [
            WeatherError::MissingCredential,
            WeatherError::Fetch(FetchError::Status(404)),
            WeatherError::Fetch(FetchError::Timeout("10s".to_string())),
            WeatherError::Malformed("no conditions".to_string()),
        ] {
            let lookup = WeatherLookup::new(RecordingSource {
                queries: Mutex::new(Vec::new()),
                result: Err(error),
            });

            let outcome = lookup.lookup("Atlantis", None).await;
            assert!(matches!(outcome, WeatherOutcome::Absent(_)));
            assert_eq!(outcome.into_snapshot(), None);
        }
    }
}
