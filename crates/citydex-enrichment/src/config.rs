use crate::directory::rest_countries::DEFAULT_COUNTRIES_URL;
use crate::weather::openweather::DEFAULT_WEATHER_URL;
use std::time::Duration;
use typed_builder::TypedBuilder;

/// How long a country directory snapshot is served before a refetch.
pub const DEFAULT_DIRECTORY_TTL: Duration = Duration::from_secs(24 * 60 * 60);
/// Timeout applied to every upstream HTTP call.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);
/// Upper bound on the whole per-city enrichment step.
pub const DEFAULT_CITY_DEADLINE: Duration = Duration::from_secs(15);

/// Configuration for building an [`Enricher`](crate::Enricher) against the
/// public country and weather providers.
#[derive(Debug, Clone, TypedBuilder)]
pub struct EnrichmentConfig {
    #[builder(default = DEFAULT_COUNTRIES_URL.to_string(), setter(into))]
    pub countries_url: String,
    #[builder(default = DEFAULT_WEATHER_URL.to_string(), setter(into))]
    pub weather_url: String,
    /// OpenWeatherMap API key. Without one, weather is never looked up.
    #[builder(default)]
    pub weather_api_key: Option<String>,
    #[builder(default = DEFAULT_DIRECTORY_TTL)]
    pub directory_ttl: Duration,
    #[builder(default = DEFAULT_UPSTREAM_TIMEOUT)]
    pub upstream_timeout: Duration,
    #[builder(default = DEFAULT_CITY_DEADLINE)]
    pub city_deadline: Duration,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EnrichmentConfig::default();
        assert_eq!(config.countries_url, DEFAULT_COUNTRIES_URL);
        assert_eq!(config.weather_url, DEFAULT_WEATHER_URL);
        assert_eq!(config.weather_api_key, None);
        assert_eq!(config.directory_ttl, Duration::from_secs(86_400));
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
    }
}
