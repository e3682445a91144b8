use crate::clock::{Clock, SystemClock};
use crate::config::{EnrichmentConfig, DEFAULT_CITY_DEADLINE};
use crate::directory::rest_countries::RestCountriesClient;
use crate::directory::{CountryDirectoryCache, CountrySource, DirectorySnapshot};
use crate::error::{EnrichmentError, FetchError};
use crate::matcher::find_country;
use crate::weather::openweather::OpenWeatherClient;
use crate::weather::{WeatherLookup, WeatherSource};
use async_trait::async_trait;
use citydex_core::{City, EnrichedCity};
use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Turns stored cities into enriched ones.
#[async_trait]
pub trait CityEnricher: Send + Sync + 'static {
    /// Enriches every city, preserving order and length.
    /// Never fails; cities that cannot be enriched come back unenriched.
    async fn enrich(&self, cities: Vec<City>) -> Vec<EnrichedCity>;
}

/// How enrichment went for one city.
#[derive(Debug, Clone)]
pub enum CityOutcome {
    /// The city went through the pipeline. Individual fields may still be
    /// absent when the country was not matched or weather was unavailable.
    Enriched(EnrichedCity),
    /// The city is returned as stored.
    Degraded {
        city: EnrichedCity,
        reason: EnrichmentError,
    },
}

impl CityOutcome {
    pub fn city(&self) -> &EnrichedCity {
        match self {
            CityOutcome::Enriched(city) | CityOutcome::Degraded { city, .. } => city,
        }
    }

    pub fn into_city(self) -> EnrichedCity {
        match self {
            CityOutcome::Enriched(city) | CityOutcome::Degraded { city, .. } => city,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, CityOutcome::Degraded { .. })
    }

    fn degraded(city: City, reason: EnrichmentError) -> Self {
        CityOutcome::Degraded {
            city: EnrichedCity::unenriched(city),
            reason,
        }
    }
}

/// The enrichment orchestrator.
///
/// Obtains the country directory once per batch, then enriches every city
/// concurrently: match the country, look up weather with the matched alpha-2
/// code, merge whatever succeeded. Each city is isolated behind a deadline
/// and a panic boundary so one city never affects another.
pub struct Enricher<S, W, C = SystemClock> {
    directory: CountryDirectoryCache<S, C>,
    weather: WeatherLookup<W>,
    city_deadline: Duration,
}

impl Enricher<RestCountriesClient, OpenWeatherClient> {
    /// Builds an enricher against the REST Countries and OpenWeatherMap APIs.
    pub fn from_config(config: &EnrichmentConfig) -> Result<Self, FetchError> {
        let countries = RestCountriesClient::new(&config.countries_url, config.upstream_timeout)?;
        let weather = OpenWeatherClient::new(
            &config.weather_url,
            config.weather_api_key.clone(),
            config.upstream_timeout,
        )?;

        Ok(Self::new(
            CountryDirectoryCache::new(countries, config.directory_ttl),
            WeatherLookup::new(weather),
        )
        .with_city_deadline(config.city_deadline))
    }
}

impl<S: CountrySource, W: WeatherSource, C: Clock> Enricher<S, W, C> {
    pub fn new(directory: CountryDirectoryCache<S, C>, weather: WeatherLookup<W>) -> Self {
        Self {
            directory,
            weather,
            city_deadline: DEFAULT_CITY_DEADLINE,
        }
    }

    pub fn with_city_deadline(mut self, deadline: Duration) -> Self {
        self.city_deadline = deadline;
        self
    }

    /// Returns the country directory cache.
    pub fn directory(&self) -> &CountryDirectoryCache<S, C> {
        &self.directory
    }

    /// Enriches every city, keeping input order.
    pub async fn enrich(&self, cities: Vec<City>) -> Vec<EnrichedCity> {
        CityEnricher::enrich(self, cities).await
    }

    /// Enriches every city and reports how each one went, keeping input order.
    pub async fn enrich_detailed(&self, cities: Vec<City>) -> Vec<CityOutcome> {
        let directory = match self.directory.get_directory().await {
            Ok(directory) => directory,
            Err(error) => {
                warn!(
                    error = %error,
                    cities = cities.len(),
                    "country directory unavailable, returning cities unenriched"
                );
                let reason = EnrichmentError::from(error);
                return cities
                    .into_iter()
                    .map(|city| CityOutcome::degraded(city, reason.clone()))
                    .collect();
            }
        };

        let outcomes = join_all(
            cities
                .into_iter()
                .map(|city| self.enrich_city(&directory, city)),
        )
        .await;

        let degraded = outcomes.iter().filter(|o| o.is_degraded()).count();
        info!(cities = outcomes.len(), degraded, "enrichment batch finished");
        outcomes
    }

    async fn enrich_city(&self, directory: &DirectorySnapshot, city: City) -> CityOutcome {
        let fallback = city.clone();
        let work = AssertUnwindSafe(self.compose(directory, city)).catch_unwind();

        match tokio::time::timeout(self.city_deadline, work).await {
            Ok(Ok(enriched)) => CityOutcome::Enriched(enriched),
            Ok(Err(panic)) => {
                let message = panic_message(panic.as_ref());
                warn!(city_id = fallback.id, panic = %message, "city enrichment panicked");
                CityOutcome::degraded(fallback, EnrichmentError::Panicked(message))
            }
            Err(_) => {
                warn!(
                    city_id = fallback.id,
                    deadline = ?self.city_deadline,
                    "city enrichment exceeded its deadline"
                );
                CityOutcome::degraded(
                    fallback,
                    EnrichmentError::DeadlineExceeded(self.city_deadline),
                )
            }
        }
    }

    async fn compose(&self, directory: &DirectorySnapshot, city: City) -> EnrichedCity {
        let country = find_country(directory.entries(), &city.country);
        if country.is_none() {
            debug!(city_id = city.id, country = %city.country, "country not found in directory");
        }

        let country_code = country.map(|entry| entry.cca2.as_str());
        let weather = self.weather.lookup(&city.name, country_code).await;

        let mut enriched = EnrichedCity::unenriched(city);
        if let Some(entry) = country {
            enriched = enriched.with_country(entry);
        }
        if let Some(snapshot) = weather.into_snapshot() {
            enriched = enriched.with_weather(snapshot);
        }
        enriched
    }
}

#[async_trait]
impl<S: CountrySource, W: WeatherSource, C: Clock> CityEnricher for Enricher<S, W, C> {
    async fn enrich(&self, cities: Vec<City>) -> Vec<EnrichedCity> {
        self.enrich_detailed(cities)
            .await
            .into_iter()
            .map(CityOutcome::into_city)
            .collect()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
