use crate::error::{FetchError, WeatherError};
use crate::weather::{WeatherQuery, WeatherSource};
use async_trait::async_trait;
use citydex_core::WeatherSnapshot;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

/// The OpenWeatherMap current weather endpoint.
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Weather source backed by the OpenWeatherMap current weather API.
///
/// Without an API key every call fails with
/// [`WeatherError::MissingCredential`] and no request is sent.
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl OpenWeatherClient {
    pub fn new(
        url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }
}

#[derive(Deserialize)]
struct CurrentWeatherResponse {
    main: MainReadings,
    weather: Vec<Condition>,
    wind: Wind,
}

#[derive(Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: u8,
}

#[derive(Deserialize)]
struct Condition {
    description: String,
}

#[derive(Deserialize)]
struct Wind {
    speed: f64,
}

impl CurrentWeatherResponse {
    /// Uses the first reported condition as the description.
    fn into_snapshot(self) -> Result<WeatherSnapshot, WeatherError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Malformed("no weather conditions".to_string()))?;

        Ok(WeatherSnapshot {
            temperature: self.main.temp,
            description: condition.description,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    #[instrument(skip_all, fields(query = %query), level = "debug")]
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, WeatherError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(WeatherError::MissingCredential);
        };

        let q = query.to_string();
        let response = self
            .client
            .get(&self.url)
            .query(&[("q", q.as_str()), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(FetchError::from)?
            .error_for_status()
            .map_err(FetchError::from)?
            .json::<CurrentWeatherResponse>()
            .await
            .map_err(FetchError::from)?;

        response.into_snapshot()
    }
}
