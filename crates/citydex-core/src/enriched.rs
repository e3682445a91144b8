use crate::city::City;
use crate::country::CountryDirectoryEntry;
use serde::{Deserialize, Serialize};

/// Current weather for a city, in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    pub description: String,
    /// Relative humidity in percent.
    pub humidity: u8,
    /// Wind speed in metres per second.
    pub wind_speed: f64,
}

/// A city extended with country metadata and current weather.
///
/// Every enrichment field is optional; an absent field means the value could
/// not be resolved and is simply not displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedCity {
    #[serde(flatten)]
    pub city: City,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code_3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherSnapshot>,
}

impl EnrichedCity {
    /// Wraps a city without any enrichment.
    pub fn unenriched(city: City) -> Self {
        Self {
            city,
            country_code_2: None,
            country_code_3: None,
            currency_code: None,
            flag: None,
            weather: None,
        }
    }

    pub fn with_country(mut self, entry: &CountryDirectoryEntry) -> Self {
        self.country_code_2 = Some(entry.cca2.clone());
        self.country_code_3 = Some(entry.cca3.clone());
        self.currency_code = entry.primary_currency().map(str::to_owned);
        self.flag = entry.flag().map(str::to_owned);
        self
    }

    pub fn with_weather(mut self, weather: WeatherSnapshot) -> Self {
        self.weather = Some(weather);
        self
    }

    /// Returns `true` if any enrichment field is set.
    pub fn is_enriched(&self) -> bool {
        self.country_code_2.is_some()
            || self.country_code_3.is_some()
            || self.currency_code.is_some()
            || self.flag.is_some()
            || self.weather.is_some()
    }
}

impl From<City> for EnrichedCity {
    fn from(city: City) -> Self {
        Self::unenriched(city)
    }
}
