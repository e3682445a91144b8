//! City enrichment pipeline.
//!
//! Extends stored cities with country metadata from a cached country
//! directory and with current weather. Every step degrades instead of
//! failing: the worst case is that cities come back unenriched.
//!
//! # Example
//!
//! ```rust,no_run
//! use citydex_core::NewCity;
//! use citydex_enrichment::{EnrichmentConfig, Enricher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EnrichmentConfig::builder()
//!     .weather_api_key(Some("my-openweather-key".to_string()))
//!     .build();
//! let enricher = Enricher::from_config(&config)?;
//!
//! let paris = NewCity::new("Paris", "France").into_city(1);
//! let enriched = enricher.enrich(vec![paris]).await;
//! println!("{:?}", enriched[0].country_code_2);
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod directory;
pub mod enricher;
pub mod error;
pub mod matcher;
pub mod weather;

pub use clock::{Clock, SystemClock};
pub use config::EnrichmentConfig;
pub use directory::rest_countries::{RestCountriesClient, DEFAULT_COUNTRIES_URL};
pub use directory::{CountryDirectoryCache, CountrySource, DirectorySnapshot};
pub use enricher::{CityEnricher, CityOutcome, Enricher};
pub use error::{DirectoryError, EnrichmentError, FetchError, WeatherError};
pub use matcher::find_country;
pub use weather::openweather::{OpenWeatherClient, DEFAULT_WEATHER_URL};
pub use weather::{WeatherLookup, WeatherOutcome, WeatherQuery, WeatherSource};
