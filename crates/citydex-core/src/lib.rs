//! Core types and traits for Citydex.
//!
//! This crate provides the city domain model shared by the storage layer,
//! the enrichment pipeline and the HTTP gateway.

pub mod city;
pub mod country;
pub mod enriched;
pub mod error;
pub mod repository;

pub use city::{City, CityId, CityUpdate, NewCity};
pub use country::{CountryDirectoryEntry, CountryName, Currency, Flags};
pub use enriched::{EnrichedCity, WeatherSnapshot};
pub use error::{StorageError, ValidationError};
pub use repository::{ReadRepository, Repository};
