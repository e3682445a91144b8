use crate::city::{City, CityId, CityUpdate, NewCity};
use crate::error::StorageError;
use async_trait::async_trait;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of the city store.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves a city by id.
    /// Returns `None` if no city has that id.
    async fn get(&self, id: CityId) -> Result<Option<City>>;

    /// Lists every stored city, ordered by id.
    async fn list(&self) -> Result<Vec<City>>;

    /// Finds cities whose name contains `name`, ordered by id.
    ///
    /// `name` is matched literally. Case is ignored for ASCII letters only,
    /// so "PARIS" finds "Paris" but "évora" does not find "Évora".
    async fn search_by_name(&self, name: &str) -> Result<Vec<City>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new city and returns the id assigned by the store.
    async fn insert(&self, city: NewCity) -> Result<CityId>;

    /// Replaces the editable details of a city.
    /// Returns `false` if no city has that id.
    async fn update(&self, id: CityId, update: CityUpdate) -> Result<bool>;

    /// Deletes a city.
    /// Returns `true` if the city existed and was removed.
    async fn delete(&self, id: CityId) -> Result<bool>;
}
