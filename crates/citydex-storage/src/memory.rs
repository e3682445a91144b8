use async_trait::async_trait;
use citydex_core::repository::{ReadRepository, Repository, Result};
use citydex_core::{City, CityId, CityUpdate, NewCity};
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// In-memory implementation of the repository contract using DashMap.
///
/// Ids are handed out from a monotonically increasing sequence starting at 1
/// and are never reused, matching SQLite's `AUTOINCREMENT`.
#[derive(Debug)]
pub struct InMemoryRepository {
    storage: DashMap<CityId, City>,
    next_id: AtomicI64,
}

impl InMemoryRepository {
    /// Creates a new, empty in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    fn sorted(mut cities: Vec<City>) -> Vec<City> {
        cities.sort_by_key(|city| city.id);
        cities
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, id: CityId) -> Result<Option<City>> {
        Ok(self.storage.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list(&self) -> Result<Vec<City>> {
        let cities = self
            .storage
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        Ok(Self::sorted(cities))
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<City>> {
        let needle = name.to_ascii_lowercase();
        let cities = self
            .storage
            .iter()
            .filter(|entry| entry.value().name.to_ascii_lowercase().contains(&needle))
            .map(|entry| entry.value().clone())
            .collect();
        Ok(Self::sorted(cities))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, city: NewCity) -> Result<CityId> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.storage.insert(id, city.into_city(id));
        Ok(id)
    }

    async fn update(&self, id: CityId, update: CityUpdate) -> Result<bool> {
        let Some(mut entry) = self.storage.get_mut(&id) else {
            return Ok(false);
        };
        update.apply_to(entry.value_mut());
        Ok(true)
    }

    async fn delete(&self, id: CityId) -> Result<bool> {
        Ok(self.storage.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let repo = InMemoryRepository::new();

        let first = repo.insert(NewCity::new("Tokyo", "Japan")).await.unwrap();
        let second = repo.insert(NewCity::new("Osaka", "Japan")).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(repo.get(first).await.unwrap().unwrap().name, "Tokyo");
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemoryRepository::new();

        let id = repo.insert(NewCity::new("Tokyo", "Japan")).await.unwrap();
        assert!(repo.delete(id).await.unwrap());
        let next = repo.insert(NewCity::new("Kyoto", "Japan")).await.unwrap();

        assert_ne!(id, next);
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let repo = InMemoryRepository::new();
        assert!(repo.get(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let repo = InMemoryRepository::new();
        for name in ["Lima", "Bogota", "Quito", "Caracas"] {
            repo.insert(NewCity::new(name, "Somewhere")).await.unwrap();
        }

        let names: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|city| city.name)
            .collect();
        assert_eq!(names, ["Lima", "Bogota", "Quito", "Caracas"]);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let repo = InMemoryRepository::new();
        repo.insert(NewCity::new("Paris", "France")).await.unwrap();
        repo.insert(NewCity::new("Paris", "United States")).await.unwrap();
        repo.insert(NewCity::new("Parma", "Italy")).await.unwrap();

        let found = repo.search_by_name("PARI").await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|city| city.name == "Paris"));

        assert!(repo.search_by_name("berlin").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_folds_ascii_only_and_matches_literally() {
        let repo = InMemoryRepository::new();
        repo.insert(NewCity::new("Évora", "Portugal")).await.unwrap();
        repo.insert(NewCity::new("a_b", "Nowhere")).await.unwrap();
        repo.insert(NewCity::new("axb", "Nowhere")).await.unwrap();
        repo.insert(NewCity::new("100% Town", "Nowhere")).await.unwrap();

        assert!(repo.search_by_name("évora").await.unwrap().is_empty());
        assert_eq!(repo.search_by_name("ÉVORA").await.unwrap().len(), 1);

        let names: Vec<_> = repo
            .search_by_name("a_b")
            .await
            .unwrap()
            .into_iter()
            .map(|city| city.name)
            .collect();
        assert_eq!(names, ["a_b"]);
        assert_eq!(repo.search_by_name("%").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_existing_and_missing() {
        let repo = InMemoryRepository::new();
        let id = repo.insert(NewCity::new("Rome", "Italy")).await.unwrap();

        let update = CityUpdate {
            tourist_rating: Some(5),
            date_established: Some("0753-04-21".to_string()),
            estimated_population: Some(2_800_000),
        };
        assert!(repo.update(id, update.clone()).await.unwrap());
        assert!(!repo.update(id + 1, update).await.unwrap());

        let rome = repo.get(id).await.unwrap().unwrap();
        assert_eq!(rome.tourist_rating, Some(5));
        assert_eq!(rome.estimated_population, Some(2_800_000));
    }

    #[tokio::test]
    async fn delete_nonexistent() {
        let repo = InMemoryRepository::new();
        assert!(!repo.delete(1).await.unwrap());
    }
}
