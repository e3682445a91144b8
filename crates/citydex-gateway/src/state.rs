use std::sync::Arc;

use citydex_core::Repository;
use citydex_enrichment::CityEnricher;

#[derive(Clone)]
pub struct AppState {
    repository: Arc<dyn Repository>,
    enricher: Arc<dyn CityEnricher>,
}

impl AppState {
    pub fn new(repository: Arc<dyn Repository>, enricher: Arc<dyn CityEnricher>) -> Self {
        Self {
            repository,
            enricher,
        }
    }

    pub fn repository(&self) -> &dyn Repository {
        self.repository.as_ref()
    }

    pub fn enricher(&self) -> &dyn CityEnricher {
        self.enricher.as_ref()
    }
}
