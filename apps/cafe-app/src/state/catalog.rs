//! # Catalog State
//!
//! Holds the one `CatalogService` the app talks to. Every read goes through
//! it, so every read gets the API-or-demo fallback.

use cafe_client::CatalogService;

#[derive(Debug, Clone)]
pub struct CatalogState {
    service: CatalogService,
}

impl CatalogState {
    pub fn new(service: CatalogService) -> Self {
        CatalogState { service }
    }

    pub fn inner(&self) -> &CatalogService {
        &self.service
    }
}
