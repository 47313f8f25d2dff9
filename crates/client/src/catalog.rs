//! Plant catalog lookups.

use std::sync::Arc;

use sprout_core::error::CoreError;
use sprout_core::models::Microgreen;
use sprout_core::types::DbId;

use crate::api::ApiClient;
use crate::error::ClientResult;

/// Cached copy of `GET /microgreens` with name search.
pub struct MicrogreenCatalog {
    api: Arc<ApiClient>,
    entries: Vec<Microgreen>,
}

impl MicrogreenCatalog {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            entries: Vec::new(),
        }
    }

    /// Fetch the full catalog, replacing the cached copy.
    pub async fn load(&mut self) -> ClientResult<&[Microgreen]> {
        self.entries = self.api.list_microgreens().await?;
        tracing::debug!(count = self.entries.len(), "Catalog loaded");
        Ok(&self.entries)
    }

    pub fn entries(&self) -> &[Microgreen] {
        &self.entries
    }

    /// Cached entries whose name contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&Microgreen> {
        self.entries
            .iter()
            .filter(|m| m.matches_search(query))
            .collect()
    }

    /// A catalog record by id, from the cache when present. A `404` from the
    /// server becomes [`CoreError::NotFound`].
    pub async fn get(&self, id: DbId) -> ClientResult<Microgreen> {
        if let Some(found) = self.entries.iter().find(|m| m.id == id) {
            return Ok(found.clone());
        }
        match self.api.get_microgreen(id).await {
            Err(e) if e.status() == Some(404) => Err(CoreError::NotFound {
                entity: "microgreen",
                id: id.to_string(),
            }
            .into()),
            other => other,
        }
    }
}
