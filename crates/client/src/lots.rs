//! The signed-in user's lots.
//!
//! Lots come back from `GET /lots/` with only a plant reference id; each
//! is joined with its catalog record before it is handed out. A failed
//! lookup never fails the list: that lot gets a placeholder record.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;

use sprout_core::error::CoreError;
use sprout_core::models::{CreateLotRequest, Lot, Microgreen, NewLot, RawLot};
use sprout_core::types::DbId;

use crate::api::ApiClient;
use crate::config::LotEnrichment;
use crate::error::ClientResult;

pub struct LotRepository {
    api: Arc<ApiClient>,
    enrichment: LotEnrichment,
    lots: Vec<Lot>,
    selected: Option<Microgreen>,
}

impl LotRepository {
    pub fn new(api: Arc<ApiClient>, enrichment: LotEnrichment) -> Self {
        Self {
            api,
            enrichment,
            lots: Vec::new(),
            selected: None,
        }
    }

    /// Lots from the last successful fetch or mutation, in server order
    /// with newly created lots first.
    pub fn lots(&self) -> &[Lot] {
        &self.lots
    }

    /// Fetch and enrich the full list. On failure the cached list is kept.
    pub async fn list_lots(&mut self) -> ClientResult<&[Lot]> {
        let raw = self.api.list_lots().await?;
        warn_unreferenced(&raw);
        let lots = match self.enrichment {
            LotEnrichment::PerLot => self.enrich_per_lot(raw).await,
            LotEnrichment::Catalog => self.enrich_from_catalog(raw).await,
        };
        tracing::debug!(count = lots.len(), "Lots loaded");
        self.lots = lots;
        Ok(&self.lots)
    }

    /// Remember the plant the next [`create_lot`](Self::create_lot) is for.
    pub fn select_microgreen(&mut self, microgreen: Microgreen) {
        self.selected = Some(microgreen);
    }

    pub fn selected_microgreen(&self) -> Option<&Microgreen> {
        self.selected.as_ref()
    }

    /// Create a lot for the selected plant and put it at the front of the list.
    ///
    /// The selected catalog record is reused for the join, so no lookup is made.
    pub async fn create_lot(&mut self, form: NewLot) -> ClientResult<&Lot> {
        let microgreen = self
            .selected
            .clone()
            .ok_or_else(|| CoreError::invalid_field("microgreen", "No plant selected"))?;

        let request = CreateLotRequest::new(microgreen.id, &form);
        let raw = self.api.create_lot(&request).await?;
        let lot = Lot::from_created(raw, &request, microgreen);

        tracing::info!(lot_id = lot.id, microgreen_id = ?lot.microgreen_id, "Lot created");
        self.lots.insert(0, lot);
        self.selected = None;
        Ok(&self.lots[0])
    }

    /// Delete a lot, then reload the whole list from the server.
    pub async fn delete_lot(&mut self, id: DbId) -> ClientResult<()> {
        self.api.delete_lot(id).await?;
        tracing::info!(lot_id = id, "Lot deleted");
        self.list_lots().await?;
        Ok(())
    }

    async fn enrich_per_lot(&self, raw: Vec<RawLot>) -> Vec<Lot> {
        let lookups = raw.iter().map(|lot| {
            let api = Arc::clone(&self.api);
            let reference = lot.reference_id();
            let lot_id = lot.id;
            async move {
                let id = reference?;
                match api.get_microgreen(id).await {
                    Ok(microgreen) => Some(microgreen),
                    Err(e) => {
                        tracing::warn!(
                            lot_id,
                            microgreen_id = id,
                            error = %e,
                            "Plant lookup failed, using placeholder"
                        );
                        Some(Microgreen::placeholder(id))
                    }
                }
            }
        });
        let resolved = join_all(lookups).await;

        raw.into_iter()
            .zip(resolved)
            .map(|(lot, microgreen)| Lot::from_raw(lot, microgreen))
            .collect()
    }

    async fn enrich_from_catalog(&self, raw: Vec<RawLot>) -> Vec<Lot> {
        let catalog: HashMap<DbId, Microgreen> = match self.api.list_microgreens().await {
            Ok(entries) => entries.into_iter().map(|m| (m.id, m)).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Catalog lookup failed, using placeholders");
                HashMap::new()
            }
        };

        raw.into_iter()
            .map(|lot| {
                let resolved = lot.reference_id().map(|id| {
                    catalog
                        .get(&id)
                        .cloned()
                        .unwrap_or_else(|| Microgreen::placeholder(id))
                });
                Lot::from_raw(lot, resolved)
            })
            .collect()
    }
}

fn warn_unreferenced(raw: &[RawLot]) {
    for lot in raw.iter().filter(|lot| lot.reference_id().is_none()) {
        tracing::warn!(lot_id = lot.id, "Lot has no plant reference, using placeholder");
    }
}
