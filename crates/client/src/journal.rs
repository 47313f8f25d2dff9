//! Phenological journal of one lot.
//!
//! One component with two backends: [`JournalBackend::Local`] keeps the
//! newest-first entry list as a single JSON blob in device storage and
//! rewrites it on every change; [`JournalBackend::Remote`] reads and
//! creates entries through the API. Loading never creates anything.

use std::collections::HashSet;
use std::sync::Arc;

use sprout_core::models::{CreateEntryRequest, EntryDraft, JournalEntry};
use sprout_core::types::DbId;

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::storage::{get_json, set_json, DeviceStorage};

/// Storage key prefix of local journals; the lot id follows.
pub const LOCAL_KEY_PREFIX: &str = "phenological_entries:";

/// Device-wide journal written by earlier app versions, not tied to a lot.
pub const LEGACY_KEY: &str = "phenologicalEntries";

pub enum JournalBackend {
    Local(Arc<dyn DeviceStorage>),
    Remote(Arc<ApiClient>),
}

pub struct Journal {
    lot_id: DbId,
    backend: JournalBackend,
    entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn local(storage: Arc<dyn DeviceStorage>, lot_id: DbId) -> Self {
        Self::new(JournalBackend::Local(storage), lot_id)
    }

    pub fn remote(api: Arc<ApiClient>, lot_id: DbId) -> Self {
        Self::new(JournalBackend::Remote(api), lot_id)
    }

    pub fn new(backend: JournalBackend, lot_id: DbId) -> Self {
        Self {
            lot_id,
            backend,
            entries: Vec::new(),
        }
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Read the journal. A local journal that was never written is empty.
    pub async fn load(&mut self) -> ClientResult<&[JournalEntry]> {
        self.entries = match &self.backend {
            JournalBackend::Local(storage) => {
                get_json::<Vec<JournalEntry>>(storage.as_ref(), &self.storage_key())
                    .await?
                    .unwrap_or_default()
            }
            JournalBackend::Remote(api) => {
                let mut entries: Vec<JournalEntry> = api
                    .list_entries(self.lot_id)
                    .await?
                    .into_iter()
                    .map(JournalEntry::from)
                    .collect();
                entries.sort_by(|a, b| b.date.cmp(&a.date));
                entries
            }
        };
        tracing::debug!(lot_id = self.lot_id, count = self.entries.len(), "Journal loaded");
        Ok(&self.entries)
    }

    /// Validate the draft and, if it passes, prepend the entry and persist.
    ///
    /// On a validation failure nothing changes and the error lists every
    /// missing field. On success the draft is reset to a blank one.
    pub async fn add_entry(&mut self, draft: &mut EntryDraft) -> ClientResult<&JournalEntry> {
        let entry = match &self.backend {
            JournalBackend::Local(storage) => {
                draft.validate()?;
                let entry = draft.clone().into_entry();

                let mut updated = Vec::with_capacity(self.entries.len() + 1);
                updated.push(entry);
                updated.extend(self.entries.iter().cloned());
                set_json(storage.as_ref(), &self.storage_key(), &updated).await?;

                self.entries = updated;
                *draft = EntryDraft::new();
                &self.entries[0]
            }
            JournalBackend::Remote(api) => {
                draft.validate_numeric()?;
                let request = CreateEntryRequest::from_entry(&draft.clone().into_entry())?;
                let created = api.create_entry(self.lot_id, &request).await?;

                self.entries.insert(0, JournalEntry::from(created));
                *draft = EntryDraft::new();
                &self.entries[0]
            }
        };
        tracing::info!(lot_id = self.lot_id, entry_id = %entry.id, "Journal entry added");
        Ok(entry)
    }

    /// Remove an entry by id. Returns `false` when no entry has that id.
    pub async fn delete_entry(&mut self, id: &str) -> ClientResult<bool> {
        let JournalBackend::Local(storage) = &self.backend else {
            return Err(ClientError::Unsupported("deleting journal entries on the server"));
        };
        if !self.entries.iter().any(|e| e.id == id) {
            return Ok(false);
        }

        let updated: Vec<JournalEntry> =
            self.entries.iter().filter(|e| e.id != id).cloned().collect();
        set_json(storage.as_ref(), &self.storage_key(), &updated).await?;
        self.entries = updated;

        tracing::info!(lot_id = self.lot_id, entry_id = id, "Journal entry deleted");
        Ok(true)
    }

    /// Move the device-wide journal of earlier app versions into this lot.
    ///
    /// Entries whose id is already present are dropped, the merged list is
    /// re-sorted newest first and the legacy key is removed. Returns how many
    /// entries were adopted; `0` when there is nothing to adopt.
    pub async fn adopt_legacy_entries(&mut self) -> ClientResult<usize> {
        let JournalBackend::Local(storage) = &self.backend else {
            return Err(ClientError::Unsupported("adopting a device journal into a server journal"));
        };
        let Some(legacy) = get_json::<Vec<JournalEntry>>(storage.as_ref(), LEGACY_KEY).await? else {
            return Ok(0);
        };

        let mut updated = get_json::<Vec<JournalEntry>>(storage.as_ref(), &self.storage_key())
            .await?
            .unwrap_or_default();
        let before = updated.len();
        for entry in legacy {
            if !updated.iter().any(|e| e.id == entry.id) {
                updated.push(entry);
            }
        }
        let adopted = updated.len() - before;
        updated.sort_by(|a, b| b.date.cmp(&a.date));

        set_json(storage.as_ref(), &self.storage_key(), &updated).await?;
        storage.remove_item(LEGACY_KEY).await?;
        self.entries = updated;

        tracing::info!(lot_id = self.lot_id, adopted, "Legacy journal adopted");
        Ok(adopted)
    }

    /// Photo of the newest entry that has one.
    pub fn latest_image(&self) -> Option<&str> {
        self.entries.iter().find_map(|e| e.image_uri.as_deref())
    }

    fn storage_key(&self) -> String {
        format!("{LOCAL_KEY_PREFIX}{}", self.lot_id)
    }
}

/// Which entries are shown expanded. Presentation state only.
#[derive(Debug, Default, Clone)]
pub struct EntryExpansion {
    expanded: HashSet<String>,
}

impl EntryExpansion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip an entry between expanded and collapsed; returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }
}
