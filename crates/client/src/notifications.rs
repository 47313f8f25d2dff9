//! Care reminders kept on the device.
//!
//! Records are keyed by id: the ordered id list lives under
//! [`INDEX_KEY`] and each record under `notification:{id}`, so toggling a
//! reminder rewrites one record instead of the whole collection. The flat
//! array written by earlier app versions under [`LEGACY_KEY`] is migrated
//! on first load.

use std::sync::Arc;

use chrono::Utc;
use indexmap::IndexMap;

use sprout_core::models::{Notification, NotificationDraft, NotificationView, RawNotification};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::storage::{get_json, set_json, DeviceStorage};

pub const INDEX_KEY: &str = "notifications:index";
pub const RECORD_KEY_PREFIX: &str = "notification:";
pub const LEGACY_KEY: &str = "notifications";

pub struct NotificationRepository {
    storage: Arc<dyn DeviceStorage>,
    items: IndexMap<String, Notification>,
}

impl NotificationRepository {
    pub fn new(storage: Arc<dyn DeviceStorage>) -> Self {
        Self {
            storage,
            items: IndexMap::new(),
        }
    }

    /// Read every reminder from storage, filling missing fields with defaults.
    pub async fn load(&mut self) -> ClientResult<()> {
        let storage = self.storage.as_ref();
        let now = Utc::now();

        if let Some(ids) = get_json::<Vec<String>>(storage, INDEX_KEY).await? {
            let mut items = IndexMap::with_capacity(ids.len());
            for id in ids {
                match get_json::<RawNotification>(storage, &record_key(&id)).await? {
                    Some(raw) => {
                        let mut notification = raw.normalize(now);
                        notification.id = id.clone();
                        items.insert(id, notification);
                    }
                    None => tracing::warn!(id = %id, "Indexed reminder has no record, skipping"),
                }
            }
            self.items = items;
        } else if let Some(legacy) = get_json::<Vec<RawNotification>>(storage, LEGACY_KEY).await? {
            let items: IndexMap<String, Notification> = legacy
                .into_iter()
                .map(|raw| raw.normalize(now))
                .map(|n| (n.id.clone(), n))
                .collect();
            for notification in items.values() {
                self.write_record(notification).await?;
            }
            self.items = items;
            self.write_index().await?;
            self.storage.remove_item(LEGACY_KEY).await?;
            tracing::info!(count = self.items.len(), "Migrated reminders to keyed storage");
        } else {
            self.items.clear();
        }

        tracing::debug!(count = self.items.len(), "Reminders loaded");
        Ok(())
    }

    /// All reminders in insertion order.
    pub fn list(&self) -> Vec<&Notification> {
        self.items.values().collect()
    }

    /// Reminders shown in one of the list tabs.
    pub fn filtered(&self, view: NotificationView) -> Vec<&Notification> {
        self.items.values().filter(|n| view.matches(n)).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.items.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Validate the form and append a new, not-completed reminder.
    pub async fn add(&mut self, draft: NotificationDraft) -> ClientResult<&Notification> {
        draft.validate()?;
        let notification = draft.into_notification(Utc::now());
        let id = notification.id.clone();

        self.write_record(&notification).await?;
        self.items.insert(id.clone(), notification);
        if let Err(e) = self.write_index().await {
            self.items.shift_remove(&id);
            return Err(e);
        }

        tracing::info!(id = %id, "Reminder added");
        Ok(&self.items[&id])
    }

    /// Flip the completed flag. Returns `false` when the id is unknown.
    pub async fn toggle(&mut self, id: &str) -> ClientResult<bool> {
        let Some(current) = self.items.get(id) else {
            return Ok(false);
        };
        let mut updated = current.clone();
        updated.completed = !updated.completed;

        self.write_record(&updated).await?;
        tracing::debug!(id, completed = updated.completed, "Reminder toggled");
        self.items.insert(id.to_string(), updated);
        Ok(true)
    }

    /// Delete a reminder. Returns `false` when the id is unknown.
    pub async fn remove(&mut self, id: &str) -> ClientResult<bool> {
        let Some(index) = self.items.get_index_of(id) else {
            return Ok(false);
        };
        let Some((key, removed)) = self.items.shift_remove_index(index) else {
            return Ok(false);
        };
        if let Err(e) = self.write_index().await {
            self.items.shift_insert(index, key, removed);
            return Err(e);
        }
        self.storage.remove_item(&record_key(id)).await?;

        tracing::info!(id, "Reminder removed");
        Ok(true)
    }

    /// Pull reminders from `GET /notifications` and merge them by id.
    ///
    /// Server records replace local ones with the same id, except that the
    /// local completed flag is kept. Records without an id cannot be matched
    /// on the next sync and are skipped. Returns how many records were merged.
    pub async fn sync_from_server(&mut self, api: &ApiClient) -> ClientResult<usize> {
        let now = Utc::now();
        let incoming: Vec<Notification> = api
            .list_notifications()
            .await?
            .into_iter()
            .filter(|raw| {
                let keyed = raw.id.as_deref().is_some_and(|id| !id.trim().is_empty());
                if !keyed {
                    tracing::warn!(title = ?raw.title, "Server reminder has no id, skipping");
                }
                keyed
            })
            .map(|raw| raw.normalize(now))
            .collect();

        let membership_changed = incoming.iter().any(|n| !self.items.contains_key(&n.id));
        for mut notification in incoming.iter().cloned() {
            if let Some(existing) = self.items.get(&notification.id) {
                notification.completed = existing.completed;
            }
            self.write_record(&notification).await?;
            self.items.insert(notification.id.clone(), notification);
        }
        if membership_changed {
            self.write_index().await?;
        }

        tracing::info!(count = incoming.len(), "Reminders synced from server");
        Ok(incoming.len())
    }

    async fn write_record(&self, notification: &Notification) -> ClientResult<()> {
        set_json(self.storage.as_ref(), &record_key(&notification.id), notification).await?;
        Ok(())
    }

    async fn write_index(&self) -> ClientResult<()> {
        let ids: Vec<&String> = self.items.keys().collect();
        set_json(self.storage.as_ref(), INDEX_KEY, &ids).await?;
        Ok(())
    }
}

fn record_key(id: &str) -> String {
    format!("{RECORD_KEY_PREFIX}{id}")
}
