//! Wire and domain models.
//!
//! Raw types mirror whatever the API or device storage hands back, with
//! every field optional where the source is known to omit it. Each raw
//! type is converted exactly once into its fully-populated domain type.

pub mod journal;
pub mod lot;
pub mod microgreen;
pub mod notification;
pub mod user;

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Deserializer};

pub use journal::{CreateEntryRequest, EntryDraft, JournalEntry, RemoteEntry};
pub use lot::{CreateLotRequest, Lot, NewLot, RawLot};
pub use microgreen::{CatalogResponse, Microgreen};
pub use notification::{Notification, NotificationDraft, NotificationView, RawNotification};
pub use user::{Credentials, TokenResponse};

static LAST_CLIENT_ID: AtomicI64 = AtomicI64::new(0);

/// Client-generated identifier: the current time in milliseconds, bumped
/// when needed so that ids handed out by this process never repeat.
pub fn client_id() -> String {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_CLIENT_ID.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_CLIENT_ID.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return next.to_string(),
            Err(actual) => last = actual,
        }
    }
}

/// Accept a JSON string or number (or null) and keep it as text.
pub(crate) fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
