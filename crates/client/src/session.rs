//! The signed-in session.
//!
//! A [`Session`] owns the bearer token and is injected into the
//! [`ApiClient`](crate::api::ApiClient). Clones share state, so a sign-out
//! or a server-side rejection seen by one component is seen by all.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sprout_core::types::Timestamp;
use tokio::sync::RwLock;

use crate::error::{ClientError, ClientResult};
use crate::storage::{set_json, DeviceStorage};

/// Storage key of the persisted token.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    issued_at: Timestamp,
}

#[derive(Clone)]
pub struct Session {
    storage: Arc<dyn DeviceStorage>,
    ttl: Option<Duration>,
    current: Arc<RwLock<Option<StoredToken>>>,
}

impl Session {
    /// Load the persisted token, if any.
    ///
    /// A bare string (the format written by earlier app versions) is
    /// accepted and treated as issued now.
    pub async fn restore(
        storage: Arc<dyn DeviceStorage>,
        ttl: Option<Duration>,
    ) -> ClientResult<Self> {
        let stored = match storage.get_item(TOKEN_KEY).await? {
            None => None,
            Some(raw) => match serde_json::from_str::<StoredToken>(&raw) {
                Ok(stored) => Some(stored),
                Err(_) if !raw.trim().is_empty() => Some(StoredToken {
                    token: raw.trim().to_string(),
                    issued_at: Utc::now(),
                }),
                Err(_) => None,
            },
        };

        let session = Self {
            storage,
            ttl,
            current: Arc::new(RwLock::new(stored)),
        };
        tracing::debug!(signed_in = session.token().await.is_some(), "Session restored");
        Ok(session)
    }

    /// Persist a freshly issued token and make it current.
    pub async fn start(&self, token: String) -> ClientResult<()> {
        let stored = StoredToken {
            token,
            issued_at: Utc::now(),
        };
        set_json(self.storage.as_ref(), TOKEN_KEY, &stored).await?;
        *self.current.write().await = Some(stored);
        tracing::info!("Session started");
        Ok(())
    }

    /// Forget the token, in memory and on the device.
    pub async fn clear(&self) -> ClientResult<()> {
        *self.current.write().await = None;
        self.storage.remove_item(TOKEN_KEY).await?;
        tracing::info!("Session cleared");
        Ok(())
    }

    /// The current token, or `None` when signed out or expired.
    /// An expired token is cleared on the way.
    pub async fn token(&self) -> Option<String> {
        let stored = self.current.read().await.clone()?;
        if self.is_expired(&stored) {
            tracing::info!(issued_at = %stored.issued_at, "Session expired");
            if let Err(e) = self.clear().await {
                tracing::warn!(error = %e, "Failed to clear expired session");
            }
            return None;
        }
        Some(stored.token)
    }

    /// The current token, or [`ClientError::Unauthenticated`].
    pub async fn require_token(&self) -> ClientResult<String> {
        self.token().await.ok_or(ClientError::Unauthenticated)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token().await.is_some()
    }

    /// When the current token stops being used, if a lifetime is configured.
    pub async fn expires_at(&self) -> Option<Timestamp> {
        let ttl = self.ttl?;
        let stored = self.current.read().await.clone()?;
        Some(stored.issued_at + ttl)
    }

    fn is_expired(&self, stored: &StoredToken) -> bool {
        self.ttl
            .is_some_and(|ttl| Utc::now() >= stored.issued_at + ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn start_persists_and_restore_reads_back() {
        let storage: Arc<dyn DeviceStorage> = Arc::new(MemoryStorage::new());
        let session = Session::restore(storage.clone(), None).await.unwrap();
        assert_matches!(session.require_token().await, Err(ClientError::Unauthenticated));

        session.start("tok-1".into()).await.unwrap();
        assert_eq!(session.token().await.as_deref(), Some("tok-1"));

        let restored = Session::restore(storage, None).await.unwrap();
        assert_eq!(restored.require_token().await.unwrap(), "tok-1");
    }

    #[tokio::test]
    async fn clones_share_the_token() {
        let storage: Arc<dyn DeviceStorage> = Arc::new(MemoryStorage::new());
        let session = Session::restore(storage, None).await.unwrap();
        let other = session.clone();

        session.start("shared".into()).await.unwrap();
        assert!(other.is_authenticated().await);

        other.clear().await.unwrap();
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn bare_string_token_is_accepted() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(TOKEN_KEY, "legacy-token").await.unwrap();
        let session = Session::restore(storage, None).await.unwrap();
        assert_eq!(session.token().await.as_deref(), Some("legacy-token"));
    }

    #[tokio::test]
    async fn expired_token_is_cleared() {
        let storage = Arc::new(MemoryStorage::new());
        let old = StoredToken {
            token: "old".into(),
            issued_at: Utc::now() - Duration::hours(5),
        };
        set_json(storage.as_ref(), TOKEN_KEY, &old).await.unwrap();

        let session = Session::restore(storage.clone(), Some(Duration::hours(1)))
            .await
            .unwrap();
        assert_matches!(session.require_token().await, Err(ClientError::Unauthenticated));
        assert_eq!(storage.get_item(TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn expiry_is_reported() {
        let storage: Arc<dyn DeviceStorage> = Arc::new(MemoryStorage::new());
        let session = Session::restore(storage, Some(Duration::hours(2))).await.unwrap();
        assert!(session.expires_at().await.is_none());
        session.start("t".into()).await.unwrap();
        let expires = session.expires_at().await.unwrap();
        assert!(expires > Utc::now() + Duration::minutes(119));
    }
}
