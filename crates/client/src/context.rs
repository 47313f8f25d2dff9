//! Wiring for one client process.

use std::sync::Arc;

use chrono::Duration;
use sprout_core::types::DbId;

use crate::api::ApiClient;
use crate::auth::AuthService;
use crate::catalog::MicrogreenCatalog;
use crate::config::{ClientConfig, JournalMode};
use crate::error::ClientResult;
use crate::journal::Journal;
use crate::lots::LotRepository;
use crate::notifications::NotificationRepository;
use crate::session::Session;
use crate::storage::{DeviceStorage, FileStorage};

/// Shared handles every repository is built from.
#[derive(Clone)]
pub struct ClientContext {
    pub config: Arc<ClientConfig>,
    pub storage: Arc<dyn DeviceStorage>,
    pub api: Arc<ApiClient>,
}

impl ClientContext {
    /// Open file-backed device storage under `config.data_dir` and restore the session.
    pub async fn open(config: ClientConfig) -> ClientResult<Self> {
        let storage: Arc<dyn DeviceStorage> = Arc::new(FileStorage::open(&config.data_dir).await?);
        Self::with_storage(config, storage).await
    }

    /// Build a context on top of an existing storage backend.
    pub async fn with_storage(
        config: ClientConfig,
        storage: Arc<dyn DeviceStorage>,
    ) -> ClientResult<Self> {
        let ttl = config.session_ttl_hours.map(Duration::hours);
        let session = Session::restore(Arc::clone(&storage), ttl).await?;
        let api = Arc::new(ApiClient::new(&config, session)?);
        tracing::debug!(api_url = %config.api_url, "Client context ready");

        Ok(Self {
            config: Arc::new(config),
            storage,
            api,
        })
    }

    pub fn session(&self) -> &Session {
        self.api.session()
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(Arc::clone(&self.api))
    }

    pub fn catalog(&self) -> MicrogreenCatalog {
        MicrogreenCatalog::new(Arc::clone(&self.api))
    }

    pub fn lots(&self) -> LotRepository {
        LotRepository::new(Arc::clone(&self.api), self.config.lot_enrichment)
    }

    /// The journal of one lot, stored where the configuration says.
    pub fn journal(&self, lot_id: DbId) -> Journal {
        match self.config.journal_mode {
            JournalMode::Local => Journal::local(Arc::clone(&self.storage), lot_id),
            JournalMode::Remote => Journal::remote(Arc::clone(&self.api), lot_id),
        }
    }

    pub fn notifications(&self) -> NotificationRepository {
        NotificationRepository::new(Arc::clone(&self.storage))
    }
}
