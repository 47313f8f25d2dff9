//! Sprout API client.
//!
//! Talks to the microgreen tracking API and keeps the small amount of
//! state the app holds on the device:
//!
//! - [`ApiClient`]: reqwest wrapper with fixed base URL, JSON headers,
//!   timeout and bearer authentication taken from the injected [`Session`].
//! - [`LotRepository`]: lots joined with their catalog records.
//! - [`Journal`]: per-lot growth log, stored locally or on the server.
//! - [`NotificationRepository`]: reminders kept in [`DeviceStorage`].
//! - [`Alert`]: user-facing rendering of every [`ClientError`].

pub mod alert;
pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod journal;
pub mod lots;
pub mod notifications;
pub mod session;
pub mod storage;

pub use alert::{Action, Alert};
pub use api::ApiClient;
pub use auth::AuthService;
pub use catalog::MicrogreenCatalog;
pub use config::{ClientConfig, JournalMode, LotEnrichment, Platform};
pub use context::ClientContext;
pub use error::{ClientError, ClientResult};
pub use journal::{EntryExpansion, Journal};
pub use lots::LotRepository;
pub use notifications::NotificationRepository;
pub use session::Session;
pub use storage::{DeviceStorage, FileStorage, MemoryStorage, StorageError};
