//! Plant catalog entries.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Name shown for a plant whose catalog record could not be resolved.
pub const UNKNOWN_MICROGREEN_NAME: &str = "unknown";

/// Image used for placeholder catalog records.
pub const DEFAULT_PLANT_IMAGE: &str = "default_plant.png";

/// A plant-type catalog entry (read-only from the client's side).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Microgreen {
    pub id: DbId,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "avatar", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub days_to_grow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<String>,
}

impl Microgreen {
    /// Stand-in used when the catalog lookup for `id` fails.
    pub fn placeholder(id: DbId) -> Self {
        Self {
            id,
            name: UNKNOWN_MICROGREEN_NAME.to_string(),
            image_url: Some(DEFAULT_PLANT_IMAGE.to_string()),
            days_to_grow: None,
            temperature: None,
            light: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.name == UNKNOWN_MICROGREEN_NAME
    }

    /// Case-insensitive substring match on the name. An empty query matches everything.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty() || self.name.to_lowercase().contains(&query)
    }
}

/// `GET /microgreens` has been seen returning a bare array as well as an
/// object wrapping it. Anything else decodes as an empty catalog.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CatalogResponse {
    List(Vec<Microgreen>),
    Wrapped { microgreens: Vec<Microgreen> },
    Other(serde_json::Value),
}

impl CatalogResponse {
    pub fn into_entries(self) -> Vec<Microgreen> {
        match self {
            CatalogResponse::List(entries) | CatalogResponse::Wrapped { microgreens: entries } => {
                entries
            }
            CatalogResponse::Other(_) => Vec::new(),
        }
    }
}
