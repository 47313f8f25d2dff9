//! Lots: planted batches of one microgreen.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::dates::format_date;
use crate::models::microgreen::Microgreen;
use crate::types::{DbId, Timestamp};

/// Placeholder plant id for a lot whose payload carries no plant reference.
pub const UNREFERENCED_MICROGREEN_ID: DbId = 0;

/// A lot as the API returns it.
///
/// The server names the plant reference `microgreen_type`; older payloads
/// use `microgreen_id`. `POST /lots/` may answer with nothing but `{ "id" }`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLot {
    pub id: DbId,
    #[serde(default)]
    pub user_id: Option<DbId>,
    #[serde(default, alias = "microgreen_type")]
    pub microgreen_id: Option<DbId>,
    #[serde(default)]
    pub microgreen: Option<Microgreen>,
    #[serde(default)]
    pub sowing_date: Option<String>,
    #[serde(default)]
    pub substrate_type: Option<String>,
    #[serde(default)]
    pub expected_harvest_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A normalized lot. `microgreen` is always populated, with a placeholder
/// when the catalog record could not be resolved. `microgreen_id` is `None`
/// only when the server sent no plant reference at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub microgreen_id: Option<DbId>,
    pub microgreen: Microgreen,
    pub sowing_date: Option<String>,
    pub substrate_type: String,
    pub expected_harvest_date: Option<String>,
    pub created_at: Option<String>,
    pub avatar_url: Option<String>,
}

impl RawLot {
    /// Plant reference id, taken from the embedded record when the field itself is missing.
    pub fn reference_id(&self) -> Option<DbId> {
        self.microgreen_id
            .or_else(|| self.microgreen.as_ref().map(|m| m.id))
    }
}

impl Lot {
    /// Normalize a listed lot, joining it with its resolved catalog record.
    ///
    /// `resolved` wins over any record embedded in the payload; when neither
    /// is available the placeholder is used. A lot without any reference
    /// gets a placeholder under [`UNREFERENCED_MICROGREEN_ID`].
    pub fn from_raw(raw: RawLot, resolved: Option<Microgreen>) -> Self {
        let microgreen_id = raw.reference_id();
        let microgreen = resolved.or(raw.microgreen).unwrap_or_else(|| {
            Microgreen::placeholder(microgreen_id.unwrap_or(UNREFERENCED_MICROGREEN_ID))
        });

        Self {
            id: raw.id,
            user_id: raw.user_id,
            microgreen_id,
            microgreen,
            sowing_date: raw.sowing_date,
            substrate_type: raw.substrate_type.unwrap_or_default(),
            expected_harvest_date: raw.expected_harvest_date,
            created_at: raw.created_at,
            avatar_url: raw.avatar_url,
        }
    }

    /// Normalize the response of `POST /lots/`, filling whatever the server
    /// left out from the request that created it.
    pub fn from_created(raw: RawLot, request: &CreateLotRequest, microgreen: Microgreen) -> Self {
        Self {
            id: raw.id,
            user_id: raw.user_id,
            microgreen_id: raw.reference_id().or(Some(request.microgreen_id)),
            microgreen,
            sowing_date: raw.sowing_date.or_else(|| Some(request.sowing_date.clone())),
            substrate_type: raw
                .substrate_type
                .unwrap_or_else(|| request.substrate_type.clone()),
            expected_harvest_date: raw
                .expected_harvest_date
                .or_else(|| Some(request.expected_harvest_date.clone())),
            created_at: raw.created_at,
            avatar_url: raw.avatar_url,
        }
    }

    pub fn sowing_date_display(&self) -> String {
        format_date(self.sowing_date.as_deref())
    }

    pub fn harvest_date_display(&self) -> String {
        format_date(self.expected_harvest_date.as_deref())
    }
}

/// Form input for a new lot. The plant is chosen separately.
#[derive(Debug, Clone)]
pub struct NewLot {
    pub sowing_date: Timestamp,
    pub substrate_type: String,
    pub expected_harvest_date: Timestamp,
}

/// Body of `POST /lots/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateLotRequest {
    pub microgreen_id: DbId,
    pub sowing_date: String,
    pub substrate_type: String,
    pub expected_harvest_date: String,
}

impl CreateLotRequest {
    pub fn new(microgreen_id: DbId, lot: &NewLot) -> Self {
        Self {
            microgreen_id,
            sowing_date: lot.sowing_date.to_rfc3339_opts(SecondsFormat::Millis, true),
            substrate_type: lot.substrate_type.clone(),
            expected_harvest_date: lot
                .expected_harvest_date
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
