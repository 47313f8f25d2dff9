//! Phenological journal entries.

use serde::{Deserialize, Serialize};

use crate::dates::{format_date, today_iso};
use crate::error::CoreError;
use crate::models::client_id;
use crate::types::DbId;
use crate::validation::{is_blank, Violations};

pub const HEIGHT_REQUIRED: &str = "Height is not filled in";
pub const VISUAL_CHANGES_REQUIRED: &str = "Visual changes are not filled in";
pub const HEIGHT_NOT_NUMERIC: &str = "Height must be a number";

/// One dated growth observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub date: String,
    pub height: String,
    pub visual_changes: String,
    #[serde(default)]
    pub watering: String,
    #[serde(default)]
    pub lighting: String,
    #[serde(default)]
    pub image_uri: Option<String>,
}

impl JournalEntry {
    /// Height as a number, accepting a decimal comma.
    pub fn height_cm(&self) -> Option<f64> {
        parse_height(&self.height)
    }

    pub fn date_display(&self) -> String {
        format_date(Some(&self.date))
    }
}

/// The authoring form for a journal entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub id: String,
    pub date: String,
    pub height: String,
    pub visual_changes: String,
    pub watering: String,
    pub lighting: String,
    pub image_uri: Option<String>,
}

impl Default for EntryDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryDraft {
    /// A blank draft dated today with a fresh client id.
    pub fn new() -> Self {
        Self {
            id: client_id(),
            date: today_iso(),
            height: String::new(),
            visual_changes: String::new(),
            watering: String::new(),
            lighting: String::new(),
            image_uri: None,
        }
    }

    /// Height and visual changes are mandatory.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut violations = Violations::new();
        violations
            .require_non_blank("height", &self.height, HEIGHT_REQUIRED)
            .require_non_blank("visual_changes", &self.visual_changes, VISUAL_CHANGES_REQUIRED);
        violations.into_result()
    }

    /// [`validate`](Self::validate) plus a numeric height, which the server requires.
    pub fn validate_numeric(&self) -> Result<(), CoreError> {
        self.validate()?;
        if parse_height(&self.height).is_none() {
            return Err(CoreError::invalid_field("height", HEIGHT_NOT_NUMERIC));
        }
        Ok(())
    }

    pub fn into_entry(self) -> JournalEntry {
        JournalEntry {
            id: self.id,
            date: self.date,
            height: self.height.trim().to_string(),
            visual_changes: self.visual_changes.trim().to_string(),
            watering: self.watering,
            lighting: self.lighting,
            image_uri: self.image_uri.filter(|uri| !is_blank(uri)),
        }
    }
}

fn parse_height(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|h| h.is_finite())
}

/// Body of `POST /lots/{id}/entry`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEntryRequest {
    pub entry_date: String,
    pub description: String,
    pub height: f64,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub watering: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub lighting: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub photo_url: Option<String>,
}

impl CreateEntryRequest {
    /// Build the request body. The entry must have a numeric height.
    pub fn from_entry(entry: &JournalEntry) -> Result<Self, CoreError> {
        let height = entry
            .height_cm()
            .ok_or_else(|| CoreError::invalid_field("height", HEIGHT_NOT_NUMERIC))?;
        Ok(Self {
            entry_date: entry.date.clone(),
            description: entry.visual_changes.clone(),
            height,
            watering: entry.watering.clone(),
            lighting: entry.lighting.clone(),
            photo_url: entry.image_uri.clone(),
        })
    }
}

/// A journal entry as stored by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteEntry {
    pub id: DbId,
    #[serde(default)]
    pub lot_id: Option<DbId>,
    pub entry_date: String,
    #[serde(default)]
    pub description: String,
    pub height: f64,
    #[serde(default)]
    pub watering: Option<String>,
    #[serde(default)]
    pub lighting: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl From<RemoteEntry> for JournalEntry {
    fn from(remote: RemoteEntry) -> Self {
        JournalEntry {
            id: remote.id.to_string(),
            date: remote.entry_date,
            height: remote.height.to_string(),
            visual_changes: remote.description,
            watering: remote.watering.unwrap_or_default(),
            lighting: remote.lighting.unwrap_or_default(),
            image_uri: remote.photo_url.filter(|uri| !is_blank(uri)),
        }
    }
}
