//! Care reminders.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::dates::{format_schedule, parse_timestamp};
use crate::error::CoreError;
use crate::models::client_id;
use crate::types::Timestamp;
use crate::validation::Violations;

/// Glyphs offered by the reminder form.
pub const ICON_OPTIONS: &[&str] = &["💧", "🌱", "🌿", "🌸", "🌞", "✂️", "🌵"];

pub const DEFAULT_ICON: &str = "🌿";

/// How far ahead a reminder without a schedule is placed.
pub const DEFAULT_SCHEDULE_OFFSET_HOURS: i64 = 24;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const MESSAGE_REQUIRED: &str = "Message is required";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub icon: String,
    pub title: String,
    pub message: String,
    pub scheduled_date: Timestamp,
    pub completed: bool,
    pub created_at: Timestamp,
}

impl Notification {
    pub fn schedule_display(&self) -> String {
        format_schedule(&self.scheduled_date)
    }
}

/// A reminder as found in storage or returned by `GET /notifications`.
///
/// Anything may be missing. Stored records are camelCase, the server
/// answers in snake_case and calls the schedule `scheduled_at`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNotification {
    #[serde(default, deserialize_with = "super::text_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "scheduledDate", alias = "scheduled_at")]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

impl RawNotification {
    /// Fill every missing field: a fresh id, a schedule
    /// [`DEFAULT_SCHEDULE_OFFSET_HOURS`] after `now`, not completed, created `now`.
    pub fn normalize(self, now: Timestamp) -> Notification {
        let scheduled_date = self
            .scheduled_date
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(|| now + Duration::hours(DEFAULT_SCHEDULE_OFFSET_HOURS));
        let created_at = self
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(now);

        Notification {
            id: self
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(client_id),
            icon: self.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            title: self.title.unwrap_or_default(),
            message: self.message.unwrap_or_default(),
            scheduled_date,
            completed: self.completed.unwrap_or(false),
            created_at,
        }
    }
}

/// The reminder form.
#[derive(Debug, Clone)]
pub struct NotificationDraft {
    pub title: String,
    pub message: String,
    pub icon: String,
    pub scheduled_date: Timestamp,
}

impl Default for NotificationDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            message: String::new(),
            icon: DEFAULT_ICON.to_string(),
            scheduled_date: Utc::now(),
        }
    }
}

impl NotificationDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut violations = Violations::new();
        violations
            .require_non_blank("title", &self.title, TITLE_REQUIRED)
            .require_non_blank("message", &self.message, MESSAGE_REQUIRED);
        violations.into_result()
    }

    /// A new, not-yet-completed reminder with a fresh id.
    pub fn into_notification(self, now: Timestamp) -> Notification {
        Notification {
            id: client_id(),
            icon: if self.icon.trim().is_empty() {
                DEFAULT_ICON.to_string()
            } else {
                self.icon
            },
            title: self.title.trim().to_string(),
            message: self.message.trim().to_string(),
            scheduled_date: self.scheduled_date,
            completed: false,
            created_at: now,
        }
    }
}

/// Derived list views; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationView {
    Upcoming,
    Completed,
}

impl NotificationView {
    pub fn matches(self, notification: &Notification) -> bool {
        match self {
            NotificationView::Upcoming => !notification.completed,
            NotificationView::Completed => notification.completed,
        }
    }
}
