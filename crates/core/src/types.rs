/// Server-assigned numeric identifiers (lots, users, catalog entries).
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
