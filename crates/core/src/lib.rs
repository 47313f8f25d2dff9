//! Domain types for the Sprout microgreen tracker.
//!
//! Holds the wire and domain models (lots, plant catalog entries,
//! journal entries, notifications), the single normalization boundary
//! that turns loosely-shaped API payloads into fully-populated records,
//! form validation, and date display helpers. Nothing here performs I/O.

pub mod dates;
pub mod error;
pub mod models;
pub mod types;
pub mod validation;
