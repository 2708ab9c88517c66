//! Optimistic concurrency tokens.
//!
//! An ETag is the base64 encoding of a row's `updated_at` rendered as an
//! RFC 3339 UTC timestamp with nanosecond precision.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Opaque version token derived from a row's last-updated timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ETag(String);

impl ETag {
    /// Generates the token for a timestamp.
    pub fn generate<Tz: TimeZone>(updated_at: &DateTime<Tz>) -> Self {
        let utc = updated_at.with_timezone(&Utc);
        let stamp = utc.to_rfc3339_opts(SecondsFormat::Nanos, true);
        Self(STANDARD.encode(stamp))
    }

    /// Wraps a token received from a caller.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns true if this token was generated from `updated_at`.
    pub fn matches<Tz: TimeZone>(&self, updated_at: &DateTime<Tz>) -> bool {
        *self == Self::generate(updated_at)
    }

    /// Returns the encoded token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ETag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
