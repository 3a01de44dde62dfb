//! Primary-key identifiers
//!
//! Both strategies produce a 128-bit [`RecordId`] stored in a PostgreSQL
//! `UUID` column. Ordering is unsigned big-endian byte order, which is what
//! PostgreSQL uses for `ORDER BY id` on a `uuid` column.
//!
//! - [`IdStrategy::Random`] - UUID v4, no relation to creation time
//! - [`IdStrategy::TimeOrdered`] - ULID layout: 48-bit Unix millis + 80 random bits

pub mod generator;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use generator::IdGenerator;

/// Largest millisecond timestamp that fits the 48-bit ULID time prefix.
pub const MAX_TIMESTAMP_MS: i64 = (1 << 48) - 1;

#[derive(Debug, Error)]
pub enum IdError {
    #[error("Entropy source unavailable: {0}")]
    Entropy(#[from] rand::Error),

    #[error("Timestamp {0} is outside the 48-bit millisecond range")]
    TimestampOutOfRange(chrono::DateTime<chrono::Utc>),
}

/// Identifier generation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// UUID v4
    #[serde(alias = "uuid")]
    Random,
    /// ULID bits in a UUID column
    #[serde(alias = "ulid")]
    TimeOrdered,
}

impl IdStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdStrategy::Random => "random",
            IdStrategy::TimeOrdered => "time_ordered",
        }
    }

    /// Whether `ORDER BY id` is expected to reproduce insertion order.
    #[inline]
    pub fn is_time_ordered(&self) -> bool {
        matches!(self, IdStrategy::TimeOrdered)
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" | "uuid" => Ok(IdStrategy::Random),
            "time_ordered" | "time-ordered" | "ulid" => Ok(IdStrategy::TimeOrdered),
            other => Err(format!(
                "unknown id strategy '{}', expected random|time_ordered",
                other
            )),
        }
    }
}

/// Record primary key
///
/// Constructed only by [`IdGenerator`] or when decoding a stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    #[inline]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Reinterpret the 128 bits as a ULID (Crockford base32 when displayed)
    pub fn to_ulid(&self) -> ulid::Ulid {
        ulid::Ulid(self.0.as_u128())
    }

    /// Millisecond prefix of the identifier.
    ///
    /// Only meaningful for ids produced by [`IdStrategy::TimeOrdered`].
    pub fn timestamp_ms(&self) -> u64 {
        self.to_ulid().timestamp_ms()
    }
}

impl From<Uuid> for RecordId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<RecordId> for Uuid {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("uuid".parse::<IdStrategy>(), Ok(IdStrategy::Random));
        assert_eq!("Random".parse::<IdStrategy>(), Ok(IdStrategy::Random));
        assert_eq!("ulid".parse::<IdStrategy>(), Ok(IdStrategy::TimeOrdered));
        assert_eq!(
            "time-ordered".parse::<IdStrategy>(),
            Ok(IdStrategy::TimeOrdered)
        );
        assert!("snowflake".parse::<IdStrategy>().is_err());
    }

    #[test]
    fn test_strategy_serde_aliases() {
        let s: IdStrategy = serde_yaml::from_str("ulid").unwrap();
        assert_eq!(s, IdStrategy::TimeOrdered);
        let s: IdStrategy = serde_yaml::from_str("time_ordered").unwrap();
        assert_eq!(s, IdStrategy::TimeOrdered);
        let s: IdStrategy = serde_yaml::from_str("uuid").unwrap();
        assert_eq!(s, IdStrategy::Random);
    }

    #[test]
    fn test_record_id_orders_like_unsigned_bytes() {
        let low = RecordId::from(Uuid::from_u128(1));
        let high = RecordId::from(Uuid::from_u128(1 << 127));
        assert!(low < high);
        assert!(low.as_uuid().as_bytes() < high.as_uuid().as_bytes());
    }

    #[test]
    fn test_record_id_ulid_view() {
        let ulid = ulid::Ulid::from_parts(1_700_000_000_123, 42);
        let id = RecordId::from(Uuid::from_u128(ulid.0));
        assert_eq!(id.timestamp_ms(), 1_700_000_000_123);
        assert_eq!(id.to_ulid(), ulid);
        assert_eq!(id.to_ulid().to_string().len(), 26);
        assert_eq!(id.to_string().len(), 36);
    }
}
