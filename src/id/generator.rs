//! Identifier generator with an explicit entropy source
//!
//! The RNG is owned by the generator and seeded once at process start, so a
//! run is reproducible under a fixed seed. Generation only fails when the RNG
//! itself reports an error, or when the clock is outside the ULID time range.

use chrono::{DateTime, Utc};
use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use uuid::Uuid;

use super::{IdError, IdStrategy, MAX_TIMESTAMP_MS, RecordId};
use crate::models::RecordMeta;

pub struct IdGenerator<R = StdRng> {
    strategy: IdStrategy,
    rng: R,
}

impl IdGenerator<StdRng> {
    /// Seed a `StdRng` from the operating system once.
    pub fn from_entropy(strategy: IdStrategy) -> Result<Self, IdError> {
        let rng = StdRng::from_rng(OsRng)?;
        Ok(Self::new(strategy, rng))
    }

    /// Deterministic generator for reproducible runs.
    pub fn seeded(strategy: IdStrategy, seed: u64) -> Self {
        Self::new(strategy, StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> IdGenerator<R> {
    pub fn new(strategy: IdStrategy, rng: R) -> Self {
        Self { strategy, rng }
    }

    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    /// Generate a new identifier for a record created at `now`.
    pub fn generate(&mut self, now: DateTime<Utc>) -> Result<RecordId, IdError> {
        let mut entropy = [0u8; 16];
        self.rng.try_fill_bytes(&mut entropy)?;

        let uuid = match self.strategy {
            IdStrategy::Random => uuid::Builder::from_random_bytes(entropy).into_uuid(),
            IdStrategy::TimeOrdered => {
                let ms = now.timestamp_millis();
                if !(0..=MAX_TIMESTAMP_MS).contains(&ms) {
                    return Err(IdError::TimestampOutOfRange(now));
                }
                // from_parts keeps the low 80 bits of the entropy
                let ulid = ulid::Ulid::from_parts(ms as u64, u128::from_be_bytes(entropy));
                Uuid::from_u128(ulid.0)
            }
        };

        Ok(RecordId::from(uuid))
    }

    /// Pre-insert hook: assign the id and creation timestamps.
    pub fn stamp(&mut self, now: DateTime<Utc>) -> Result<RecordMeta, IdError> {
        let id = self.generate(now)?;
        Ok(RecordMeta::new(id, now))
    }
}
