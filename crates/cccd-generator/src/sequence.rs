//! Per-session sequence registry.
//!
//! Keyed by (jurisdiction, year, month, day). A draw picks 1-99 uniformly,
//! but only its tens digit reaches the identifier, so the registry tracks
//! that digit ([`slot_of`]) and a key holds at most [`SLOTS`] distinct
//! identifiers. A draw whose slot is taken is retried; after
//! [`MAX_ATTEMPTS`] collisions it falls back to the wall clock's
//! milliseconds modulo 100. The fallback may land on a taken slot, and the
//! caller counts it as a duplicate.

use std::collections::{BTreeSet, HashMap};

use rand::Rng;

/// Draws before the clock fallback.
pub const MAX_ATTEMPTS: usize = 100;

/// Distinct sequence digits per key.
pub const SLOTS: usize = 10;

/// The digit of a drawn sequence that survives into the identifier.
pub fn slot_of(value: u32) -> u32 {
    value / 10
}

/// Registry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceKey {
    pub jurisdiction: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl SequenceKey {
    pub fn new(jurisdiction: &str, year: i32, month: u32, day: u32) -> Self {
        Self {
            jurisdiction: jurisdiction.to_string(),
            year,
            month,
            day,
        }
    }
}

impl std::fmt::Display for SequenceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}_{:04}{:02}{:02}",
            self.jurisdiction, self.year, self.month, self.day
        )
    }
}

/// Outcome of one draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceDraw {
    /// Two-digit value, 0-99.
    pub value: u32,
    /// `true` when the retries were exhausted and the clock was used.
    pub fallback: bool,
}

/// Sequences already handed out in this session.
#[derive(Debug, Default)]
pub struct SequenceRegistry {
    used: HashMap<SequenceKey, BTreeSet<u32>>,
}

impl SequenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a sequence for `key`, preferring one not used before.
    pub fn draw<R: Rng + ?Sized>(&mut self, key: SequenceKey, rng: &mut R) -> SequenceDraw {
        self.draw_with_clock(key, rng, epoch_millis)
    }

    fn draw_with_clock<R, C>(&mut self, key: SequenceKey, rng: &mut R, clock: C) -> SequenceDraw
    where
        R: Rng + ?Sized,
        C: FnOnce() -> i64,
    {
        let used = self.used.entry(key).or_default();
        if used.len() < SLOTS {
            for _ in 0..MAX_ATTEMPTS {
                let value = rng.gen_range(1..=99);
                if used.insert(slot_of(value)) {
                    return SequenceDraw { value, fallback: false };
                }
            }
        }
        let value = clock().rem_euclid(100) as u32;
        used.insert(slot_of(value));
        SequenceDraw { value, fallback: true }
    }

    /// Record an externally chosen sequence. Returns `false` if its slot
    /// was already taken.
    pub fn mark_used(&mut self, key: SequenceKey, value: u32) -> bool {
        self.used.entry(key).or_default().insert(slot_of(value))
    }

    /// Whether the slot `value` falls into is taken for `key`.
    pub fn is_used(&self, key: &SequenceKey, value: u32) -> bool {
        self.used
            .get(key)
            .is_some_and(|s| s.contains(&slot_of(value)))
    }

    /// Total slots recorded across all keys.
    pub fn len(&self) -> usize {
        self.used.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// Number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.used.len()
    }

    pub fn clear(&mut self) {
        self.used.clear();
    }
}

fn epoch_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
