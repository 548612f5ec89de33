// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Identity
//!
//! Entity ids are generated by the caller, not the CRUD API: a random integer
//! below one million rendered as a decimal string. Collisions are possible;
//! services that already hold the current collection pass it to
//! [`allocate_id`] so a colliding draw is retried.

use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

/// Upper bound (exclusive) of generated numeric ids.
pub const ID_SPACE: u32 = 1_000_000;

/// Draws retried before accepting a colliding id.
pub const MAX_ID_ATTEMPTS: usize = 8;

pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random numeric ids, the format the CRUD API and existing data use.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> String {
        rand::rng().random_range(0..ID_SPACE).to_string()
    }
}

/// Deterministic ids (`start`, `start + 1`, ...), for tests and fixtures.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        self.next.fetch_add(1, Ordering::Relaxed).to_string()
    }
}

/// Draws ids until one is not `taken`, giving up after [`MAX_ID_ATTEMPTS`]
/// and returning the last draw.
pub fn allocate_id<F>(generator: &dyn IdGenerator, taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut id = generator.next_id();
    for _ in 1..MAX_ID_ATTEMPTS {
        if !taken(&id) {
            return id;
        }
        tracing::debug!(id = %id, "Generated id collides with an existing entity, drawing again");
        id = generator.next_id();
    }
    if taken(&id) {
        tracing::warn!(id = %id, "Could not draw a free id, accepting collision");
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_ids_are_numeric_and_bounded() {
        let generator = RandomIdGenerator;
        for _ in 0..100 {
            let id: u32 = generator.next_id().parse().unwrap();
            assert!(id < ID_SPACE);
        }
    }

    #[test]
    fn test_allocate_skips_taken_ids() {
        let generator = SequentialIdGenerator::starting_at(1);
        let id = allocate_id(&generator, |id| id == "1" || id == "2");
        assert_eq!(id, "3");
    }

    #[test]
    fn test_allocate_gives_up_after_max_attempts() {
        let generator = SequentialIdGenerator::starting_at(1);
        let id = allocate_id(&generator, |_| true);
        assert_eq!(id, MAX_ID_ATTEMPTS.to_string());
    }
}
