//! Token bucket primitive.
//!
//! The token bucket algorithm allows bursting up to capacity, then refills
//! continuously at a fixed rate. Callers pass `now` explicitly so refill
//! math stays deterministic under test.

use std::time::{Duration, Instant};

/// Token bucket with continuous refill.
///
/// The bucket starts full and never exceeds its capacity. Limits must be
/// positive; `RateLimiter::register` enforces that before building one.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: f64,
    level: f64,
    refill_rate: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Bucket sized from a per-minute limit: capacity is the full minute's
    /// allowance, refilled at `limit / 60` tokens per second.
    pub fn per_minute(limit: u64, now: Instant) -> Self {
        let capacity = limit as f64;
        Self {
            capacity,
            level: capacity,
            refill_rate: capacity / 60.0,
            last_refill: now,
        }
    }

    /// Credit tokens for the time elapsed since the last refill, capping at
    /// capacity.
    pub fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.last_refill = now;

        self.level += elapsed * self.refill_rate;
        if self.level > self.capacity {
            self.level = self.capacity;
        }
    }

    /// Whether `amount` tokens are on hand. Call `refill` first.
    pub fn has(&self, amount: f64) -> bool {
        self.level >= amount
    }

    /// Remove `amount` tokens, clamping at zero.
    pub fn consume(&mut self, amount: f64) {
        self.level = (self.level - amount).max(0.0);
    }

    /// Time until `amount` tokens will be on hand at the refill rate.
    /// Zero when they already are.
    pub fn time_until(&self, amount: f64) -> Duration {
        if self.level >= amount {
            return Duration::ZERO;
        }
        let needed = amount - self.level;
        Duration::from_secs_f64(needed / self.refill_rate)
    }

    /// Whole tokens on hand, floored.
    pub fn remaining(&self) -> u64 {
        self.level.max(0.0) as u64
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }
}
