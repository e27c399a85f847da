//! Coordination and rate limiting logic for Waggle.
//!
//! This crate defines the "ports" (repository traits) that storage backends
//! implement, plus the two services built on top of them: the claim
//! `Coordinator` and the provider `RateLimiter`. It depends only on
//! `waggle-types` -- never on any HTTP or database crate.

pub mod alert;
pub mod coordinator;
pub mod ratelimit;
pub mod repository;
