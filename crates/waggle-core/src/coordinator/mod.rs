//! Claim arbitration for multi-bot chats.
//!
//! The `Coordinator` decides which bot answers which message: it keeps the
//! bot roster, classifies message priority, runs weighted selection, and
//! arbitrates exclusive claims with TTL-bounded leases. A background sweeper
//! reclaims expired leases.

pub mod priority;
pub mod selection;
pub mod service;
pub mod stats;
pub mod sweeper;

pub use service::Coordinator;
pub use stats::{CoordinatorStats, StatsSnapshot};
pub use sweeper::{DEFAULT_SWEEP_INTERVAL, SweeperHandle, spawn_sweeper};
