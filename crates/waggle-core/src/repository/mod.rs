//! Repository trait definitions (ports).
//!
//! These traits define the storage interface the coordinator runs against.
//! The in-memory implementations in `memory` are the only backend today;
//! the traits keep the coordinator independent of how claims and bots are
//! stored.

pub mod bot;
pub mod claim;
pub mod memory;
