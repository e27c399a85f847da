//! Shared domain types for Waggle.
//!
//! This crate contains the core domain types used across the Waggle
//! coordinator: Bot, MessageClaim, Provider, the arbitration decision types,
//! and their associated error and configuration types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod alert;
pub mod bot;
pub mod claim;
pub mod config;
pub mod decision;
pub mod error;
pub mod provider;
