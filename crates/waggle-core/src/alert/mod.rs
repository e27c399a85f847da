//! Alert bus for operational events.
//!
//! Provides an `AlertBus` that distributes `Alert` messages to all
//! subscribers via a `tokio::sync::broadcast` channel.

pub mod bus;

pub use bus::AlertBus;
