//! HTTP request handlers for the coordination API.

pub mod coordination;
pub mod status;
