//! External service module
//!
//! This module contains the probe used to learn the trusted server time.

pub mod time_source;

// Re-export main types
pub use time_source::*;
