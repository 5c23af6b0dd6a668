//! Shared utilities for the Kaiwa chat client crates.

pub mod logger;
pub mod time;
