//! Kaiwa chat client library.
//!
//! Talks to a chat backend over REST for accounts and rooms and over a
//! WebSocket push channel for realtime events, keeping a local store of the
//! room list and the open room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod store;
pub mod usecase;

// terminal view
pub mod client;

pub mod config;
pub mod error;
