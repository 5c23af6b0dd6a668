//! Data Transfer Objects (DTOs) for the chat client.
//!
//! DTOs are organized by protocol:
//! - `http`: REST request/response bodies
//! - `socket`: socket event envelopes

pub mod http;
pub mod socket;
