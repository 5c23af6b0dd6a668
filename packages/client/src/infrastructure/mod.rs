//! Infrastructure layer: concrete adapters for the REST backend, the socket
//! channel and token storage.

pub mod api;
pub mod dto;
pub mod socket;
pub mod storage;
