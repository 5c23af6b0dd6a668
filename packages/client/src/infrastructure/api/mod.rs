//! REST backend adapters.

mod http;

pub use http::HttpChatApi;
