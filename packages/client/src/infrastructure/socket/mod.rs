//! Socket channel adapters.

mod connection;
mod emitter;

pub use connection::{SocketStream, connect};
pub use emitter::ChannelEmitter;
