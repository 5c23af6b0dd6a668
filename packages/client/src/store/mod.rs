//! Client-side realtime state: the room list, the active room and the reducer
//! that applies socket events to them.

mod chat_store;
mod effect;

pub use chat_store::ChatStore;
pub use effect::{Effect, Level, Notification};
