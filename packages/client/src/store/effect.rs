//! What changed after a store update, for the view to render.

use crate::domain::Message;

/// Severity of a transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub text: String,
}

impl Notification {
    pub fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Level::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(Level::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(Level::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Level::Error, text)
    }
}

/// A single observable change produced by applying an event
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// A message was appended to the active room
    MessageAppended(Message),
    /// Text was appended to a streaming bot message in the active room
    BotChunk {
        message_id: String,
        chunk: String,
        /// The chunk opened a new bot message
        first: bool,
    },
    BotFinished { message_id: String },
    /// Room list order or content changed
    RoomListChanged,
    /// Membership of the active room changed
    MembersChanged { room_id: String },
    /// The active room was closed because the user lost access to it
    ActiveRoomClosed { room_id: String },
    Notify(Notification),
}
