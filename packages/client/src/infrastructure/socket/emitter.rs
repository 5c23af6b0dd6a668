//! Channel-backed SocketEmitter.
//!
//! Use cases queue events on an unbounded channel; the session's writer task
//! drains it into the socket. The sender is swapped on every (re)connection and
//! detached while disconnected, so emits fail fast instead of piling up.

use std::sync::Mutex;

use tokio::sync::mpsc;

use crate::{
    domain::{Email, MessageContent, SocketEmitter},
    error::ClientError,
    infrastructure::dto::socket::ClientEvent,
};

/// SocketEmitter that forwards events to the active connection's writer task
#[derive(Debug, Default)]
pub struct ChannelEmitter {
    sender: Mutex<Option<mpsc::UnboundedSender<ClientEvent>>>,
}

impl ChannelEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route events to a new connection, returning the receiver its writer drains
    pub fn attach(&self) -> mpsc::UnboundedReceiver<ClientEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut sender) = self.sender.lock() {
            *sender = Some(tx);
        }
        rx
    }

    /// Stop routing events; later emits fail until the next `attach`
    pub fn detach(&self) {
        if let Ok(mut sender) = self.sender.lock() {
            *sender = None;
        }
    }

    fn emit(&self, event: ClientEvent) -> Result<(), ClientError> {
        let sender = self
            .sender
            .lock()
            .map_err(|_| ClientError::Connection("emitter lock poisoned".to_string()))?;
        let Some(sender) = sender.as_ref() else {
            return Err(ClientError::Connection("not connected".to_string()));
        };
        tracing::debug!("Emitting {:?}", event);
        sender
            .send(event)
            .map_err(|_| ClientError::Connection("connection closed".to_string()))
    }
}

impl SocketEmitter for ChannelEmitter {
    fn join_room(&self, room_id: &str) -> Result<(), ClientError> {
        self.emit(ClientEvent::JoinRoom {
            room_id: room_id.to_string(),
        })
    }

    fn send_message(&self, room_id: &str, content: &MessageContent) -> Result<(), ClientError> {
        self.emit(ClientEvent::SendMessage {
            room_id: room_id.to_string(),
            content: content.as_str().to_string(),
        })
    }

    fn invite_to_room(&self, room_id: &str, user_id: &str) -> Result<(), ClientError> {
        self.emit(ClientEvent::InviteToRoom {
            room_id: room_id.to_string(),
            user_id: user_id.to_string(),
        })
    }

    fn remove_from_room(&self, room_id: &str, user_id: &str) -> Result<(), ClientError> {
        self.emit(ClientEvent::RemoveFromRoom {
            room_id: room_id.to_string(),
            user_id: user_id.to_string(),
        })
    }

    fn add_friend(&self, email: &Email) -> Result<(), ClientError> {
        self.emit(ClientEvent::AddFriend {
            email: email.as_str().to_string(),
        })
    }
}
