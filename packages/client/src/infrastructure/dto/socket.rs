//! Socket event envelopes.
//!
//! Every text frame is a JSON object `{"event": "<name>", "data": {...}}` with
//! kebab-case event names and camelCase payload fields.

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Message, Room, UserRef},
    error::ClientError,
};

/// Events emitted by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    /// Subscribe to pushes for a room after opening it
    JoinRoom { room_id: String },
    SendMessage { room_id: String, content: String },
    InviteToRoom { room_id: String, user_id: String },
    RemoveFromRoom { room_id: String, user_id: String },
    AddFriend { email: String },
}

/// Events pushed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// A message was posted to a room the user belongs to
    NewMessage { message: Message },
    /// `user` was added to `room`
    InvitedToRoom { room: Room, user: UserRef },
    /// `user` was removed from the room
    RemovedFromRoom { room_id: String, user: UserRef },
    AddedFriend { friend: UserRef },
    /// One chunk of an assistant reply; `done` marks the final frame
    StreamBotMessage {
        room_id: String,
        message_id: String,
        #[serde(default)]
        chunk: String,
        #[serde(default)]
        done: bool,
    },
}

impl ServerEvent {
    /// Event name as it appears on the wire, for logging
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::NewMessage { .. } => "new-message",
            ServerEvent::InvitedToRoom { .. } => "invited-to-room",
            ServerEvent::RemovedFromRoom { .. } => "removed-from-room",
            ServerEvent::AddedFriend { .. } => "added-friend",
            ServerEvent::StreamBotMessage { .. } => "stream-bot-message",
        }
    }
}

/// Serialize an outgoing event into a text frame
pub fn encode_client_event(event: &ClientEvent) -> Result<String, ClientError> {
    Ok(serde_json::to_string(event)?)
}

/// Parse an incoming text frame
pub fn decode_server_event(text: &str) -> Result<ServerEvent, ClientError> {
    serde_json::from_str(text)
        .map_err(|e| ClientError::Protocol(format!("undecodable frame ({}): {}", e, text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_join_room() {
        // テスト項目: join-room イベントが envelope 形式にエンコードされる
        // given (前提条件):
        let event = ClientEvent::JoinRoom {
            room_id: "r1".to_string(),
        };

        // when (操作):
        let json = encode_client_event(&event).unwrap();

        // then (期待する結果):
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"event": "join-room", "data": {"roomId": "r1"}})
        );
    }

    #[test]
    fn test_encode_invite_to_room() {
        // テスト項目: invite-to-room イベントのフィールドが camelCase になる
        // given (前提条件):
        let event = ClientEvent::InviteToRoom {
            room_id: "r1".to_string(),
            user_id: "u2".to_string(),
        };

        // when (操作):
        let json = encode_client_event(&event).unwrap();

        // then (期待する結果):
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "event": "invite-to-room",
                "data": {"roomId": "r1", "userId": "u2"}
            })
        );
    }

    #[test]
    fn test_decode_stream_bot_message_defaults() {
        // テスト項目: stream-bot-message の chunk と done が省略可能である
        // given (前提条件):
        let text = r#"{"event":"stream-bot-message","data":{"roomId":"r1","messageId":"b1","done":true}}"#;

        // when (操作):
        let event = decode_server_event(text).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ServerEvent::StreamBotMessage {
                room_id: "r1".to_string(),
                message_id: "b1".to_string(),
                chunk: String::new(),
                done: true,
            }
        );
    }

    #[test]
    fn test_decode_removed_from_room() {
        // テスト項目: removed-from-room イベントがデコードされる
        // given (前提条件):
        let text = r#"{"event":"removed-from-room","data":{"roomId":"r1","user":{"_id":"u2","name":"bob"}}}"#;

        // when (操作):
        let event = decode_server_event(text).unwrap();

        // then (期待する結果):
        assert_eq!(event.name(), "removed-from-room");
        match event {
            ServerEvent::RemovedFromRoom { room_id, user } => {
                assert_eq!(room_id, "r1");
                assert_eq!(user.id, "u2");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_decode_new_message() {
        // テスト項目: new-message イベントがメッセージを含めてデコードされる
        // given (前提条件):
        let text = r#"{"event":"new-message","data":{"message":{
            "id":"m1","roomId":"r1","author":{"id":"u1","name":"alice"},"content":"hi",
            "createdAt":"2024-05-01T10:00:00Z","updatedAt":"2024-05-01T10:00:00Z"}}}"#;

        // when (操作):
        let event = decode_server_event(text).unwrap();

        // then (期待する結果):
        match event {
            ServerEvent::NewMessage { message } => {
                assert_eq!(message.content, "hi");
                assert_eq!(message.author_name(), "alice");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_decode_unknown_event_is_protocol_error() {
        // テスト項目: 未知のイベントはプロトコルエラーになる
        // given (前提条件):
        let text = r#"{"event":"typing","data":{"roomId":"r1"}}"#;

        // when (操作):
        let result = decode_server_event(text);

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::Protocol(_))));
    }

    #[test]
    fn test_decode_malformed_frame_is_protocol_error() {
        // テスト項目: JSON として不正なフレームはプロトコルエラーになる
        // given (前提条件):
        let text = "not json";

        // when (操作):
        let result = decode_server_event(text);

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::Protocol(_))));
    }
}
