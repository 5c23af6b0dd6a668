//! SocketEmitter trait 定義
//!
//! ソケットへ送信するイベントの抽象化。実装は `infrastructure::socket::ChannelEmitter`。

use crate::error::ClientError;

use super::{Email, MessageContent};

/// Outgoing side of the socket channel
///
/// 送信はキューへの追加のみで、サーバーへの到達は保証しない。
#[cfg_attr(test, mockall::automock)]
pub trait SocketEmitter: Send + Sync {
    /// `join-room`
    fn join_room(&self, room_id: &str) -> Result<(), ClientError>;

    /// `send-message`
    fn send_message(&self, room_id: &str, content: &MessageContent) -> Result<(), ClientError>;

    /// `invite-to-room`
    fn invite_to_room(&self, room_id: &str, user_id: &str) -> Result<(), ClientError>;

    /// `remove-from-room`
    fn remove_from_room(&self, room_id: &str, user_id: &str) -> Result<(), ClientError>;

    /// `add-friend`
    fn add_friend(&self, email: &Email) -> Result<(), ClientError>;
}
