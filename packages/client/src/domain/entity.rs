//! Entities shared between the REST API, the socket channel and the store.
//!
//! These are plain records. Uniqueness of ids and referential integrity are
//! guaranteed by the server and are not re-validated here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user as referenced from other records (members, authors, friends)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
}

/// The authenticated user's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub friends: Vec<UserRef>,
}

impl User {
    /// Reference to this user as it appears in other records
    pub fn to_ref(&self) -> UserRef {
        UserRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    pub fn has_friend(&self, user_id: &str) -> bool {
        self.friends.iter().any(|f| f.id == user_id)
    }
}

/// A user's membership record within a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMember {
    pub user: UserRef,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub has_left: bool,
}

impl RoomMember {
    /// A member that has not left the room
    pub fn is_active(&self) -> bool {
        !self.has_left
    }
}

/// A text entry in a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(alias = "_id")]
    pub id: String,
    pub room_id: String,
    /// Absent for messages written by the assistant bot
    #[serde(default)]
    pub author: Option<UserRef>,
    pub content: String,
    #[serde(default)]
    pub is_bot: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Name to display for the author of this message
    pub fn author_name(&self) -> &str {
        match &self.author {
            Some(author) => &author.name,
            None if self.is_bot => "bot",
            None => "unknown",
        }
    }
}

/// A chat channel with members and messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<RoomMember>,
    /// Room lists omit the message history
    #[serde(default)]
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    pub fn member(&self, user_id: &str) -> Option<&RoomMember> {
        self.members.iter().find(|m| m.user.id == user_id)
    }

    pub fn member_mut(&mut self, user_id: &str) -> Option<&mut RoomMember> {
        self.members.iter_mut().find(|m| m.user.id == user_id)
    }

    /// Whether the user is an admin that has not left the room
    pub fn is_admin(&self, user_id: &str) -> bool {
        self.member(user_id)
            .is_some_and(|m| m.is_admin && m.is_active())
    }

    pub fn active_members(&self) -> impl Iterator<Item = &RoomMember> {
        self.members.iter().filter(|m| m.is_active())
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn has_message(&self, message_id: &str) -> bool {
        self.messages.iter().any(|m| m.id == message_id)
    }
}
