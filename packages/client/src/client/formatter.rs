//! Message formatting utilities for the terminal view.

use kaiwa_shared::time::{to_jst_rfc3339, to_jst_short};

use crate::{
    domain::{Message, Room, User},
    store::{Effect, Level, Notification},
};

const HEAVY_RULE: &str = "============================================================";
const LIGHT_RULE: &str = "------------------------------------------------------------";

/// Message formatter for terminal display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the room list, marking the active room
    ///
    /// # Arguments
    ///
    /// * `rooms` - Rooms in display order
    /// * `active_id` - Id of the open room, if any
    pub fn format_room_list(rooms: &[Room], active_id: Option<&str>) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\nRooms:\n", HEAVY_RULE));

        if rooms.is_empty() {
            output.push_str("(No rooms yet, use /create <name>)\n");
        } else {
            for room in rooms {
                let marker = if Some(room.id.as_str()) == active_id {
                    "*"
                } else {
                    " "
                };
                output.push_str(&format!(
                    "{} {} [{}] - {} members, updated {}\n",
                    marker,
                    room.name,
                    room.id,
                    room.active_members().count(),
                    to_jst_short(room.updated_at)
                ));
            }
        }

        output.push_str(HEAVY_RULE);
        output.push('\n');
        output
    }

    /// Format the header and history of a freshly opened room
    ///
    /// # Arguments
    ///
    /// * `room` - The room, with its messages
    /// * `my_id` - The current user's id (to mark as "me")
    pub fn format_room_opened(room: &Room, my_id: Option<&str>) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", HEAVY_RULE));
        output.push_str(&format!("#{} [{}]\n", room.name, room.id));
        output.push_str(&format!("created at {}\n", to_jst_rfc3339(room.created_at)));
        output.push_str(&Self::member_lines(room, my_id));
        output.push_str(HEAVY_RULE);
        output.push('\n');

        if room.messages.is_empty() {
            output.push_str("(No messages yet)\n");
        } else {
            for message in &room.messages {
                output.push_str(&Self::message_line(message, my_id));
            }
        }
        output
    }

    /// Format a chat message pushed while the room is open
    pub fn format_message(message: &Message, my_id: Option<&str>) -> String {
        format!("\n{}", Self::message_line(message, my_id))
    }

    fn message_line(message: &Message, my_id: Option<&str>) -> String {
        let is_me = matches!(
            (message.author.as_ref(), my_id),
            (Some(author), Some(me)) if author.id == me
        );
        let me_suffix = if is_me { " (me)" } else { "" };
        format!(
            "[{}] @{}{}: {}\n",
            to_jst_short(message.created_at),
            message.author_name(),
            me_suffix,
            message.content
        )
    }

    /// Format one chunk of a streaming bot reply
    ///
    /// The first chunk opens a new line with the bot label; later chunks
    /// continue it.
    pub fn format_bot_chunk(chunk: &str, first: bool) -> String {
        if first {
            format!("\n[bot] {}", chunk)
        } else {
            chunk.to_string()
        }
    }

    /// Format the member list of a room
    pub fn format_members(room: &Room, my_id: Option<&str>) -> String {
        format!(
            "\n{}\n{}{}\n",
            LIGHT_RULE,
            Self::member_lines(room, my_id),
            LIGHT_RULE
        )
    }

    fn member_lines(room: &Room, my_id: Option<&str>) -> String {
        let mut output = String::from("Members:\n");
        for member in &room.members {
            let mut tags = Vec::new();
            if member.is_admin {
                tags.push("admin");
            }
            if member.has_left {
                tags.push("left");
            }
            if Some(member.user.id.as_str()) == my_id {
                tags.push("me");
            }
            let tags = if tags.is_empty() {
                String::new()
            } else {
                format!(" ({})", tags.join(", "))
            };
            output.push_str(&format!(
                "  {} [{}]{}\n",
                member.user.name, member.user.id, tags
            ));
        }
        output
    }

    /// Format the user's profile
    pub fn format_profile(user: &User) -> String {
        format!(
            "\n{}\n{} [{}]\n{}\n{} friends\n{}\n",
            LIGHT_RULE,
            user.name,
            user.id,
            user.email,
            user.friends.len(),
            LIGHT_RULE
        )
    }

    /// Format the friend list
    pub fn format_friends(user: &User) -> String {
        let mut output = format!("\n{}\nFriends:\n", LIGHT_RULE);
        if user.friends.is_empty() {
            output.push_str("(No friends yet, use /friend <email>)\n");
        } else {
            for friend in &user.friends {
                output.push_str(&format!("  {} [{}]\n", friend.name, friend.id));
            }
        }
        output.push_str(LIGHT_RULE);
        output.push('\n');
        output
    }

    /// Format a transient notification
    pub fn format_notification(notification: &Notification) -> String {
        let marker = match notification.level {
            Level::Info => "*",
            Level::Success => "+",
            Level::Warning => "!",
            Level::Error => "x",
        };
        format!("\n{} {}\n", marker, notification.text)
    }

    /// Format an error as an error notification
    pub fn format_error(error: &impl std::fmt::Display) -> String {
        Self::format_notification(&Notification::error(error.to_string()))
    }

    /// Format the effects of one socket event
    ///
    /// Effects with nothing to show render as an empty string.
    pub fn format_effects(effects: &[Effect], my_id: Option<&str>) -> String {
        let mut output = String::new();
        for effect in effects {
            match effect {
                Effect::MessageAppended(message) => {
                    output.push_str(&Self::format_message(message, my_id));
                }
                Effect::BotChunk { chunk, first, .. } => {
                    output.push_str(&Self::format_bot_chunk(chunk, *first));
                }
                Effect::BotFinished { .. } => output.push('\n'),
                Effect::ActiveRoomClosed { .. } => {
                    output.push_str("\n(room closed, use /rooms to pick another)\n");
                }
                Effect::Notify(notification) => {
                    output.push_str(&Self::format_notification(notification));
                }
                Effect::RoomListChanged | Effect::MembersChanged { .. } => {}
            }
        }
        output
    }

    /// Format the command list
    pub fn format_help() -> String {
        let commands = [
            ("/rooms", "list your rooms"),
            ("/open <room>", "open a room by id or name"),
            ("/create <name>", "create a room and open it"),
            ("/rename <name>", "rename the open room (admin)"),
            ("/delete <password>", "delete the open room (admin)"),
            ("/members", "list members of the open room"),
            ("/invite <user id>", "invite a user to the open room"),
            ("/kick <user id>", "remove a member from the open room (admin)"),
            ("/friend <email>", "add a friend"),
            ("/friends", "list your friends"),
            ("/me", "show your profile"),
            ("/profile name|email <value>", "update your profile"),
            ("/logout", "log out and exit"),
            ("/quit", "exit without logging out"),
        ];

        let mut output = format!("\n{}\n", LIGHT_RULE);
        for (usage, description) in commands {
            output.push_str(&format!("{:<30} {}\n", usage, description));
        }
        output.push_str("Anything else is sent to the open room.\n");
        output.push_str(LIGHT_RULE);
        output.push('\n');
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::fixtures::{member, message, room, user, user_ref};

    #[test]
    fn test_format_room_list_when_empty() {
        // テスト項目: ルームがない場合、作成方法の案内が表示される
        // given (前提条件):
        let rooms: Vec<Room> = vec![];

        // when (操作):
        let result = MessageFormatter::format_room_list(&rooms, None);

        // then (期待する結果):
        assert!(result.contains("Rooms:"));
        assert!(result.contains("(No rooms yet, use /create <name>)"));
    }

    #[test]
    fn test_format_room_list_marks_active_room() {
        // テスト項目: 開いているルームに * が付き、JST の更新時刻が表示される
        // given (前提条件):
        let rooms = vec![
            room("r1", "general", vec![member("u1", "alice", true)], 5),
            room("r2", "random", vec![member("u1", "alice", false)], 3),
        ];

        // when (操作):
        let result = MessageFormatter::format_room_list(&rooms, Some("r2"));

        // then (期待する結果):
        assert!(result.contains("  general [r1] - 1 members, updated 19:05\n"));
        assert!(result.contains("* random [r2] - 1 members, updated 19:03\n"));
    }

    #[test]
    fn test_format_room_opened_with_history() {
        // テスト項目: ルームを開くと、メンバーと履歴が表示され自分に (me) が付く
        // given (前提条件):
        let alice = user_ref("u1", "alice");
        let bob = user_ref("u2", "bob");
        let mut general = room(
            "r1",
            "general",
            vec![member("u1", "alice", true), member("u2", "bob", false)],
            2,
        );
        general.messages = vec![
            message("m1", "r1", &alice, "hi", 1),
            message("m2", "r1", &bob, "hello", 2),
        ];

        // when (操作):
        let result = MessageFormatter::format_room_opened(&general, Some("u1"));

        // then (期待する結果):
        assert!(result.contains("#general [r1]"));
        assert!(result.contains("  alice [u1] (admin, me)\n"));
        assert!(result.contains("  bob [u2]\n"));
        assert!(result.contains("[19:01] @alice (me): hi\n"));
        assert!(result.contains("[19:02] @bob: hello\n"));
    }

    #[test]
    fn test_format_room_opened_without_messages() {
        // テスト項目: メッセージがないルームでは案内が表示される
        // given (前提条件):
        let general = room("r1", "general", vec![member("u1", "alice", true)], 0);

        // when (操作):
        let result = MessageFormatter::format_room_opened(&general, Some("u1"));

        // then (期待する結果):
        assert!(result.contains("(No messages yet)"));
    }

    #[test]
    fn test_format_members_shows_left_members() {
        // テスト項目: 退出済みのメンバーには (left) が付く
        // given (前提条件):
        let mut bob = member("u2", "bob", false);
        bob.has_left = true;
        let general = room("r1", "general", vec![member("u1", "alice", true), bob], 0);

        // when (操作):
        let result = MessageFormatter::format_members(&general, Some("u1"));

        // then (期待する結果):
        assert!(result.contains("  bob [u2] (left)\n"));
    }

    #[test]
    fn test_format_bot_chunks() {
        // テスト項目: ボットの最初のチャンクにはラベルが付き、後続は連結される
        // given (前提条件):
        let first = "Hel";
        let next = "lo";

        // when (操作):
        let result = format!(
            "{}{}",
            MessageFormatter::format_bot_chunk(first, true),
            MessageFormatter::format_bot_chunk(next, false)
        );

        // then (期待する結果):
        assert_eq!(result, "\n[bot] Hello");
    }

    #[test]
    fn test_format_effects_skips_silent_effects() {
        // テスト項目: 表示内容のない Effect は空文字列になる
        // given (前提条件):
        let effects = vec![
            Effect::RoomListChanged,
            Effect::MembersChanged {
                room_id: "r1".to_string(),
            },
        ];

        // when (操作):
        let result = MessageFormatter::format_effects(&effects, Some("u1"));

        // then (期待する結果):
        assert!(result.is_empty());
    }

    #[test]
    fn test_format_effects_renders_notifications() {
        // テスト項目: 通知の Effect がレベルごとの記号付きで表示される
        // given (前提条件):
        let effects = vec![
            Effect::Notify(Notification::warning("You were removed from general")),
            Effect::ActiveRoomClosed {
                room_id: "r1".to_string(),
            },
        ];

        // when (操作):
        let result = MessageFormatter::format_effects(&effects, Some("u1"));

        // then (期待する結果):
        assert!(result.contains("! You were removed from general\n"));
        assert!(result.contains("(room closed"));
    }

    #[test]
    fn test_format_error() {
        // テスト項目: エラーは x 記号付きの通知として表示される
        // given (前提条件):
        let error = crate::error::ClientError::NotAdmin;

        // when (操作):
        let result = MessageFormatter::format_error(&error);

        // then (期待する結果):
        assert_eq!(result, "\nx Only room admins can do that\n");
    }

    #[test]
    fn test_format_friends() {
        // テスト項目: フレンド一覧が表示される
        // given (前提条件):
        let mut alice = user("u1", "alice");
        alice.friends.push(user_ref("u2", "bob"));

        // when (操作):
        let result = MessageFormatter::format_friends(&alice);

        // then (期待する結果):
        assert!(result.contains("  bob [u2]\n"));
    }
}
