//! The realtime store.
//!
//! Holds the room list (most recently active first), the active room with its
//! messages, and the authenticated user. Socket events are applied one at a
//! time in arrival order through [`ChatStore::apply`], which returns the
//! [`Effect`]s the view should render. There is no buffering, retry or
//! reordering.

use std::{collections::HashSet, sync::Arc};

use kaiwa_shared::time::{Clock, SystemClock};

use crate::{
    domain::{Message, Room, RoomMember, User, UserRef},
    infrastructure::dto::socket::ServerEvent,
};

use super::effect::{Effect, Notification};

/// Room list, active room and user profile
pub struct ChatStore {
    me: Option<User>,
    rooms: Vec<Room>,
    active: Option<Room>,
    /// Ids of bot messages in the active room that have not finished streaming
    streaming: HashSet<String>,
    clock: Arc<dyn Clock>,
}

impl Default for ChatStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for ChatStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatStore")
            .field("me", &self.me)
            .field("rooms", &self.rooms.len())
            .field("active", &self.active.as_ref().map(|r| &r.id))
            .field("streaming", &self.streaming)
            .finish()
    }
}

impl ChatStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            me: None,
            rooms: Vec::new(),
            active: None,
            streaming: HashSet::new(),
            clock,
        }
    }

    pub fn me(&self) -> Option<&User> {
        self.me.as_ref()
    }

    pub fn my_id(&self) -> Option<&str> {
        self.me.as_ref().map(|me| me.id.as_str())
    }

    pub fn set_me(&mut self, user: User) {
        self.me = Some(user);
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn active(&self) -> Option<&Room> {
        self.active.as_ref()
    }

    pub fn is_streaming(&self, message_id: &str) -> bool {
        self.streaming.contains(message_id)
    }

    /// Replace the room list, most recently active first
    pub fn set_rooms(&mut self, rooms: Vec<Room>) {
        self.rooms = rooms.into_iter().map(list_entry).collect();
        self.rooms.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    }

    /// Make `room` the active room and make sure it is in the list
    pub fn open_room(&mut self, room: Room) {
        self.streaming.clear();
        self.upsert_room(room.clone());
        self.active = Some(room);
    }

    /// Insert a room at the top of the list, or update it in place.
    ///
    /// When the room is active its name and members are refreshed; its message
    /// history is only replaced when `room` carries one.
    pub fn upsert_room(&mut self, room: Room) {
        if let Some(active) = self.active.as_mut()
            && active.id == room.id
        {
            active.name = room.name.clone();
            active.members = room.members.clone();
            active.updated_at = room.updated_at;
            if !room.messages.is_empty() {
                active.messages = room.messages.clone();
            }
        }

        let entry = list_entry(room);
        match self.rooms.iter_mut().find(|r| r.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.rooms.insert(0, entry),
        }
    }

    /// Drop a room from the list, closing it if it is active.
    ///
    /// Returns the removed list entry (or the active room when it was not listed).
    pub fn remove_room(&mut self, room_id: &str) -> Option<Room> {
        let removed = self
            .rooms
            .iter()
            .position(|r| r.id == room_id)
            .map(|index| self.rooms.remove(index));
        let was_active = self.active.as_ref().is_some_and(|r| r.id == room_id);
        if was_active {
            self.streaming.clear();
            let active = self.active.take();
            return removed.or(active);
        }
        removed
    }

    pub fn close_room(&mut self) {
        self.streaming.clear();
        self.active = None;
    }

    /// Forget everything, e.g. on logout
    pub fn reset(&mut self) {
        self.me = None;
        self.rooms.clear();
        self.close_room();
    }

    /// Find a listed room by exact id, then by case-insensitive name
    pub fn find_room(&self, query: &str) -> Option<&Room> {
        let query = query.trim();
        let lowered = query.to_lowercase();
        self.rooms
            .iter()
            .find(|r| r.id == query)
            .or_else(|| self.rooms.iter().find(|r| r.name.to_lowercase() == lowered))
    }

    /// Apply one socket event and report what changed
    pub fn apply(&mut self, event: ServerEvent) -> Vec<Effect> {
        tracing::debug!("Applying {} event", event.name());
        match event {
            ServerEvent::NewMessage { message } => self.on_new_message(message),
            ServerEvent::InvitedToRoom { room, user } => self.on_invited(room, user),
            ServerEvent::RemovedFromRoom { room_id, user } => self.on_removed(&room_id, user),
            ServerEvent::AddedFriend { friend } => self.on_added_friend(friend),
            ServerEvent::StreamBotMessage {
                room_id,
                message_id,
                chunk,
                done,
            } => self.on_bot_stream(&room_id, message_id, chunk, done),
        }
    }

    fn is_me(&self, user_id: &str) -> bool {
        self.my_id() == Some(user_id)
    }

    fn is_active(&self, room_id: &str) -> bool {
        self.active.as_ref().is_some_and(|r| r.id == room_id)
    }

    /// Move a listed room to the top, stamping its last activity
    fn touch_room(&mut self, room_id: &str, at: chrono::DateTime<chrono::Utc>) -> Option<&Room> {
        let index = self.rooms.iter().position(|r| r.id == room_id)?;
        let mut room = self.rooms.remove(index);
        room.updated_at = at;
        self.rooms.insert(0, room);
        self.rooms.first()
    }

    fn on_new_message(&mut self, message: Message) -> Vec<Effect> {
        let room_id = message.room_id.clone();
        let listed_name = self
            .touch_room(&room_id, message.created_at)
            .map(|r| r.name.clone());
        let mut effects = Vec::new();
        if listed_name.is_some() {
            effects.push(Effect::RoomListChanged);
        }

        if let Some(active) = self.active.as_mut()
            && active.id == room_id
        {
            active.updated_at = message.created_at;
            if active.has_message(&message.id) {
                tracing::debug!("Message {} already present, skipping", message.id);
            } else {
                active.messages.push(message.clone());
                effects.push(Effect::MessageAppended(message));
            }
            return effects;
        }

        match listed_name {
            Some(name) => {
                let from_me = message
                    .author
                    .as_ref()
                    .is_some_and(|a| self.is_me(&a.id));
                if !from_me {
                    effects.push(Effect::Notify(Notification::info(format!(
                        "New message in {} from {}",
                        name,
                        message.author_name()
                    ))));
                }
            }
            None => tracing::debug!("Message for unknown room {} ignored", room_id),
        }
        effects
    }

    fn on_invited(&mut self, room: Room, user: UserRef) -> Vec<Effect> {
        if self.is_me(&user.id) {
            let name = room.name.clone();
            self.upsert_room(room);
            return vec![
                Effect::RoomListChanged,
                Effect::Notify(Notification::info(format!("You were invited to {}", name))),
            ];
        }

        let mut effects = Vec::new();
        let member = room
            .member(&user.id)
            .cloned()
            .unwrap_or_else(|| RoomMember {
                user: user.clone(),
                is_admin: false,
                has_left: false,
            });

        if let Some(entry) = self.rooms.iter_mut().find(|r| r.id == room.id) {
            add_or_revive(entry, member.clone());
        }

        if let Some(active) = self.active.as_mut()
            && active.id == room.id
        {
            add_or_revive(active, member);
            effects.push(Effect::MembersChanged {
                room_id: room.id.clone(),
            });
            effects.push(Effect::Notify(Notification::info(format!(
                "{} joined {}",
                user.name, active.name
            ))));
        }
        effects
    }

    fn on_removed(&mut self, room_id: &str, user: UserRef) -> Vec<Effect> {
        if self.is_me(&user.id) {
            let was_active = self.is_active(room_id);
            let Some(room) = self.remove_room(room_id) else {
                return Vec::new();
            };
            let mut effects = vec![Effect::RoomListChanged];
            if was_active {
                effects.push(Effect::ActiveRoomClosed {
                    room_id: room_id.to_string(),
                });
            }
            effects.push(Effect::Notify(Notification::warning(format!(
                "You were removed from {}",
                room.name
            ))));
            return effects;
        }

        if let Some(entry) = self.rooms.iter_mut().find(|r| r.id == room_id)
            && let Some(member) = entry.member_mut(&user.id)
        {
            member.has_left = true;
        }

        let mut effects = Vec::new();
        if let Some(active) = self.active.as_mut()
            && active.id == room_id
            && let Some(member) = active.member_mut(&user.id)
        {
            member.has_left = true;
            effects.push(Effect::MembersChanged {
                room_id: room_id.to_string(),
            });
            effects.push(Effect::Notify(Notification::info(format!(
                "{} left {}",
                user.name, active.name
            ))));
        }
        effects
    }

    fn on_added_friend(&mut self, friend: UserRef) -> Vec<Effect> {
        let Some(me) = self.me.as_mut() else {
            tracing::debug!("Friend {} added before the profile was loaded", friend.id);
            return Vec::new();
        };
        if me.has_friend(&friend.id) {
            return Vec::new();
        }
        let text = format!("{} is now your friend", friend.name);
        me.friends.push(friend);
        vec![Effect::Notify(Notification::success(text))]
    }

    fn on_bot_stream(
        &mut self,
        room_id: &str,
        message_id: String,
        chunk: String,
        done: bool,
    ) -> Vec<Effect> {
        let now = self.clock.now();
        let Some(active) = self.active.as_mut().filter(|r| r.id == room_id) else {
            tracing::debug!("Bot stream for inactive room {} ignored", room_id);
            return Vec::new();
        };

        let mut effects = Vec::new();
        match active.messages.iter_mut().find(|m| m.id == message_id) {
            Some(_) if !self.streaming.contains(&message_id) => {
                tracing::debug!("Chunk for finished bot message {} ignored", message_id);
                return effects;
            }
            Some(message) => {
                message.content.push_str(&chunk);
                message.updated_at = now;
                if !chunk.is_empty() {
                    effects.push(Effect::BotChunk {
                        message_id: message_id.clone(),
                        chunk,
                        first: false,
                    });
                }
            }
            None => {
                active.messages.push(Message {
                    id: message_id.clone(),
                    room_id: room_id.to_string(),
                    author: None,
                    content: chunk.clone(),
                    is_bot: true,
                    created_at: now,
                    updated_at: now,
                });
                if !done {
                    self.streaming.insert(message_id.clone());
                }
                effects.push(Effect::BotChunk {
                    message_id: message_id.clone(),
                    chunk,
                    first: true,
                });
            }
        }

        if done {
            self.streaming.remove(&message_id);
            effects.push(Effect::BotFinished { message_id });
            if let Some(active) = self.active.as_mut() {
                active.updated_at = now;
            }
            if self.touch_room(room_id, now).is_some() {
                effects.push(Effect::RoomListChanged);
            }
        }
        effects
    }
}

/// List entries do not carry message history
fn list_entry(mut room: Room) -> Room {
    room.messages.clear();
    room
}

fn add_or_revive(room: &mut Room, member: RoomMember) {
    match room.member_mut(&member.user.id) {
        Some(existing) => existing.has_left = false,
        None => room.members.push(member),
    }
}
