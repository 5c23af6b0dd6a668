//! Domain layer: entities, validated form values and the ports to the backend.

pub mod api;
pub mod emitter;
pub mod entity;
pub mod storage;
pub mod value_object;

pub use api::{AuthToken, ChatApi, ProfileUpdate};
pub use emitter::SocketEmitter;
pub use entity::{Message, Room, RoomMember, User, UserRef};
pub use storage::{TOKEN_STORAGE_KEY, TokenStore};
pub use value_object::{
    DisplayName, Email, LoginForm, MessageContent, Password, RoomName, SignupForm,
    ValidationError,
};
