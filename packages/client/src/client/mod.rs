//! Terminal view of the chat client.

pub mod account;
mod command;
mod context;
mod domain;
mod formatter;
mod runner;
mod session;
mod ui;

pub use command::{Command, CommandError, ProfileField, parse_command};
pub use context::ChatContext;
pub use formatter::MessageFormatter;
pub use runner::{ensure_session, run_chat};
pub use session::SessionEnd;
