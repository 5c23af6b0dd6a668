//! Chat session over one socket connection.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;

use crate::{
    domain::{DisplayName, Email, MessageContent, ProfileUpdate, Room, RoomName},
    error::ClientError,
    infrastructure::{
        dto::socket::{decode_server_event, encode_client_event},
        socket::connect,
    },
    store::{Effect, Notification},
};

use super::{
    command::{Command, ProfileField, parse_command},
    context::ChatContext,
    formatter::MessageFormatter,
    ui::{print_above_prompt, print_partial},
};

const CLOSE_GRACE: Duration = Duration::from_millis(500);

/// How a session ended when the connection was still healthy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// `/quit`, Ctrl+C or Ctrl+D; the stored token is kept
    Quit,
    /// `/logout`; the stored token was cleared
    Logout,
}

/// Run one chat session
///
/// Returns `Err` when the connection could not be opened or was lost, so the
/// runner can decide whether to reconnect.
pub async fn run_chat_session(
    ctx: &ChatContext,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
    prompt: &str,
) -> Result<SessionEnd, ClientError> {
    let token = ctx.auth.token()?;
    let rooms = ctx.rooms.refresh_rooms().await?;
    let ws_stream = connect(&ctx.socket_url, &token).await?;
    tracing::info!("Connected to chat server!");

    let (mut write, mut read) = ws_stream.split();
    let mut outgoing = ctx.emitter.attach();

    // Spawn a task to apply pushed events to the store and render their effects
    let store = ctx.store.clone();
    let prompt_for_read = prompt.to_string();
    let mut read_task = tokio::spawn(async move {
        while let Some(frame) = read.next().await {
            match frame {
                Ok(WsMessage::Text(text)) => {
                    let event = match decode_server_event(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!("Ignoring frame: {}", e);
                            continue;
                        }
                    };
                    tracing::debug!("Received {}", event.name());

                    let (output, mid_stream) = {
                        let mut store = store.lock().await;
                        let effects = store.apply(event);
                        let mid_stream = effects
                            .iter()
                            .any(|e| matches!(e, Effect::BotChunk { .. }))
                            && !effects
                                .iter()
                                .any(|e| matches!(e, Effect::BotFinished { .. }));
                        (
                            MessageFormatter::format_effects(&effects, store.my_id()),
                            mid_stream,
                        )
                    };
                    if mid_stream {
                        print_partial(&output);
                    } else {
                        print_above_prompt(&output, &prompt_for_read);
                    }
                }
                Ok(WsMessage::Binary(data)) => {
                    tracing::warn!("Ignoring {} bytes of binary data", data.len());
                }
                Ok(WsMessage::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward emitted events to the socket
    let mut write_task = tokio::spawn(async move {
        while let Some(event) = outgoing.recv().await {
            let text = match encode_client_event(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("Failed to encode {:?}: {}", event, e);
                    continue;
                }
            };
            if let Err(e) = write.send(WsMessage::Text(text.into())).await {
                tracing::warn!("WebSocket write error: {}", e);
                return;
            }
        }
        // Emitter detached: close the connection politely
        write.close().await.ok();
    });

    let active_id = ctx.store.lock().await.active().map(|r| r.id.clone());
    print_above_prompt(
        &MessageFormatter::format_room_list(&rooms, active_id.as_deref()),
        prompt,
    );
    match ctx.rooms.rejoin_active().await {
        Ok(Some(room)) => print_above_prompt(&render_room(ctx, &room).await, prompt),
        Ok(None) => {}
        Err(e) => print_above_prompt(&MessageFormatter::format_error(&e), prompt),
    }

    let result = loop {
        tokio::select! {
            _ = &mut read_task => {
                break Err(ClientError::Connection("connection lost".to_string()));
            }
            _ = &mut write_task => {
                break Err(ClientError::Connection("connection lost".to_string()));
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    break Ok(SessionEnd::Quit);
                };
                if let Some(end) = dispatch(ctx, &line, prompt).await {
                    break Ok(end);
                }
            }
        }
    };

    ctx.emitter.detach();
    read_task.abort();
    if result.is_ok() {
        // give the writer a moment to send the close frame
        let _ = tokio::time::timeout(CLOSE_GRACE, &mut write_task).await;
    }
    write_task.abort();

    result
}

/// Handle one input line
///
/// Use-case errors are printed and never end the session.
async fn dispatch(ctx: &ChatContext, line: &str, prompt: &str) -> Option<SessionEnd> {
    let command = match parse_command(line) {
        Ok(command) => command,
        Err(e) => {
            print_above_prompt(&MessageFormatter::format_error(&e), prompt);
            return None;
        }
    };

    match command {
        Command::Quit => return Some(SessionEnd::Quit),
        Command::Logout => {
            if let Err(e) = ctx.auth.logout().await {
                print_above_prompt(&MessageFormatter::format_error(&e), prompt);
                return None;
            }
            print!(
                "{}",
                MessageFormatter::format_notification(&Notification::info("Logged out"))
            );
            return Some(SessionEnd::Logout);
        }
        command => match execute(ctx, command).await {
            Ok(output) => print_above_prompt(&output, prompt),
            Err(e) => {
                tracing::debug!("Command failed: {:?}", e);
                print_above_prompt(&MessageFormatter::format_error(&e), prompt);
            }
        },
    }
    None
}

/// Run a command against the use cases and render its result
async fn execute(ctx: &ChatContext, command: Command) -> Result<String, ClientError> {
    let output = match command {
        Command::Say(text) => {
            ctx.messages.send(&MessageContent::new(text)?).await?;
            String::new()
        }
        Command::Rooms => {
            let rooms = ctx.rooms.refresh_rooms().await?;
            let active_id = ctx.store.lock().await.active().map(|r| r.id.clone());
            MessageFormatter::format_room_list(&rooms, active_id.as_deref())
        }
        Command::Open(query) => {
            let room = ctx.rooms.open(&query).await?;
            render_room(ctx, &room).await
        }
        Command::Create(name) => {
            let room = ctx.rooms.create(&RoomName::new(name)?).await?;
            render_room(ctx, &room).await
        }
        Command::Rename(name) => {
            let room = ctx.rooms.rename(&RoomName::new(name)?).await?;
            MessageFormatter::format_notification(&Notification::success(format!(
                "Room renamed to {}",
                room.name
            )))
        }
        Command::Delete(password) => {
            let name = ctx.rooms.delete(&password).await?;
            MessageFormatter::format_notification(&Notification::success(format!(
                "Room {} deleted",
                name
            )))
        }
        Command::Members => {
            let store = ctx.store.lock().await;
            let room = store.active().ok_or(ClientError::NoActiveRoom)?;
            MessageFormatter::format_members(room, store.my_id())
        }
        Command::Invite(user_id) => {
            ctx.members.invite(&user_id).await?;
            MessageFormatter::format_notification(&Notification::info(format!(
                "Invitation sent to {}",
                user_id
            )))
        }
        Command::Kick(user_id) => {
            ctx.members.remove(&user_id).await?;
            MessageFormatter::format_notification(&Notification::info(format!(
                "Removing {} from the room",
                user_id
            )))
        }
        Command::Friend(email) => {
            ctx.members.add_friend(&Email::new(email)?).await?;
            MessageFormatter::format_notification(&Notification::info("Friend request sent"))
        }
        Command::Friends => {
            let store = ctx.store.lock().await;
            let me = store.me().ok_or(ClientError::NotAuthenticated)?;
            MessageFormatter::format_friends(me)
        }
        Command::Me => {
            let store = ctx.store.lock().await;
            let me = store.me().ok_or(ClientError::NotAuthenticated)?;
            MessageFormatter::format_profile(me)
        }
        Command::Profile(field, value) => {
            let update = match field {
                ProfileField::Name => ProfileUpdate {
                    name: Some(DisplayName::new(value)?),
                    email: None,
                },
                ProfileField::Email => ProfileUpdate {
                    name: None,
                    email: Some(Email::new(value)?),
                },
            };
            let me = ctx.auth.update_profile(&update).await?;
            MessageFormatter::format_profile(&me)
        }
        Command::Help => MessageFormatter::format_help(),
        Command::Quit | Command::Logout => String::new(),
    };
    Ok(output)
}

async fn render_room(ctx: &ChatContext, room: &Room) -> String {
    let store = ctx.store.lock().await;
    MessageFormatter::format_room_opened(room, store.my_id())
}
