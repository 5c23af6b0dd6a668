//! Chat execution logic with reconnection support.

use std::time::Duration;

use crate::{
    domain::{LoginForm, User},
    error::ClientError,
};

use super::{
    account::prompt_credentials,
    context::ChatContext,
    domain::{should_attempt_reconnect, should_exit_immediately},
    session::{SessionEnd, run_chat_session},
    ui::{prompt_for, spawn_line_reader},
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Resolve the user to chat as
///
/// A stored token is used when there is one. Memory storage never has one at
/// startup, so the user logs in with `ask_credentials` instead; file storage
/// without a token is `NotAuthenticated`.
pub async fn ensure_session<F>(ctx: &ChatContext, ask_credentials: F) -> Result<User, ClientError>
where
    F: FnOnce() -> Result<(String, String), ClientError>,
{
    if let Some(me) = ctx.auth.restore().await? {
        return Ok(me);
    }
    if !ctx.is_ephemeral() {
        return Err(ClientError::NotAuthenticated);
    }

    tracing::info!("No token in memory storage, logging in interactively");
    let (email, password) = ask_credentials()?;
    ctx.auth.login(&LoginForm::new(email, password)?).await
}

/// Run the interactive chat with reconnection logic
///
/// A token the server rejects is cleared and ends the chat with `Unauthorized`.
pub async fn run_chat(ctx: &ChatContext) -> Result<SessionEnd, ClientError> {
    let me = ensure_session(ctx, prompt_credentials).await?;

    println!(
        "\nYou are '{}'. Type /help for commands, or open a room and start typing. \
         Press Ctrl+C to exit.\n",
        me.name
    );

    let prompt = prompt_for(&me.name);
    let mut input_rx = spawn_line_reader(prompt.clone());
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            ctx.socket_url,
            me.name,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_chat_session(ctx, &mut input_rx, &prompt).await {
            Ok(end) => {
                tracing::info!("Chat session ended normally ({:?})", end);
                return Ok(end);
            }
            Err(e) => {
                if should_exit_immediately(&e) {
                    tracing::error!("{}", e);
                    // an expired token cannot be reused
                    if matches!(e, ClientError::Unauthorized) {
                        ctx.auth.logout().await.ok();
                    }
                    return Err(e);
                }

                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}
