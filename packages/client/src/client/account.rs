//! One-shot account commands: login, signup, logout and whoami.

use crate::{
    domain::{LoginForm, SignupForm},
    error::ClientError,
    store::Notification,
};

use super::{context::ChatContext, formatter::MessageFormatter, ui::read_line};

/// Log in, prompting for the password when it was not given
pub async fn login(
    ctx: &ChatContext,
    email: &str,
    password: Option<String>,
) -> Result<(), ClientError> {
    let password = match password {
        Some(password) => password,
        None => read_line("Password: ")?,
    };
    let form = LoginForm::new(email, password)?;
    let me = ctx.auth.login(&form).await?;
    print!(
        "{}",
        MessageFormatter::format_notification(&Notification::success(format!(
            "Logged in as {}",
            me.name
        )))
    );
    Ok(())
}

/// Create an account, prompting for the password and its confirmation when absent
pub async fn signup(
    ctx: &ChatContext,
    name: &str,
    email: &str,
    password: Option<String>,
) -> Result<(), ClientError> {
    let (password, confirmation) = match password {
        Some(password) => (password.clone(), password),
        None => (read_line("Password: ")?, read_line("Confirm password: ")?),
    };
    let form = SignupForm::new(name, email, password, confirmation)?;
    let me = ctx.auth.signup(&form).await?;
    print!(
        "{}",
        MessageFormatter::format_notification(&Notification::success(format!(
            "Welcome, {}",
            me.name
        )))
    );
    Ok(())
}

/// Ask for an email and password on the terminal
pub fn prompt_credentials() -> Result<(String, String), ClientError> {
    let email = read_line("Email: ")?;
    let password = read_line("Password: ")?;
    Ok((email.trim().to_string(), password))
}

pub async fn logout(ctx: &ChatContext) -> Result<(), ClientError> {
    ctx.auth.logout().await?;
    print!(
        "{}",
        MessageFormatter::format_notification(&Notification::info("Logged out"))
    );
    Ok(())
}

/// Print the profile behind the stored token
pub async fn whoami(ctx: &ChatContext) -> Result<(), ClientError> {
    match ctx.auth.restore().await? {
        Some(me) => print!("{}", MessageFormatter::format_profile(&me)),
        None => print!(
            "{}",
            MessageFormatter::format_notification(&Notification::info(
                "Not logged in, run `kaiwa login --email <email>`"
            ))
        ),
    }
    Ok(())
}
