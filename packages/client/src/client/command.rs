//! Parsing of chat session input lines.
//!
//! Lines starting with `/` are commands; anything else is a message for the
//! active room. Argument values are validated later by the use cases.

use thiserror::Error;

/// Profile field changed by `/profile`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Email,
}

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Rooms,
    Open(String),
    Create(String),
    Rename(String),
    /// Delete the active room, confirmed with the account password
    Delete(String),
    Members,
    Invite(String),
    Kick(String),
    Friend(String),
    Friends,
    Me,
    Profile(ProfileField, String),
    Help,
    Logout,
    Quit,
    /// Plain text for the active room
    Say(String),
}

/// Input that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '/{0}', type /help for the list of commands")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// Parse a trimmed, non-empty input line
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Say(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name.to_lowercase().as_str() {
        "rooms" => Ok(Command::Rooms),
        "open" | "join" => required(arg, "/open <room id or name>").map(Command::Open),
        "create" => required(arg, "/create <name>").map(Command::Create),
        "rename" => required(arg, "/rename <name>").map(Command::Rename),
        "delete" => required(arg, "/delete <password>").map(Command::Delete),
        "members" => Ok(Command::Members),
        "invite" => single(arg, "/invite <user id>").map(Command::Invite),
        "kick" | "remove" => single(arg, "/kick <user id>").map(Command::Kick),
        "friend" => single(arg, "/friend <email>").map(Command::Friend),
        "friends" => Ok(Command::Friends),
        "me" => Ok(Command::Me),
        "profile" => parse_profile(arg),
        "help" | "?" => Ok(Command::Help),
        "logout" => Ok(Command::Logout),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(CommandError::Unknown(name.to_string())),
    }
}

fn required(arg: &str, usage: &'static str) -> Result<String, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    Ok(arg.to_string())
}

/// Exactly one whitespace-free argument
fn single(arg: &str, usage: &'static str) -> Result<String, CommandError> {
    let arg = required(arg, usage)?;
    if arg.split_whitespace().count() != 1 {
        return Err(CommandError::Usage(usage));
    }
    Ok(arg)
}

fn parse_profile(arg: &str) -> Result<Command, CommandError> {
    const USAGE: &str = "/profile name <name> | /profile email <email>";
    let (field, value) = arg
        .split_once(char::is_whitespace)
        .ok_or(CommandError::Usage(USAGE))?;
    let field = match field.to_lowercase().as_str() {
        "name" => ProfileField::Name,
        "email" => ProfileField::Email,
        _ => return Err(CommandError::Usage(USAGE)),
    };
    Ok(Command::Profile(field, required(value.trim(), USAGE)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_message() {
        // テスト項目: スラッシュで始まらない行はメッセージになる
        // given (前提条件):
        let line = "  hello everyone ";

        // when (操作):
        let result = parse_command(line);

        // then (期待する結果):
        assert_eq!(result, Ok(Command::Say("hello everyone".to_string())));
    }

    #[test]
    fn test_open_keeps_spaces_in_room_name() {
        // テスト項目: /open の引数は空白を含むルーム名として扱われる
        // given (前提条件):
        let line = "/open book club";

        // when (操作):
        let result = parse_command(line);

        // then (期待する結果):
        assert_eq!(result, Ok(Command::Open("book club".to_string())));
    }

    #[test]
    fn test_command_names_are_case_insensitive() {
        // テスト項目: コマンド名は大文字小文字を区別しない
        // given (前提条件):
        let line = "/ROOMS";

        // when (操作):
        let result = parse_command(line);

        // then (期待する結果):
        assert_eq!(result, Ok(Command::Rooms));
    }

    #[test]
    fn test_missing_argument_shows_usage() {
        // テスト項目: 引数が必要なコマンドで引数がない場合は使い方が返る
        // given (前提条件):
        let line = "/create";

        // when (操作):
        let result = parse_command(line);

        // then (期待する結果):
        assert_eq!(result, Err(CommandError::Usage("/create <name>")));
    }

    #[test]
    fn test_invite_takes_exactly_one_argument() {
        // テスト項目: /invite は引数を 1 つだけ受け付ける
        // given (前提条件):
        let ok_line = "/invite u2";
        let bad_line = "/invite u2 u3";

        // when (操作):
        let ok = parse_command(ok_line);
        let bad = parse_command(bad_line);

        // then (期待する結果):
        assert_eq!(ok, Ok(Command::Invite("u2".to_string())));
        assert!(matches!(bad, Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_kick_alias() {
        // テスト項目: /remove は /kick の別名として扱われる
        // given (前提条件):
        let line = "/remove u2";

        // when (操作):
        let result = parse_command(line);

        // then (期待する結果):
        assert_eq!(result, Ok(Command::Kick("u2".to_string())));
    }

    #[test]
    fn test_profile_command() {
        // テスト項目: /profile でプロフィールの項目と値が解析される
        // given (前提条件):
        let name_line = "/profile name Alice Liddell";
        let bad_line = "/profile age 12";

        // when (操作):
        let name = parse_command(name_line);
        let bad = parse_command(bad_line);

        // then (期待する結果):
        assert_eq!(
            name,
            Ok(Command::Profile(ProfileField::Name, "Alice Liddell".to_string()))
        );
        assert!(matches!(bad, Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_unknown_command() {
        // テスト項目: 未知のコマンドはエラーになる
        // given (前提条件):
        let line = "/dance";

        // when (操作):
        let result = parse_command(line);

        // then (期待する結果):
        assert_eq!(result, Err(CommandError::Unknown("dance".to_string())));
    }
}
