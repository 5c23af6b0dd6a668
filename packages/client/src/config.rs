//! Client configuration resolved from the command line.

use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_SOCKET_URL: &str = "ws://127.0.0.1:3000/ws";

/// Where the auth token is kept between runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageMode {
    /// JSON key/value file
    File(PathBuf),
    /// Process memory only; the session ends with the process
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the REST API
    pub api_url: String,
    /// URL of the socket endpoint
    pub socket_url: String,
    pub storage: StorageMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            socket_url: DEFAULT_SOCKET_URL.to_string(),
            storage: StorageMode::File(default_storage_path(
                std::env::var_os("HOME").map(PathBuf::from).as_deref(),
            )),
        }
    }
}

/// `<home>/.kaiwa/storage.json`, or relative to the working directory without a home
pub fn default_storage_path(home: Option<&Path>) -> PathBuf {
    home.unwrap_or_else(|| Path::new("."))
        .join(".kaiwa")
        .join("storage.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_storage_path_under_home() {
        // テスト項目: HOME がある場合、その下の .kaiwa/storage.json になる
        // given (前提条件):
        let home = Path::new("/home/alice");

        // when (操作):
        let path = default_storage_path(Some(home));

        // then (期待する結果):
        assert_eq!(path, PathBuf::from("/home/alice/.kaiwa/storage.json"));
    }

    #[test]
    fn test_default_storage_path_without_home() {
        // テスト項目: HOME がない場合、カレントディレクトリ基準になる
        // given (前提条件):
        let home = None;

        // when (操作):
        let path = default_storage_path(home);

        // then (期待する結果):
        assert_eq!(path, PathBuf::from("./.kaiwa/storage.json"));
    }
}
