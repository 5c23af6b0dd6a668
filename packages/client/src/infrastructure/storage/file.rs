//! File-backed token storage.
//!
//! The file holds a flat JSON object of string keys and values, the same shape
//! as browser local storage. Keys other than the token key are preserved.
//! On unix the file is readable by its owner only (mode 0600).

use std::{
    collections::BTreeMap,
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use crate::{
    domain::{AuthToken, TOKEN_STORAGE_KEY, TokenStore},
    error::ClientError,
};

type Entries = BTreeMap<String, String>;

/// Token store persisted to a JSON file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, ClientError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(storage_error(&self.path, e)),
        };
        if text.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&text).map_err(|e| storage_error(&self.path, e))
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }
        let text = serde_json::to_string_pretty(entries)?;
        write_private(&self.path, &text).map_err(|e| storage_error(&self.path, e))
    }
}

/// Write `text`, restricting the file to its owner
#[cfg(unix)]
fn write_private(path: &Path, text: &str) -> io::Result<()> {
    use std::{
        fs::{OpenOptions, Permissions},
        io::Write,
        os::unix::fs::{OpenOptionsExt, PermissionsExt},
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies to newly created files
    file.set_permissions(Permissions::from_mode(0o600))?;
    file.write_all(text.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &Path, text: &str) -> io::Result<()> {
    fs::write(path, text)
}

fn storage_error(path: &Path, e: impl std::fmt::Display) -> ClientError {
    ClientError::Storage(format!("{}: {}", path.display(), e))
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<AuthToken>, ClientError> {
        Ok(self
            .read_entries()?
            .remove(TOKEN_STORAGE_KEY)
            .map(AuthToken::new))
    }

    fn save(&self, token: &AuthToken) -> Result<(), ClientError> {
        let mut entries = self.read_entries()?;
        entries.insert(TOKEN_STORAGE_KEY.to_string(), token.as_str().to_string());
        self.write_entries(&entries)?;
        tracing::debug!("Token saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        let mut entries = self.read_entries()?;
        if entries.remove(TOKEN_STORAGE_KEY).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)?;
        tracing::debug!("Token removed from {}", self.path.display());
        Ok(())
    }
}
