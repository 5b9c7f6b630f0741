// Session persistence. After a granted verification the backend hands out
// a session cookie; we keep it in a file in the user's home directory so
// `bioid activity` works on later runs without scanning again.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

const SESSION_FILE: &str = ".bioid_session";

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store in the home directory, or the working directory if there is none.
    pub fn in_home() -> Self {
        let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        SessionStore::at(dir.join(SESSION_FILE))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        SessionStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the cookie, readable by the owner only.
    pub fn save(&self, cookie: &str) -> Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options
            .open(&self.path)
            .with_context(|| format!("Failed to open session file {}", self.path.display()))?;
        // `mode` only applies when the file is created.
        #[cfg(unix)]
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Failed to restrict session file {}", self.path.display()))?;
        file.write_all(cookie.as_bytes())
            .with_context(|| format!("Failed to write session file {}", self.path.display()))
    }

    /// Saved cookie, or `None` when nothing was saved yet.
    pub fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(data) => {
                let data = data.trim();
                Ok((!data.is_empty()).then(|| data.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read session file {}", self.path.display())),
        }
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove session file {}", self.path.display())),
        }
    }
}
