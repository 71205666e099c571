//! JSON file bookmark store
//!
//! One file per user, rewritten on every save:
//! `{"<ticket id>": <message id>, ...}`

use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

use super::{BookmarkStore, Bookmarks};

/// File-backed implementation of BookmarkStore
pub struct FileBookmarkStore {
    path: PathBuf,
}

impl FileBookmarkStore {
    /// Store bookmarks at an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store bookmarks for `user` in the shopdesk config directory
    pub fn for_user(user: &str) -> Result<Self> {
        let dir = config::ensure_config_dir()?;
        Ok(Self::new(dir.join(Self::file_name(user))))
    }

    /// File name for a user's bookmarks; characters unsafe in file names
    /// are replaced
    pub fn file_name(user: &str) -> String {
        let safe: String = user
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("seen-{}.json", safe)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BookmarkStore for FileBookmarkStore {
    fn load(&self) -> Result<Bookmarks> {
        if !self.path.exists() {
            debug!("No bookmark file at {}", self.path.display());
            return Ok(Bookmarks::new());
        }
        config::load_json_file(&self.path)
    }

    fn save(&self, bookmarks: &Bookmarks) -> Result<()> {
        config::save_json_file(&self.path, bookmarks)
    }
}
