//! In-memory bookmark store
//!
//! Used for tests and for sessions that should not touch the disk.

use anyhow::Result;
use std::sync::RwLock;

use super::{BookmarkStore, Bookmarks};

/// In-memory implementation of BookmarkStore
pub struct InMemoryBookmarkStore {
    bookmarks: RwLock<Bookmarks>,
    saves: RwLock<usize>,
}

impl InMemoryBookmarkStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self::with_bookmarks(Bookmarks::new())
    }

    /// Create a store pre-populated with bookmarks
    pub fn with_bookmarks(bookmarks: Bookmarks) -> Self {
        Self {
            bookmarks: RwLock::new(bookmarks),
            saves: RwLock::new(0),
        }
    }

    /// Current contents
    pub fn snapshot(&self) -> Bookmarks {
        self.bookmarks.read().unwrap().clone()
    }

    /// Number of times the bookmarks were written
    pub fn save_count(&self) -> usize {
        *self.saves.read().unwrap()
    }
}

impl Default for InMemoryBookmarkStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookmarkStore for InMemoryBookmarkStore {
    fn load(&self) -> Result<Bookmarks> {
        Ok(self.bookmarks.read().unwrap().clone())
    }

    fn save(&self, bookmarks: &Bookmarks) -> Result<()> {
        *self.bookmarks.write().unwrap() = bookmarks.clone();
        *self.saves.write().unwrap() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageId, TicketId};

    #[test]
    fn test_save_replaces_everything() {
        let store = InMemoryBookmarkStore::new();
        assert!(store.load().unwrap().is_empty());

        let mut first = Bookmarks::new();
        first.insert(TicketId::new(1), MessageId::new(10));
        first.insert(TicketId::new(2), MessageId::new(20));
        store.save(&first).unwrap();

        let mut second = Bookmarks::new();
        second.insert(TicketId::new(3), MessageId::new(30));
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap(), second);
        assert_eq!(store.save_count(), 2);
    }
}
