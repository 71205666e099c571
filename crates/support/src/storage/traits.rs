//! Storage trait definitions

use anyhow::Result;
use std::collections::BTreeMap;

use crate::models::{MessageId, TicketId};

/// Ticket id -> id of the last message the user has seen
pub type Bookmarks = BTreeMap<TicketId, MessageId>;

/// Durable key-value store for seen bookmarks
///
/// Implementations report failures; callers decide whether to fall back
/// to an empty mapping.
pub trait BookmarkStore: Send + Sync {
    /// Load all bookmarks. A store that was never written yields an empty map.
    fn load(&self) -> Result<Bookmarks>;

    /// Replace all stored bookmarks
    fn save(&self, bookmarks: &Bookmarks) -> Result<()>;
}
