//! Persistence for per-ticket "last seen message" bookmarks
//!
//! The trait-based design allows swapping between in-memory and file-backed
//! storage. Bookmarks are always written wholesale.

mod file;
mod memory;
mod traits;

pub use file::FileBookmarkStore;
pub use memory::InMemoryBookmarkStore;
pub use traits::{BookmarkStore, Bookmarks};
