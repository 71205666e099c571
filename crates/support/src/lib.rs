//! Support crate - Business logic for the shop's ticket chat
//!
//! This crate provides platform-independent client functionality including:
//! - Domain models (Ticket, Message)
//! - Shop backend client and wire types
//! - Bookmark storage trait abstractions
//! - Adaptive poller with snapshot change detection
//! - Ticket store reconciling snapshots with optimistic updates
//! - Action handlers for mutations (buy, send, close)
//!
//! This crate has no UI dependencies; rendering goes through [`TicketView`].

pub mod actions;
pub mod api;
pub mod config;
pub mod models;
pub mod session;
pub mod storage;
pub mod sync;
pub mod tickets;

pub use actions::{ActionError, ActionHandler};
pub use api::{ApiError, ShopClient, SupportApi};
pub use config::{ClientConfig, PollConfig, PollConfigError};
pub use models::{Message, MessageId, Origin, Ticket, TicketId, TicketStatus};
pub use session::{SupportSession, ticket_fetcher};
pub use storage::{BookmarkStore, Bookmarks, FileBookmarkStore, InMemoryBookmarkStore};
pub use sync::{Activity, Cadence, Fingerprint, Poller, PollerBuilder, snapshots_equal};
pub use tickets::{SharedStore, TicketStore, TicketSummary, TicketView, unread_count};
