//! Client-side ticket state
//!
//! [`TicketStore`] holds the ticket list as of the last sync, the current
//! selection and the seen bookmarks, and pushes every change to a
//! [`TicketView`].

mod store;
mod summary;
mod view;

pub use store::{SharedStore, TicketStore};
pub use summary::{TicketSummary, unread_count};
pub use view::TicketView;
