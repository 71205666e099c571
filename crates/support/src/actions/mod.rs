//! User actions module
//!
//! Provides the action handler for purchases, chat messages and closing
//! tickets.

mod handler;

pub use handler::{ActionError, ActionHandler};
