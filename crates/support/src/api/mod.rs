//! Shop backend integration
//!
//! This module provides:
//! - The [`SupportApi`] abstraction used by the poller and action handler
//! - A blocking HTTP client for the shop backend
//! - Wire types and response decoding

mod client;
pub mod wire;

pub use client::ShopClient;

use anyhow::Result;

use crate::models::{Ticket, TicketId};

/// Error returned when the backend answers but refuses or garbles a request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// `{ok: false, error: <code>}`
    #[error("{action} rejected by server: {code}")]
    Rejected { action: String, code: String },
    /// `{ok: true}` without the field the action should return
    #[error("{action} response is missing `{field}`")]
    MissingField { action: String, field: &'static str },
}

/// Operations the client needs from the shop backend
///
/// Calls are blocking; async callers should run them on a blocking thread.
pub trait SupportApi: Send + Sync {
    /// All tickets of the signed-in user. `None` when the server had no
    /// ticket list to give.
    fn list_tickets(&self) -> Result<Option<Vec<Ticket>>>;

    /// Purchase a product, opening a ticket for it
    fn buy(&self, product: &str) -> Result<Ticket>;

    /// Post a message on a ticket
    fn send_message(&self, ticket: TicketId, text: &str) -> Result<Ticket>;

    /// Close a ticket
    fn close_ticket(&self, ticket: TicketId) -> Result<Ticket>;
}
