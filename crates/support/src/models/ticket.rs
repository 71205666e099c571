//! Ticket model representing a support conversation tied to a purchase

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{Message, MessageId};

/// Unique identifier for a ticket (server-assigned, increasing over time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub u64);

impl TicketId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for TicketId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a ticket. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Open,
    Closed,
}

impl TicketStatus {
    /// Sort rank used for list presentation (open first)
    fn rank(self) -> u8 {
        match self {
            TicketStatus::Open => 0,
            TicketStatus::Closed => 1,
        }
    }
}

/// A support ticket created by a purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Server-assigned ticket ID
    pub id: TicketId,
    /// Open or closed
    pub status: TicketStatus,
    /// Name of the purchased product the ticket is about
    pub product: String,
    /// Identifier of the owning user
    pub user_id: String,
    /// Display name of the owning user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Messages in send order
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Ticket {
    /// Create a new open ticket without messages
    pub fn new(id: TicketId, product: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id,
            status: TicketStatus::Open,
            product: product.into(),
            user_id: user_id.into(),
            user_name: None,
            messages: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn is_open(&self) -> bool {
        self.status == TicketStatus::Open
    }

    /// ID of the most recent message, if any
    pub fn last_message_id(&self) -> Option<MessageId> {
        self.messages.last().map(|m| m.id)
    }

    /// Position of a message in the thread
    pub fn position_of(&self, id: MessageId) -> Option<usize> {
        self.messages.iter().position(|m| m.id == id)
    }
}

/// Presentation order: open before closed, then newest (highest id) first
pub fn presentation_order(a: &Ticket, b: &Ticket) -> Ordering {
    a.status
        .rank()
        .cmp(&b.status.rank())
        .then_with(|| b.id.cmp(&a.id))
}
