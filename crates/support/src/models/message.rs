//! Message model representing a single chat entry inside a ticket

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a message within its ticket (server-assigned)
///
/// Identifiers grow in send order, so comparing two ids of the same
/// ticket tells which message was sent later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl MessageId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for MessageId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// The customer who owns the ticket
    User,
    /// Shop staff answering the ticket
    Admin,
    /// Automatic notices (purchase receipts, ticket closed, ...)
    System,
}

/// A single message in a ticket thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Server-assigned message ID
    pub id: MessageId,
    /// Author of the message
    pub origin: Origin,
    /// Message body; cleared or stale once the message is deleted
    #[serde(default)]
    pub text: Option<String>,
    /// Whether the message was deleted
    #[serde(default)]
    pub deleted: bool,
    /// When the message was sent
    pub sent_at: DateTime<Utc>,
    /// Optional display label for the sender (e.g. staff name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

impl Message {
    /// Create a new message builder
    pub fn builder(id: MessageId, origin: Origin) -> MessageBuilder {
        MessageBuilder::new(id, origin)
    }

    /// Text safe to show the user.
    ///
    /// Deleted messages never expose their text, even when a stale copy
    /// is still held locally.
    pub fn display_text(&self) -> Option<&str> {
        if self.deleted {
            return None;
        }
        self.text.as_deref()
    }

    /// Whether this message counts towards the unread badge
    pub fn is_unread_candidate(&self) -> bool {
        self.origin == Origin::Admin && !self.deleted
    }
}

/// Builder for creating Message instances
pub struct MessageBuilder {
    id: MessageId,
    origin: Origin,
    text: Option<String>,
    deleted: bool,
    sent_at: Option<DateTime<Utc>>,
    sender: Option<String>,
}

impl MessageBuilder {
    fn new(id: MessageId, origin: Origin) -> Self {
        Self {
            id,
            origin,
            text: None,
            deleted: false,
            sent_at: None,
            sender: None,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn deleted(mut self, deleted: bool) -> Self {
        self.deleted = deleted;
        self
    }

    pub fn sent_at(mut self, sent_at: DateTime<Utc>) -> Self {
        self.sent_at = Some(sent_at);
        self
    }

    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn build(self) -> Message {
        Message {
            id: self.id,
            origin: self.origin,
            text: self.text,
            deleted: self.deleted,
            sent_at: self.sent_at.unwrap_or_else(Utc::now),
            sender: self.sender,
        }
    }
}
