//! List summaries and unread counting

use serde::{Deserialize, Serialize};

use crate::models::{MessageId, Ticket, TicketId, TicketStatus};

/// Summary information for displaying a ticket in a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketSummary {
    /// Ticket ID
    pub id: TicketId,
    /// Open or closed
    pub status: TicketStatus,
    /// Product the ticket is about
    pub product: String,
    /// Number of messages in the thread
    pub message_count: usize,
    /// Admin messages the user has not seen yet
    pub unread: usize,
    /// Whether this is the selected ticket
    pub is_selected: bool,
}

impl TicketSummary {
    pub fn new(ticket: &Ticket, unread: usize, is_selected: bool) -> Self {
        Self {
            id: ticket.id,
            status: ticket.status,
            product: ticket.product.clone(),
            message_count: ticket.messages.len(),
            unread,
            is_selected,
        }
    }
}

/// Count admin messages after the bookmark that are not deleted.
///
/// Without a bookmark, or when the bookmarked message is no longer in the
/// thread, the whole thread is counted.
pub fn unread_count(ticket: &Ticket, bookmark: Option<MessageId>) -> usize {
    let start = bookmark
        .and_then(|id| ticket.position_of(id))
        .map_or(0, |pos| pos + 1);

    ticket.messages[start..]
        .iter()
        .filter(|m| m.is_unread_candidate())
        .count()
}
