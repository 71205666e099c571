//! Rendering seam for the ticket store

use super::TicketSummary;
use crate::models::Ticket;

/// Receives the store's state whenever it changes
pub trait TicketView: Send {
    /// Show the ticket list, already in presentation order
    fn render_list(&mut self, tickets: &[TicketSummary]);

    /// Show the thread of the selected ticket, or clear it when `None`
    fn render_thread(&mut self, ticket: Option<&Ticket>);
}
