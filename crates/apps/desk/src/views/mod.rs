//! Terminal views for the desk app

pub mod thread;
pub mod ticket_list;

use std::io::Write;

use log::warn;
use support::{Ticket, TicketSummary, TicketView};

/// Renders the ticket list and selected thread as text
pub struct TerminalView<W> {
    out: W,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write + Send> TicketView for TerminalView<W> {
    fn render_list(&mut self, tickets: &[TicketSummary]) {
        let text = format!("\n{}", ticket_list::format_list(tickets));
        self.write(&text);
    }

    fn render_thread(&mut self, ticket: Option<&Ticket>) {
        if let Some(ticket) = ticket {
            let text = format!("\n{}", thread::format_thread(ticket));
            self.write(&text);
        }
    }
}
