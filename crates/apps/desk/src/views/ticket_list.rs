//! Ticket list rendering - one row per ticket with an unread badge

use support::{TicketStatus, TicketSummary};

pub fn status_label(status: TicketStatus) -> &'static str {
    match status {
        TicketStatus::Open => "open",
        TicketStatus::Closed => "closed",
    }
}

/// Format a single row, e.g. `> #5 [open] Desk Lamp (2 unread)`
pub fn format_row(summary: &TicketSummary) -> String {
    let marker = if summary.is_selected { '>' } else { ' ' };
    let mut row = format!(
        "{} #{} [{}] {}",
        marker,
        summary.id,
        status_label(summary.status),
        summary.product
    );
    if summary.unread > 0 {
        row.push_str(&format!(" ({} unread)", summary.unread));
    }
    row
}

/// Format the whole list, already in presentation order
pub fn format_list(tickets: &[TicketSummary]) -> String {
    if tickets.is_empty() {
        return "No tickets yet. Buy something with `buy <product>`.".to_string();
    }

    let unread: usize = tickets.iter().map(|t| t.unread).sum();
    let mut out = format!("Tickets ({} unread)\n", unread);
    for summary in tickets {
        out.push_str(&format_row(summary));
        out.push('\n');
    }
    out
}
