//! Thread rendering - the selected ticket's conversation

use support::{Message, Origin, Ticket};

use super::ticket_list::status_label;

fn format_date(message: &Message) -> String {
    use chrono::{Local, Utc};
    let local = message.sent_at.with_timezone(&Local);
    let now = Utc::now().with_timezone(&Local);

    if local.date_naive() == now.date_naive() {
        // Today: show time
        local.format("%H:%M").to_string()
    } else {
        local.format("%b %d %H:%M").to_string()
    }
}

/// Who to show as the author of a message
pub fn author(message: &Message) -> &str {
    if let Some(sender) = message.sender.as_deref() {
        return sender;
    }
    match message.origin {
        Origin::User => "You",
        Origin::Admin => "Support",
        Origin::System => "System",
    }
}

pub fn format_message(message: &Message) -> String {
    let text = message.display_text().unwrap_or("(message deleted)");
    format!("[{}] {}: {}", format_date(message), author(message), text)
}

pub fn format_thread(ticket: &Ticket) -> String {
    let mut out = format!(
        "== #{} {} ({}) ==\n",
        ticket.id,
        ticket.product,
        status_label(ticket.status)
    );
    if ticket.messages.is_empty() {
        out.push_str("No messages\n");
    }
    for message in &ticket.messages {
        out.push_str(&format_message(message));
        out.push('\n');
    }
    if !ticket.is_open() {
        out.push_str("This ticket is closed.\n");
    }
    out
}
