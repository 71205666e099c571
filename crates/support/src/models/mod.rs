//! Domain models for shop support tickets

mod message;
mod ticket;

pub use message::{Message, MessageBuilder, MessageId, Origin};
pub use ticket::{Ticket, TicketId, TicketStatus, presentation_order};
