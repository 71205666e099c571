//! Request and response shapes of the shop backend
//!
//! Every call is a POST of `{action, user, ...payload}`. Responses carry
//! `ok` plus either the requested data or an `error` code.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ApiError;
use crate::models::{Ticket, TicketId};

/// Action names understood by the backend
pub mod actions {
    pub const TICKETS: &str = "tickets";
    pub const BUY: &str = "buy";
    pub const SEND: &str = "send";
    pub const CLOSE: &str = "close";
}

/// Request body
#[derive(Debug, Serialize)]
pub struct ApiRequest<'a> {
    pub action: &'a str,
    pub user: &'a str,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl<'a> ApiRequest<'a> {
    pub fn new(action: &'a str, user: &'a str) -> Self {
        Self {
            action,
            user,
            payload: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }

    pub fn tickets(user: &'a str) -> Self {
        Self::new(actions::TICKETS, user)
    }

    pub fn buy(user: &'a str, product: &str) -> Self {
        Self::new(actions::BUY, user).with("product", product)
    }

    pub fn send(user: &'a str, ticket: TicketId, text: &str) -> Self {
        Self::new(actions::SEND, user)
            .with("ticket", ticket.value())
            .with("text", text)
    }

    pub fn close(user: &'a str, ticket: TicketId) -> Self {
        Self::new(actions::CLOSE, user).with("ticket", ticket.value())
    }
}

/// Response to the ticket list action
#[derive(Debug, Deserialize)]
pub struct TicketsResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub tickets: Option<Vec<Ticket>>,
}

/// Response to actions returning a single ticket
#[derive(Debug, Deserialize)]
pub struct TicketResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ticket: Option<Ticket>,
}

fn rejected(action: &str, error: Option<String>) -> ApiError {
    ApiError::Rejected {
        action: action.to_string(),
        code: error.unwrap_or_else(|| "unknown".to_string()),
    }
}

impl TicketsResponse {
    /// Ticket list, or `None` when an ok response carries no list
    pub fn into_tickets(self) -> Result<Option<Vec<Ticket>>, ApiError> {
        if !self.ok {
            return Err(rejected(actions::TICKETS, self.error));
        }
        Ok(self.tickets)
    }
}

impl TicketResponse {
    pub fn into_ticket(self, action: &str) -> Result<Ticket, ApiError> {
        if !self.ok {
            return Err(rejected(action, self.error));
        }
        self.ticket.ok_or_else(|| ApiError::MissingField {
            action: action.to_string(),
            field: "ticket",
        })
    }
}
