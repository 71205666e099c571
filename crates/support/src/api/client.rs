//! Shop backend HTTP client
//!
//! Uses synchronous HTTP (ureq) to be executor-agnostic.

use anyhow::{Context, Result};
use log::debug;
use serde::de::DeserializeOwned;
use std::time::Duration;
use ureq::Agent;

use super::SupportApi;
use super::wire::{ApiRequest, TicketResponse, TicketsResponse, actions};
use crate::config::ClientConfig;
use crate::models::{Ticket, TicketId};

/// Blocking client for the shop backend
pub struct ShopClient {
    agent: Agent,
    api_url: String,
    user: String,
}

impl ShopClient {
    /// Per-request timeout
    const TIMEOUT: Duration = Duration::from_secs(15);

    /// Create a client for `user` talking to `api_url`
    pub fn new(api_url: impl Into<String>, user: impl Into<String>) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Self::TIMEOUT))
            .build();
        Self {
            agent: Agent::new_with_config(config),
            api_url: api_url.into(),
            user: user.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_url.clone(), config.user.clone())
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    fn call<T: DeserializeOwned>(&self, request: &ApiRequest<'_>) -> Result<T> {
        debug!("POST {} action={}", self.api_url, request.action);

        let mut response = self
            .agent
            .post(&self.api_url)
            .send_json(request)
            .with_context(|| format!("Failed to send {} request", request.action))?;

        response
            .body_mut()
            .read_json()
            .with_context(|| format!("Failed to parse {} response", request.action))
    }

    fn ticket_action(&self, request: ApiRequest<'_>) -> Result<Ticket> {
        let action = request.action;
        let response: TicketResponse = self.call(&request)?;
        Ok(response.into_ticket(action)?)
    }
}

impl SupportApi for ShopClient {
    fn list_tickets(&self) -> Result<Option<Vec<Ticket>>> {
        let response: TicketsResponse = self.call(&ApiRequest::tickets(&self.user))?;
        Ok(response.into_tickets()?)
    }

    fn buy(&self, product: &str) -> Result<Ticket> {
        self.ticket_action(ApiRequest::buy(&self.user, product))
    }

    fn send_message(&self, ticket: TicketId, text: &str) -> Result<Ticket> {
        self.ticket_action(ApiRequest::send(&self.user, ticket, text))
    }

    fn close_ticket(&self, ticket: TicketId) -> Result<Ticket> {
        debug!("Closing ticket {}", ticket);
        self.ticket_action(ApiRequest::close(&self.user, ticket))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = ClientConfig::from_json(
            r#"{ "api_url": "http://localhost:9/api", "user": "u-7" }"#,
        )
        .unwrap();
        let client = ShopClient::from_config(&config);
        assert_eq!(client.user(), "u-7");
        assert_eq!(client.api_url, "http://localhost:9/api");
    }

    #[test]
    fn test_unreachable_server_is_error() {
        // Port 9 (discard) is not expected to speak HTTP on localhost
        let client = ShopClient::new("http://127.0.0.1:9/api", "u-7");
        let err = tokio_test::assert_err!(client.list_tickets());
        assert!(format!("{:#}", err).contains("tickets"));
    }

    #[test]
    fn test_action_names() {
        assert_eq!(ApiRequest::buy("u", "Lamp").action, actions::BUY);
        assert_eq!(ApiRequest::close("u", TicketId::new(1)).action, actions::CLOSE);
    }
}
