//! Action handler for ticket operations
//!
//! Actions are performed in three steps:
//! 1. Call the backend to update server state
//! 2. Apply the ticket it returns to the local store and select it
//! 3. Bump the poller so the next snapshot arrives quickly
//!
//! The server stays the source of truth; the returned ticket only bridges
//! the gap until the next snapshot.

use anyhow::{Context, Result};
use log::info;
use std::sync::{Arc, MutexGuard, PoisonError};

use crate::api::SupportApi;
use crate::models::{Ticket, TicketId};
use crate::sync::Poller;
use crate::tickets::{SharedStore, TicketStore};

/// An action that cannot be sent to the backend in the current state
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("no ticket selected")]
    NoSelection,
    #[error("ticket {0} is closed")]
    TicketClosed(TicketId),
    #[error("ticket {0} not found")]
    UnknownTicket(TicketId),
    #[error("message is empty")]
    EmptyMessage,
    #[error("product name is empty")]
    EmptyProduct,
}

/// Handler for purchases, chat messages and closing tickets
pub struct ActionHandler {
    api: Arc<dyn SupportApi>,
    store: SharedStore,
    poller: Poller<Vec<Ticket>>,
}

impl ActionHandler {
    /// Create a new action handler
    pub fn new(api: Arc<dyn SupportApi>, store: SharedStore, poller: Poller<Vec<Ticket>>) -> Self {
        Self { api, store, poller }
    }

    /// Buy a product. Opens and selects the ticket created for it.
    pub async fn buy(&self, product: &str) -> Result<TicketId> {
        let product = product.trim().to_string();
        if product.is_empty() {
            return Err(ActionError::EmptyProduct.into());
        }

        info!("Buying {}", product);
        let ticket = self.call(move |api| api.buy(&product)).await?;
        Ok(self.apply(ticket))
    }

    /// Post a message on the selected ticket
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ActionError::EmptyMessage.into());
        }
        let id = self.selected_open_ticket()?;

        info!("Sending message on ticket {}", id);
        let ticket = self.call(move |api| api.send_message(id, &text)).await?;
        self.apply(ticket);
        Ok(())
    }

    /// Close the selected ticket
    pub async fn close_selected(&self) -> Result<TicketId> {
        let id = self.selected_open_ticket()?;

        info!("Closing ticket {}", id);
        let ticket = self.call(move |api| api.close_ticket(id)).await?;
        Ok(self.apply(ticket))
    }

    /// Select a known ticket, marking it read
    pub fn select(&self, id: TicketId) -> Result<(), ActionError> {
        let mut store = self.lock_store();
        if store.find(id).is_none() {
            return Err(ActionError::UnknownTicket(id));
        }
        store.select_ticket(id);
        Ok(())
    }

    fn selected_open_ticket(&self) -> Result<TicketId, ActionError> {
        let store = self.lock_store();
        let ticket = store.selected().ok_or(ActionError::NoSelection)?;
        if !ticket.is_open() {
            return Err(ActionError::TicketClosed(ticket.id));
        }
        Ok(ticket.id)
    }

    fn apply(&self, ticket: Ticket) -> TicketId {
        let id = ticket.id;
        {
            let mut store = self.lock_store();
            store.apply_optimistic_update(ticket);
            store.select_ticket(id);
        }
        self.poller.bump_fast();
        id
    }

    /// Run a blocking backend call off the event loop
    async fn call<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn SupportApi) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let api = Arc::clone(&self.api);
        tokio::task::spawn_blocking(move || f(api.as_ref()))
            .await
            .context("Backend call did not complete")?
    }

    fn lock_store(&self) -> MutexGuard<'_, TicketStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
