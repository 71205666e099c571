//! Support session wiring
//!
//! Ties the ticket store, the adaptive poller and the action handler
//! together for one signed-in user.

use anyhow::{Context, Result};
use log::debug;
use std::sync::{Arc, PoisonError};

use crate::actions::ActionHandler;
use crate::api::SupportApi;
use crate::config::PollConfig;
use crate::models::Ticket;
use crate::storage::BookmarkStore;
use crate::sync::{Activity, FetchFuture, Poller};
use crate::tickets::{SharedStore, TicketStore, TicketView};

/// Fetch operation polling the backend's ticket list on a blocking thread
pub fn ticket_fetcher(
    api: Arc<dyn SupportApi>,
) -> impl Fn() -> FetchFuture<Vec<Ticket>> + Send + Sync + 'static {
    move || {
        let api = Arc::clone(&api);
        Box::pin(async move {
            tokio::task::spawn_blocking(move || api.list_tickets())
                .await
                .context("Ticket fetch did not complete")?
        }) as FetchFuture<Vec<Ticket>>
    }
}

/// Everything one user's support client runs on
pub struct SupportSession {
    store: SharedStore,
    poller: Poller<Vec<Ticket>>,
    actions: ActionHandler,
}

impl SupportSession {
    /// Build a stopped session.
    ///
    /// `gate` decides whether a poll tick should hit the backend (for
    /// example: is the ticket view visible).
    pub fn new<G>(
        poll: PollConfig,
        api: Arc<dyn SupportApi>,
        bookmarks: Box<dyn BookmarkStore>,
        view: Box<dyn TicketView>,
        gate: G,
    ) -> Result<Self>
    where
        G: Fn() -> bool + Send + Sync + 'static,
    {
        let store = TicketStore::new(bookmarks, view).into_shared();

        let sink = Arc::clone(&store);
        let poller = Poller::builder(poll, ticket_fetcher(Arc::clone(&api)))
            .name("ticket poller")
            .gate(gate)
            .on_snapshot(move |tickets: Vec<Ticket>, activity| {
                // Unchanged snapshots carry nothing the store has not seen.
                if activity != Activity::Changed {
                    return;
                }
                debug!("Applying snapshot of {} tickets", tickets.len());
                sink.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .apply_snapshot(tickets);
            })
            .build()?;

        let actions = ActionHandler::new(api, Arc::clone(&store), poller.clone());

        Ok(Self {
            store,
            poller,
            actions,
        })
    }

    /// Start polling. Must be called from inside a tokio runtime.
    pub fn start(&self) {
        self.poller.start();
    }

    pub fn stop(&self) {
        self.poller.stop();
    }

    /// Poll again soon, e.g. after the view became visible
    pub fn refresh(&self) {
        self.poller.bump_fast();
    }

    pub fn actions(&self) -> &ActionHandler {
        &self.actions
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn poller(&self) -> &Poller<Vec<Ticket>> {
        &self.poller
    }
}
