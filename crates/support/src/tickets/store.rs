//! Ticket state store
//!
//! Reconciles two sources of ticket data:
//! - full snapshots from the poller (authoritative as of the fetch)
//! - single tickets returned by user actions (applied optimistically until
//!   the next snapshot arrives)

use log::{debug, warn};
use std::sync::{Arc, Mutex};

use super::{TicketSummary, TicketView, unread_count};
use crate::models::{MessageId, Ticket, TicketId, presentation_order};
use crate::storage::{BookmarkStore, Bookmarks};

/// Store shared between the poller and user actions
pub type SharedStore = Arc<Mutex<TicketStore>>;

/// Local view of the user's tickets
pub struct TicketStore {
    tickets: Vec<Ticket>,
    selected: Option<TicketId>,
    bookmarks: Bookmarks,
    persistence: Box<dyn BookmarkStore>,
    view: Box<dyn TicketView>,
}

impl TicketStore {
    /// Create an empty store, loading bookmarks from `persistence`.
    ///
    /// Unreadable bookmarks are logged and replaced with an empty mapping.
    pub fn new(persistence: Box<dyn BookmarkStore>, view: Box<dyn TicketView>) -> Self {
        let bookmarks = match persistence.load() {
            Ok(bookmarks) => bookmarks,
            Err(e) => {
                warn!("Ignoring unreadable seen bookmarks: {:#}", e);
                Bookmarks::new()
            }
        };

        Self {
            tickets: Vec::new(),
            selected: None,
            bookmarks,
            persistence,
            view,
        }
    }

    /// Wrap the store for sharing with the poller and action handler
    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    /// Replace the ticket list with a server snapshot.
    ///
    /// Tickets seen for the first time get a bookmark on their current last
    /// message, so existing history does not show up as unread. A selected
    /// ticket missing from the snapshot is deselected.
    pub fn apply_snapshot(&mut self, tickets: Vec<Ticket>) {
        self.tickets = tickets;

        let mut seeded = 0;
        for ticket in &self.tickets {
            if self.bookmarks.contains_key(&ticket.id) {
                continue;
            }
            if let Some(last) = ticket.last_message_id() {
                self.bookmarks.insert(ticket.id, last);
                seeded += 1;
            }
        }
        if seeded > 0 {
            debug!("Seeded {} seen bookmarks", seeded);
            self.persist_bookmarks();
        }

        self.render_list();

        if let Some(id) = self.selected {
            if self.find(id).is_none() {
                debug!("Selected ticket {} disappeared from snapshot", id);
                self.selected = None;
            }
            self.render_thread();
        }
    }

    /// Merge a ticket returned directly by a user action.
    ///
    /// Replaces the ticket with the same id, or appends it. Bookmarks are
    /// left alone.
    pub fn apply_optimistic_update(&mut self, ticket: Ticket) {
        let id = ticket.id;
        match self.tickets.iter_mut().find(|t| t.id == id) {
            Some(existing) => *existing = ticket,
            None => self.tickets.push(ticket),
        }

        self.render_list();
        if self.selected == Some(id) {
            self.render_thread();
        }
    }

    /// Select a ticket and mark everything in it as seen.
    ///
    /// Unknown ids still become the selection; the thread view is then
    /// cleared until a snapshot brings the ticket in or drops it.
    pub fn select_ticket(&mut self, id: TicketId) {
        self.selected = Some(id);

        if let Some(last) = self.find(id).and_then(Ticket::last_message_id) {
            self.bookmarks.insert(id, last);
            self.persist_bookmarks();
        }

        self.render_list();
        self.render_thread();
    }

    /// Drop the selection and clear the thread view
    pub fn clear_selection(&mut self) {
        if self.selected.take().is_some() {
            self.render_list();
            self.render_thread();
        }
    }

    /// Unread admin messages in `ticket` according to the bookmarks
    pub fn unread_count(&self, ticket: &Ticket) -> usize {
        unread_count(ticket, self.bookmark(ticket.id))
    }

    /// Unread messages across all tickets
    pub fn total_unread(&self) -> usize {
        self.tickets.iter().map(|t| self.unread_count(t)).sum()
    }

    pub fn bookmark(&self, id: TicketId) -> Option<MessageId> {
        self.bookmarks.get(&id).copied()
    }

    /// Tickets in the order they were received
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn find(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    pub fn selected_id(&self) -> Option<TicketId> {
        self.selected
    }

    /// The selected ticket, if it is present in the list
    pub fn selected(&self) -> Option<&Ticket> {
        self.selected.and_then(|id| self.find(id))
    }

    /// Tickets in presentation order: open first, newest first
    pub fn sorted_tickets(&self) -> Vec<&Ticket> {
        let mut sorted: Vec<&Ticket> = self.tickets.iter().collect();
        sorted.sort_by(|a, b| presentation_order(a, b));
        sorted
    }

    /// List summaries in presentation order
    pub fn summaries(&self) -> Vec<TicketSummary> {
        self.sorted_tickets()
            .into_iter()
            .map(|t| TicketSummary::new(t, self.unread_count(t), self.selected == Some(t.id)))
            .collect()
    }

    fn persist_bookmarks(&self) {
        if let Err(e) = self.persistence.save(&self.bookmarks) {
            warn!("Failed to save seen bookmarks: {:#}", e);
        }
    }

    fn render_list(&mut self) {
        let summaries = self.summaries();
        self.view.render_list(&summaries);
    }

    fn render_thread(&mut self) {
        let selected = self.selected.and_then(|id| self.tickets.iter().find(|t| t.id == id));
        self.view.render_thread(selected);
    }
}
