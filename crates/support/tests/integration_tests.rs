//! Integration tests for the support crate
//!
//! These tests drive a full session (poller + store + actions) against an
//! in-memory backend, from the first poll to user actions and back.

use anyhow::Result;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use support::{
    BookmarkStore, FileBookmarkStore, InMemoryBookmarkStore, Message, MessageId, Origin,
    PollConfig, SupportApi, SupportSession, Ticket, TicketId, TicketStatus, TicketSummary,
    TicketView,
};
use tempfile::TempDir;
use tokio::time::sleep;

/// Backend double whose state tests can change between polls
#[derive(Clone, Default)]
struct FakeBackend {
    tickets: Arc<Mutex<Vec<Ticket>>>,
    list_calls: Arc<AtomicUsize>,
}

impl FakeBackend {
    fn with_tickets(tickets: Vec<Ticket>) -> Self {
        let backend = Self::default();
        *backend.tickets.lock().unwrap() = tickets;
        backend
    }

    fn admin_reply(&self, ticket: TicketId, text: &str) {
        let mut tickets = self.tickets.lock().unwrap();
        let ticket = tickets.iter_mut().find(|t| t.id == ticket).unwrap();
        let id = MessageId::new(ticket.last_message_id().map_or(1, |id| id.value() + 1));
        ticket
            .messages
            .push(Message::builder(id, Origin::Admin).text(text).build());
    }

    fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

impl SupportApi for FakeBackend {
    fn list_tickets(&self) -> Result<Option<Vec<Ticket>>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(self.tickets.lock().unwrap().clone()))
    }

    fn buy(&self, product: &str) -> Result<Ticket> {
        let mut tickets = self.tickets.lock().unwrap();
        let id = TicketId::new(tickets.iter().map(|t| t.id.value()).max().unwrap_or(0) + 1);
        let ticket = Ticket::new(id, product, "u1").with_messages(vec![
            Message::builder(MessageId::new(1), Origin::System)
                .text("Order received")
                .build(),
        ]);
        tickets.push(ticket.clone());
        Ok(ticket)
    }

    fn send_message(&self, ticket: TicketId, text: &str) -> Result<Ticket> {
        let mut tickets = self.tickets.lock().unwrap();
        let ticket = tickets.iter_mut().find(|t| t.id == ticket).unwrap();
        let id = MessageId::new(ticket.last_message_id().map_or(1, |id| id.value() + 1));
        ticket
            .messages
            .push(Message::builder(id, Origin::User).text(text).build());
        Ok(ticket.clone())
    }

    fn close_ticket(&self, ticket: TicketId) -> Result<Ticket> {
        let mut tickets = self.tickets.lock().unwrap();
        let ticket = tickets.iter_mut().find(|t| t.id == ticket).unwrap();
        ticket.status = TicketStatus::Closed;
        Ok(ticket.clone())
    }
}

/// View that keeps the last rendered list
#[derive(Clone, Default)]
struct LastRender {
    list: Arc<Mutex<Vec<TicketSummary>>>,
    list_renders: Arc<AtomicUsize>,
}

impl TicketView for LastRender {
    fn render_list(&mut self, tickets: &[TicketSummary]) {
        *self.list.lock().unwrap() = tickets.to_vec();
        self.list_renders.fetch_add(1, Ordering::SeqCst);
    }

    fn render_thread(&mut self, _: Option<&Ticket>) {}
}

impl LastRender {
    fn unread(&self, id: u64) -> usize {
        self.list
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == TicketId::new(id))
            .map_or(0, |s| s.unread)
    }

    fn order(&self) -> Vec<u64> {
        self.list.lock().unwrap().iter().map(|s| s.id.value()).collect()
    }
}

/// Helper to create test messages
fn message(id: u64, origin: Origin) -> Message {
    Message::builder(MessageId::new(id), origin)
        .text(format!("message {}", id))
        .build()
}

/// Helper to create test tickets
fn ticket(id: u64, status: TicketStatus, messages: Vec<Message>) -> Ticket {
    Ticket::new(TicketId::new(id), format!("product {}", id), "u1")
        .with_status(status)
        .with_messages(messages)
}

fn poll_config() -> PollConfig {
    PollConfig {
        min_interval_ms: 1_000,
        max_interval_ms: 8_000,
        backoff_step_ms: 1_000,
        idle_threshold: 2,
    }
}

fn session(
    backend: &FakeBackend,
    bookmarks: Box<dyn BookmarkStore>,
    view: &LastRender,
    visible: &Arc<AtomicBool>,
) -> SupportSession {
    let visible = Arc::clone(visible);
    SupportSession::new(
        poll_config(),
        Arc::new(backend.clone()),
        bookmarks,
        Box::new(view.clone()),
        move || visible.load(Ordering::SeqCst),
    )
    .unwrap()
}

fn seeded_backend() -> FakeBackend {
    FakeBackend::with_tickets(vec![
        ticket(1, TicketStatus::Closed, vec![message(1, Origin::System), message(2, Origin::Admin)]),
        ticket(5, TicketStatus::Open, vec![message(1, Origin::System), message(2, Origin::Admin)]),
        ticket(3, TicketStatus::Open, vec![message(1, Origin::Admin)]),
    ])
}

#[tokio::test(start_paused = true)]
async fn test_first_poll_shows_history_as_read() {
    let backend = seeded_backend();
    let view = LastRender::default();
    let visible = Arc::new(AtomicBool::new(true));
    let session = session(&backend, Box::new(InMemoryBookmarkStore::new()), &view, &visible);

    session.start();
    sleep(Duration::from_millis(100)).await;

    assert_eq!(backend.list_calls(), 1);
    assert_eq!(view.order(), vec![5, 3, 1]);
    assert_eq!(session.store().lock().unwrap().total_unread(), 0);
    session.stop();
}

#[tokio::test(start_paused = true)]
async fn test_admin_reply_shows_unread_until_selected() {
    let backend = seeded_backend();
    let view = LastRender::default();
    let visible = Arc::new(AtomicBool::new(true));
    let session = session(&backend, Box::new(InMemoryBookmarkStore::new()), &view, &visible);

    session.start();
    sleep(Duration::from_millis(100)).await;

    backend.admin_reply(TicketId::new(3), "Your replacement has shipped");
    sleep(Duration::from_millis(1_000)).await;
    assert_eq!(view.unread(3), 1);
    assert_eq!(view.unread(5), 0);

    session.actions().select(TicketId::new(3)).unwrap();
    assert_eq!(view.unread(3), 0);
    assert_eq!(
        session.store().lock().unwrap().bookmark(TicketId::new(3)),
        Some(MessageId::new(2))
    );
    session.stop();
}

#[tokio::test(start_paused = true)]
async fn test_quiet_server_backs_off_and_skips_rerender() {
    let backend = seeded_backend();
    let view = LastRender::default();
    let visible = Arc::new(AtomicBool::new(true));
    let session = session(&backend, Box::new(InMemoryBookmarkStore::new()), &view, &visible);

    session.start();
    sleep(Duration::from_millis(20_500)).await;

    // t=0,1,2,4,6,9,12,16,20
    assert_eq!(backend.list_calls(), 9);
    assert_eq!(session.poller().current_interval(), Duration::from_secs(5));
    assert_eq!(view.list_renders.load(Ordering::SeqCst), 1);

    // Activity snaps the cadence back
    backend.admin_reply(TicketId::new(5), "ping");
    sleep(Duration::from_millis(5_000)).await;
    assert_eq!(session.poller().current_interval(), Duration::from_secs(1));
    assert_eq!(view.unread(5), 1);
    session.stop();
}

#[tokio::test(start_paused = true)]
async fn test_hidden_view_does_not_poll() {
    let backend = seeded_backend();
    let view = LastRender::default();
    let visible = Arc::new(AtomicBool::new(false));
    let session = session(&backend, Box::new(InMemoryBookmarkStore::new()), &view, &visible);

    session.start();
    sleep(Duration::from_secs(30)).await;
    assert_eq!(backend.list_calls(), 0);

    visible.store(true, Ordering::SeqCst);
    session.refresh();
    sleep(Duration::from_millis(1_100)).await;
    assert_eq!(backend.list_calls(), 1);
    assert_eq!(view.order(), vec![5, 3, 1]);
    session.stop();
}

#[tokio::test(start_paused = true)]
async fn test_actions_reconcile_with_next_snapshot() {
    let backend = seeded_backend();
    let view = LastRender::default();
    let visible = Arc::new(AtomicBool::new(true));
    let session = session(&backend, Box::new(InMemoryBookmarkStore::new()), &view, &visible);

    session.start();
    sleep(Duration::from_millis(100)).await;

    let id = session.actions().buy("Desk Lamp").await.unwrap();
    assert_eq!(id, TicketId::new(6));
    assert_eq!(view.order(), vec![6, 5, 3, 1]);

    session.actions().send_message("Does it come with a bulb?").await.unwrap();
    backend.admin_reply(id, "Yes, one LED bulb");
    sleep(Duration::from_millis(1_100)).await;

    {
        let store = session.store().lock().unwrap();
        let ticket = store.find(id).unwrap();
        assert_eq!(store.tickets().len(), 4);
        assert_eq!(ticket.messages.len(), 3);
        // Reply arrived after the user last looked at the ticket
        assert_eq!(store.unread_count(ticket), 1);
    }

    session.actions().close_selected().await.unwrap();
    assert_eq!(view.order(), vec![5, 3, 6, 1]);
    assert_eq!(view.unread(6), 0);
    session.stop();
}

#[tokio::test(start_paused = true)]
async fn test_bookmarks_survive_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(FileBookmarkStore::file_name("u1"));
    let backend = seeded_backend();
    let visible = Arc::new(AtomicBool::new(true));

    {
        let view = LastRender::default();
        let session = session(&backend, Box::new(FileBookmarkStore::new(&path)), &view, &visible);
        session.start();
        sleep(Duration::from_millis(100)).await;
        session.stop();
    }

    let saved = FileBookmarkStore::new(&path).load().unwrap();
    assert_eq!(saved.get(&TicketId::new(5)), Some(&MessageId::new(2)));

    // Reply lands while the client is closed
    backend.admin_reply(TicketId::new(5), "Are you still there?");

    let view = LastRender::default();
    let session = session(&backend, Box::new(FileBookmarkStore::new(&path)), &view, &visible);
    session.start();
    sleep(Duration::from_millis(100)).await;
    assert_eq!(view.unread(5), 1);
    session.stop();
}

#[tokio::test(start_paused = true)]
async fn test_corrupt_bookmarks_fall_back_to_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("seen.json");
    std::fs::write(&path, "]]] definitely not json").unwrap();

    let backend = seeded_backend();
    let view = LastRender::default();
    let visible = Arc::new(AtomicBool::new(true));
    let session = session(&backend, Box::new(FileBookmarkStore::new(&path)), &view, &visible);

    session.start();
    sleep(Duration::from_millis(100)).await;
    assert_eq!(session.store().lock().unwrap().total_unread(), 0);
    assert_eq!(view.order(), vec![5, 3, 1]);

    // Rewritten with valid content
    assert!(FileBookmarkStore::new(&path).load().is_ok());
    session.stop();
}
