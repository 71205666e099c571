//! Root application for the desk client

use anyhow::Result;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use support::{
    BookmarkStore, ClientConfig, FileBookmarkStore, InMemoryBookmarkStore, ShopClient,
    SupportApi, SupportSession,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::input::{Command, format_help};
use crate::views::TerminalView;

/// Whether the prompt loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Root application state
pub struct DeskApp {
    session: SupportSession,
    /// Stand-in for window visibility; polling only runs while set
    visible: Arc<AtomicBool>,
    user: String,
}

impl DeskApp {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let api: Arc<dyn SupportApi> = Arc::new(ShopClient::from_config(config));

        let bookmarks: Box<dyn BookmarkStore> = match FileBookmarkStore::for_user(&config.user) {
            Ok(store) => {
                debug!("Bookmarks at {}", store.path().display());
                Box::new(store)
            }
            Err(e) => {
                warn!("Failed to open bookmark file: {}, using in-memory", e);
                Box::new(InMemoryBookmarkStore::new())
            }
        };

        let visible = Arc::new(AtomicBool::new(true));
        let gate = {
            let visible = Arc::clone(&visible);
            move || visible.load(Ordering::SeqCst)
        };

        let session = SupportSession::new(
            config.poll,
            api,
            bookmarks,
            Box::new(TerminalView::new(std::io::stdout())),
            gate,
        )?;

        Ok(Self {
            session,
            visible,
            user: config.user.clone(),
        })
    }

    /// Poll in the background and serve commands from stdin until `quit`
    /// or end of input
    pub async fn run(&self) -> Result<()> {
        info!("Desk started for {}", self.user);
        println!("Signed in as {}. Type `help` for commands.", self.user);
        self.session.start();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            match Command::parse(&line) {
                Ok(Some(command)) => {
                    if self.handle(command).await == Flow::Quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => eprintln!("{}", e),
            }
        }

        self.session.stop();
        info!("Desk stopped");
        Ok(())
    }

    async fn handle(&self, command: Command) -> Flow {
        debug!("Command: {:?}", command);
        let result = match command {
            Command::Buy(product) => self
                .session
                .actions()
                .buy(&product)
                .await
                .map(|id| println!("Bought {}, ticket #{} opened", product, id)),
            Command::Open(id) => self.session.actions().select(id).map_err(anyhow::Error::from),
            Command::Send(text) => self.session.actions().send_message(&text).await,
            Command::Close => self
                .session
                .actions()
                .close_selected()
                .await
                .map(|id| println!("Ticket #{} closed", id)),
            Command::Hide => {
                self.visible.store(false, Ordering::SeqCst);
                info!("View hidden, polling paused");
                Ok(())
            }
            Command::Show => {
                self.visible.store(true, Ordering::SeqCst);
                info!("View visible, polling resumed");
                self.session.refresh();
                Ok(())
            }
            Command::Refresh => {
                self.session.refresh();
                Ok(())
            }
            Command::Help => {
                print!("{}", format_help());
                Ok(())
            }
            Command::Quit => return Flow::Quit,
        };

        if let Err(e) = result {
            error!("Command failed: {:#}", e);
            eprintln!("Error: {:#}", e);
        }
        Flow::Continue
    }
}
