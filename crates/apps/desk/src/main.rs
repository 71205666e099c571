//! Desk - A terminal client for the shop's support-ticket chat
//!
//! This is the main entry point for the Desk application.

use log::{error, warn};
use support::ClientConfig;

mod app;
mod input;
mod views;

use app::DeskApp;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    let client = match ClientConfig::load() {
        Ok(client) => client,
        Err(e) => {
            warn!("Client settings not found: {:#}", e);
            if let Some(path) = ClientConfig::default_config_path() {
                warn!(
                    "To configure the client, either:\n\
                     1. Place {{\"api_url\": ..., \"user\": ...}} at: {}\n\
                     2. Or set environment variables: SHOPDESK_API_URL and SHOPDESK_USER",
                    path.display()
                );
            }
            return Err(e);
        }
    };

    let app = DeskApp::new(&client)?;
    app.run().await
}
