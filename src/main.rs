use std::sync::Arc;

use anyhow::{anyhow, Context};
use eframe::egui;
use idol_voting::config::Config;
use idol_voting::gui::VotingApp;
use idol_voting::storage::{FileTokenStore, TokenStore};
use log::info;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::load()?;
    info!("Using voting API at {}", config.api_url);

    let client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .context("Failed to build HTTP client")?;
    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&config.token_file));
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    let builder = egui::ViewportBuilder::default()
        .with_title("Idol Voting")
        .with_inner_size(egui::vec2(960.0, 720.0));

    let options = eframe::NativeOptions {
        viewport: builder,
        ..Default::default()
    };

    eframe::run_native(
        "Idol Voting",
        options,
        Box::new(move |cc| Ok(Box::new(VotingApp::new(cc, &config, client, store, runtime)))),
    )
    .map_err(|e| anyhow!("UI exited with error: {e}"))
}
