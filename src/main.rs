use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use grain_showcase::carousel::CarouselHandle;
use grain_showcase::config::ShowcaseConfig;
use grain_showcase::deck::CardDeck;
use grain_showcase::ui::ShowcaseUI;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let (config, deck) = setup_config().await?;
    info!("Loaded deck with {} cards", deck.len());

    let carousel = CarouselHandle::spawn(deck.clone(), Some(config.carousel_settings()));

    info!("Starting showcase UI");
    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default()
        .with_inner_size([1280.0, 760.0])
        .with_min_inner_size([720.0, 480.0]);

    eframe::run_native(
        "Grain Showcase",
        native_options,
        Box::new(|cc| Ok(Box::new(ShowcaseUI::new(cc, deck, carousel)))),
    )
    .map_err(|e| eyre!("Showcase UI failed: {}", e))?;

    info!("Window closed, shutting down");
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}

async fn setup_config() -> Result<(ShowcaseConfig, CardDeck)> {
    match ShowcaseConfig::default_path() {
        Some(path) => ShowcaseConfig::ensure_default_config(&path).await?,
        None => warn!("No config directory available, skipping default config"),
    }

    let config = ShowcaseConfig::load().await?;
    let deck = config.load_deck().await?;
    Ok((config, deck))
}
