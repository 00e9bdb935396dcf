//! SPORTSBOOK — simulated live match feed and bet slip
//!
//! Entry point. Loads configuration, initialises structured logging, starts
//! the feed runner and the dashboard, and shuts the feed down cleanly on
//! Ctrl+C.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use sportsbook::config;
use sportsbook::dashboard;
use sportsbook::engine::Sportsbook;
use sportsbook::feed::{catalog, spawn_feed, FeedSimulator};
use sportsbook::slip::ledger::InMemoryLedger;
use sportsbook::slip::BetSlip;

const BANNER: &str = r#"
 ____                   _       _                 _
/ ___| _ __   ___  _ __| |_ ___| |__   ___   ___ | | __
\___ \| '_ \ / _ \| '__| __/ __| '_ \ / _ \ / _ \| |/ /
 ___) | |_) | (_) | |  | |_\__ \ |_) | (_) | (_) |   <
|____/| .__/ \___/|_|   \__|___/_.__/ \___/ \___/|_|\_\
      |_|
  Simulated live feed & bet slip
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    init_logging();

    let cfg = config::AppConfig::load_or_default("config.toml")?;

    println!("{BANNER}");
    info!(
        tick_interval_ms = cfg.feed.tick_interval_ms,
        suspend_probability = cfg.feed.suspend_probability,
        resume_probability = cfg.feed.resume_probability,
        odds_jitter = cfg.feed.odds_jitter,
        seed = ?cfg.feed.seed,
        cash_out_ratio = %cfg.slip.cash_out_ratio,
        "Sportsbook starting up"
    );

    // -- Initialise components -------------------------------------------

    let feed = FeedSimulator::new(
        catalog::sample_matches(),
        cfg.feed.simulator_config(),
        cfg.feed.rng(),
    )?;
    info!(
        matches = feed.matches().len(),
        live = feed.live_count(),
        "Feed loaded"
    );
    let feed = Arc::new(RwLock::new(feed));

    let book = Arc::new(Sportsbook::new(
        feed.clone(),
        BetSlip::with_cash_out_ratio(cfg.slip.cash_out_ratio),
        Arc::new(InMemoryLedger::new()),
    ));

    let runner = spawn_feed(feed, cfg.feed.tick_interval());

    if cfg.dashboard.enabled {
        dashboard::spawn_dashboard(book.clone(), cfg.dashboard.port).await?;
    } else {
        warn!("Dashboard disabled, feed runs headless");
    }

    // -- Wait for shutdown -----------------------------------------------

    info!("Running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received.");

    let ticks = runner.stop().await?;
    let slip = book.slip().await;
    info!(
        ticks,
        open_selections = slip.wagers.len(),
        settlements = book.settlements().await?.len(),
        "Sportsbook shut down cleanly."
    );

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sportsbook=info"));

    let json_logging = std::env::var("SPORTSBOOK_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
