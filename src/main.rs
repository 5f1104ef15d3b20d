//! Islet - Dynamic Island overlay core
//!
//! Runs the headless overlay core: the focus timer engine, the media
//! session adapter and the overlay state machine, wired over an
//! in-process event bus with best-effort persistence.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::{info, warn};

use islet::cli::{Cli, Commands, DemoArgs, RunArgs};
use islet::media::{self, MediaSessionAdapter, NullMediaSource, ScriptedMediaSource};
use islet::overlay::{self, Island, OverlayApp};
use islet::sound::{try_create_chime, ChimePlayer};
use islet::store::{JsonFileStore, Store};
use islet::timer::{self, TimerEngine};
use islet::types::IsletConfig;
use islet::IsletBus;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse();

    // Execute command
    if let Err(e) = execute(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    // Set verbose logging if requested
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => run_session(args).await,
        Some(Commands::Demo(args)) => run_demo(args).await,
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
            Ok(())
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

/// Runs the overlay core until interrupted.
async fn run_session(args: RunArgs) -> Result<()> {
    let mut config = IsletConfig::default()
        .with_default_minutes(args.minutes)
        .with_poll_interval_ms(args.poll_interval);
    config.sound_enabled = !args.no_sound;
    config.has_api_key = args.api_key;
    config.validate().map_err(anyhow::Error::msg)?;

    let store = open_store(args.state_file);
    let bus = IsletBus::new();

    let chime = try_create_chime(!config.sound_enabled).map(|c| c as Arc<dyn ChimePlayer>);
    let engine = Arc::new(Mutex::new(TimerEngine::new(
        &config,
        bus.clone(),
        store.clone(),
        chime,
    )));
    let _timer_sub = timer::attach_commands(&engine, &bus);

    // No external playback surface is bridged in standalone mode; the
    // adapter stays in the degraded state until one is.
    let adapter = Arc::new(Mutex::new(MediaSessionAdapter::new(
        Arc::new(NullMediaSource),
        bus.clone(),
    )));
    let _media_sub = media::attach_commands(&adapter, &bus);

    let island = Arc::new(Island::new(bus, store, config.has_api_key));

    // Seed late-mounted listeners with the restored timer state
    engine.lock().unwrap().announce();

    let ticker = tokio::spawn(timer::run_ticker(Arc::clone(&engine)));
    let poller = tokio::spawn(media::run_poller(
        Arc::clone(&adapter),
        config.poll_interval_ms,
    ));
    let overlay_driver = tokio::spawn(overlay::run_overlay(Arc::clone(&island)));

    info!("overlay core running, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    info!("shutting down");

    ticker.abort();
    poller.abort();
    overlay_driver.abort();
    Ok(())
}

/// Runs a short scripted session against a simulated player and exits.
async fn run_demo(args: DemoArgs) -> Result<()> {
    let config = IsletConfig::default();
    let store = Store::in_memory();
    let bus = IsletBus::new();

    let chime = try_create_chime(args.no_sound).map(|c| c as Arc<dyn ChimePlayer>);
    let engine = Arc::new(Mutex::new(TimerEngine::new(
        &config,
        bus.clone(),
        store.clone(),
        chime,
    )));
    let _timer_sub = timer::attach_commands(&engine, &bus);

    let source = Arc::new(ScriptedMediaSource::playing(
        "Aurora",
        "Nightdrive",
        240.0,
    ));
    let adapter = Arc::new(Mutex::new(MediaSessionAdapter::new(source, bus.clone())));
    let _media_sub = media::attach_commands(&adapter, &bus);

    let island = Arc::new(Island::new(bus.clone(), store, config.has_api_key));
    engine.lock().unwrap().announce();

    let _completed_sub = bus.timer_completed.subscribe(|completed| {
        println!(
            "timer completed after {}",
            format_clock(completed.total_seconds)
        );
    });

    let ticker = tokio::spawn(timer::run_ticker(Arc::clone(&engine)));
    let poller = tokio::spawn(media::run_poller(Arc::clone(&adapter), 250));
    let overlay_driver = tokio::spawn(overlay::run_overlay(Arc::clone(&island)));

    // Scripted walkthrough: hover in, browse to the music panel, start
    // the focus timer, then let the loops run for the requested window.
    island.pointer_enter();
    island.open(OverlayApp::Music);
    island.toggle_timer();

    tokio::time::sleep(tokio::time::Duration::from_secs(args.seconds)).await;

    let timer_snapshot = engine.lock().unwrap().snapshot();
    let media_snapshot = adapter.lock().unwrap().snapshot();
    println!(
        "overlay: {} ({}x{})",
        island.app().as_str(),
        island.dimensions().width,
        island.dimensions().height
    );
    println!(
        "timer:   {} of {} ({})",
        format_clock(timer_snapshot.time_left_seconds),
        format_clock(timer_snapshot.total_seconds),
        if timer_snapshot.is_running {
            "running"
        } else {
            "stopped"
        }
    );
    println!(
        "media:   {} - {} at {:.0}s ({})",
        media_snapshot.artist,
        media_snapshot.title,
        media_snapshot.current_time,
        if media_snapshot.is_playing {
            "playing"
        } else {
            "paused"
        }
    );

    ticker.abort();
    poller.abort();
    overlay_driver.abort();
    Ok(())
}

/// Opens the state store, falling back to memory when no path resolves.
fn open_store(path: Option<PathBuf>) -> Store {
    match path.or_else(JsonFileStore::default_path) {
        Some(path) => Store::new(Arc::new(JsonFileStore::new(path))),
        None => {
            warn!("no home directory found, state will not persist");
            Store::in_memory()
        }
    }
}

/// Formats whole seconds as mm:ss.
fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
