#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line driver that boots the Laser Arena viewer.
//!
//! The driver owns the snapshot feed: it loads an initial snapshot before
//! the window opens and then re-reads the file on a fixed delay from inside
//! the backend's frame loop. A tick that fails to read, decode, or parse is
//! logged and dropped; the viewer keeps showing the last good world.

mod feed;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use laser_arena_rendering::{Color, Presentation, RenderingBackend, WorldView};
use laser_arena_rendering_macroquad::{MacroquadBackend, ViewerConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::feed::SnapshotFeed;

const CLEAR_COLOR: Color = Color::from_rgb_u8(18, 20, 23);

/// Command-line options for the viewer.
#[derive(Debug, Parser)]
#[command(name = "laser-arena", about = "Viewer for grid-based tank combat snapshots")]
struct Options {
    /// Path to the snapshot JSON document to display.
    snapshot: PathBuf,

    /// Delay between snapshot re-reads, in milliseconds.
    #[arg(long, default_value_t = 100)]
    poll_interval: u64,

    /// Render the initial snapshot only, without re-reading the file.
    #[arg(long)]
    once: bool,

    /// Print frame-timing metrics once per second.
    #[arg(long)]
    show_fps: bool,

    /// Path to an optional viewer configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Title of the viewer window.
    #[arg(long, default_value = "Laser Arena")]
    title: String,
}

/// Entry point for the Laser Arena command-line viewer.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let options = Options::parse();

    let config = match &options.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    let mut feed = SnapshotFeed::new(
        options.snapshot.clone(),
        Duration::from_millis(options.poll_interval),
    );

    let initial = feed
        .load()
        .context("failed to load the initial snapshot")?;
    info!(
        players = initial.players().len(),
        lasers = initial.lasers().len(),
        "initial snapshot loaded"
    );

    let presentation = Presentation::new(
        options.title.clone(),
        CLEAR_COLOR,
        WorldView::from_world(&initial),
    );

    let backend = MacroquadBackend::new()
        .with_config(&config)
        .with_show_fps(options.show_fps || config.show_fps);

    let once = options.once;
    backend.run(presentation, move |frame_dt, view| {
        if once {
            return;
        }

        match feed.poll(frame_dt) {
            Ok(Some(world)) => *view = WorldView::from_world(&world),
            Ok(None) => {}
            Err(error) => warn!(error = %error, "snapshot refresh failed; keeping last world"),
        }
    })
}
