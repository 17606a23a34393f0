//! KickJS model viewer, headless.
//!
//! Builds the viewer scene through the resource manager, simulates a number
//! of frames while the camera orbits the model, then releases everything.

mod context;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Parser;
use tracing::{error, info};

use kick_core::Config;

use crate::context::AppContext;

#[derive(Parser, Debug)]
#[command(name = "kick-viewer", version, about = "Headless KickJS model viewer")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, default_value = "kick-viewer.toml")]
    config: PathBuf,

    /// Number of frames to simulate (overrides the config)
    #[arg(short, long)]
    frames: Option<u32>,

    /// Cycle the background once per this many frames
    #[arg(long)]
    background_every: Option<u32>,

    /// Show the built-in cube instead of the configured mesh
    #[arg(long)]
    cube: bool,

    /// Rebuild normals of the shown mesh if it has none
    #[arg(long)]
    recalculate_normals: bool,

    /// Models or textures to load
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    kick_core::init_logging();
    let cli = Cli::parse();
    info!("Starting KickJS viewer");

    let config = Config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let frames = cli.frames.unwrap_or(config.viewer.frames);
    let frame_length = Duration::from_millis(config.viewer.frame_ms);

    let mut app = AppContext::new(config).context("building the scene")?;

    if cli.cube {
        app.show_cube().context("switching to the cube")?;
    }
    if cli.recalculate_normals && !app.recalculate_normals() {
        info!("Mesh already has normals");
    }

    for file in &cli.files {
        if let Err(e) = app.load_file(file) {
            error!("Failed to load {}: {}", file.display(), e);
        }
    }

    for frame in 0..frames {
        app.frame(frame_length);

        if let Some(every) = cli.background_every
            && every > 0
            && (frame + 1).is_multiple_of(every)
        {
            app.cycle_background();
        }

        if (frame + 1).is_multiple_of(30) {
            let position = app.camera.position;
            info!(
                "Frame {}: camera at ({:.2}, {:.2}, {:.2}), {} pending tasks, texture {:?}",
                app.time.frame_count(),
                position.x,
                position.y,
                position.z,
                app.queue.pending(),
                app.texture().borrow().load_state()
            );
        }
    }

    app.queue.run_all();
    app.shutdown();
    info!("Viewer finished after {} frames", app.time.frame_count());

    Ok(())
}
