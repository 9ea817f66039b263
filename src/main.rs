//! audiovis - spectrum analyzer and visual effects in the terminal

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use audiovis::app::App;
use audiovis::audio::{list_input_devices, open_source};
use audiovis::cli::{catalog, Args};
use audiovis::params::Config;
use audiovis::render::TerminalSurface;

fn main() -> Result<()> {
    let args = Args::parse();

    if args.list {
        let devices = list_input_devices().unwrap_or_else(|e| {
            eprintln!("Warning: {}", e);
            Vec::new()
        });
        print!("{}", catalog(&devices));
        return Ok(());
    }

    let _log_guard = audiovis::logging::init(args.log_file.as_deref(), &args.log_level)?;

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_default(),
    };
    args.apply_overrides(&mut config)
        .context("Invalid command-line option")?;

    if args.print_config {
        print!("{}", config.to_toml());
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let opened = open_source(args.source_request(), &config.audio, config.visual.fps, seed)
        .context("Failed to open audio source")?;

    let mut app = App::new(config, opened.source, opened.fallback, seed);
    let result = run(&mut app);
    app.close();
    info!("exiting");
    result
}

/// Frame loop: draw, then wait for input until the next frame is due
fn run(app: &mut App) -> Result<()> {
    let mut surface = TerminalSurface::new().context("Failed to initialize terminal")?;
    let mut next_frame = Instant::now();

    while app.is_running() {
        let now = Instant::now();
        if now >= next_frame {
            if app.render_frame(&mut surface) {
                surface.show().context("Failed to draw frame")?;
            }
            next_frame += app.frame_interval();
            if next_frame < now {
                debug!("frame overran its interval");
                next_frame = now + app.frame_interval();
            }
        }

        let timeout = next_frame.saturating_duration_since(Instant::now());
        if let Some(event) = surface.poll_event(timeout)? {
            app.handle_event(&event);
        }
    }
    Ok(())
}
