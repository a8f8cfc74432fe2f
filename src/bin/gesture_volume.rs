//! gesture-volume - webcam pinch-to-set-volume controller
//!
//! This binary:
//! 1. Loads configuration (JSON file, env overrides, CLI overrides)
//! 2. Opens the camera, landmark detector, key sink and display
//! 3. Runs the gesture loop until 'q', Ctrl-C, or a camera failure

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gesture_volume::{
    control, detect, display, ingest, GestureConfig, GestureLoop, LoopSettings,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON configuration file.
    #[arg(long, env = "GESTURE_VOLUME_CONFIG")]
    config: Option<PathBuf>,
    /// Camera device (e.g. /dev/video0, or stub://demo for a synthetic feed).
    #[arg(long)]
    device: Option<String>,
    /// Landmark detector backend: scripted, null, tract.
    #[arg(long)]
    backend: Option<String>,
    /// ONNX hand-landmark model (tract backend).
    #[arg(long)]
    model: Option<PathBuf>,
    /// Log volume keys instead of sending them to the OS.
    #[arg(long)]
    dry_run: bool,
    /// Do not open a window.
    #[arg(long)]
    headless: bool,
    /// Stop after this many frames (requires --headless).
    #[arg(long)]
    max_frames: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut cfg = GestureConfig::load_from(args.config.as_deref())?;
    if let Some(device) = args.device {
        cfg.camera.device = device;
    }
    if let Some(backend) = args.backend {
        cfg.detector.backend = backend;
    }
    if let Some(model) = args.model {
        cfg.detector.model_path = Some(model);
    }
    cfg.validate()?;

    log::info!(
        "gesture-volume {} starting: device={}, backend={}, initial volume {}%",
        env!("CARGO_PKG_VERSION"),
        cfg.camera.device,
        cfg.detector.backend,
        cfg.initial_volume
    );

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = interrupted.clone();
        ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst))?;
    }

    let source = ingest::open_source(&cfg.camera)?;
    let detector = detect::build_detector(&cfg.detector, cfg.camera.width, cfg.camera.height)?;
    let keys = control::build_keys(args.dry_run)?;
    let display = display::build_display(args.headless, args.max_frames)?;

    let summary = GestureLoop::new(source, detector, keys, display, LoopSettings::from(&cfg))
        .with_interrupt(interrupted)
        .run()?;

    log::info!("exiting: {:?}", summary.exit);
    Ok(())
}
