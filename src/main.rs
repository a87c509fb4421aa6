//! Face-mouse application: head movement drives the cursor, blinks click.

use anyhow::Result;
use clap::Parser;
use face_mouse::{
    app::{FaceMouseApp, VideoSource},
    config::Config,
};
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use
    #[arg(long, default_value = "0")]
    cam: i32,

    /// Video file to process instead of a camera
    #[arg(short, long)]
    video: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Override the blink threshold
    #[arg(short = 't', long)]
    threshold: Option<f64>,

    /// Override the cursor gain factor
    #[arg(short, long)]
    gain: Option<f64>,

    /// Override the gesture cooldown in seconds
    #[arg(long)]
    cooldown: Option<f64>,

    /// Detect and classify without moving the pointer
    #[arg(long)]
    no_cursor: bool,

    /// Disable the camera preview window
    #[arg(long)]
    no_preview: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Face Mouse");

    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {config_path}");
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {e}. Using defaults.");
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    if let Some(threshold) = args.threshold {
        config.gesture.blink_threshold = threshold;
    }
    if let Some(gain) = args.gain {
        config.cursor.gain = gain;
    }
    if let Some(cooldown) = args.cooldown {
        config.gesture.cooldown_secs = cooldown;
    }
    if args.no_cursor {
        config.cursor.enabled = false;
    }
    if args.no_preview {
        config.display.preview = false;
    }

    let source = if let Some(video_path) = args.video {
        VideoSource::File(video_path)
    } else {
        VideoSource::Camera(args.cam)
    };

    let mut app = FaceMouseApp::new(config, source)?;
    app.calibrate()?;
    app.run()?;

    Ok(())
}
