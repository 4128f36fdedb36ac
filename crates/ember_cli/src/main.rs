mod scenes;

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use ember_renderer::{render_parallel, CancelToken, RenderConfig};
use image::RgbaImage;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::scenes::SceneKind;

/// Render one of the built-in scenes to a PNG.
#[derive(Parser, Debug)]
#[command(name = "ember", version, about)]
struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value_t = SceneKind::CornellBox)]
    scene: SceneKind,

    /// Width of the rendered image
    #[arg(short = 'W', long, default_value_t = 400)]
    width: u32,

    /// Height of the rendered image (defaults to the scene's aspect ratio)
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Samples per pixel
    #[arg(short, long)]
    spp: Option<u32>,

    /// Maximum number of bounces
    #[arg(long)]
    max_depth: Option<u32>,

    /// Seed for scene generation and sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Output PNG path
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// JSON file holding render settings; flags above override it
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Image used by the earth scene
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Stop after this many seconds and save what has been rendered
    #[arg(long)]
    time_limit: Option<f32>,
}

/// Settings file (if any) with command-line overrides applied on top.
fn load_config(args: &Args) -> Result<RenderConfig> {
    let mut config = match &args.settings {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse settings {}", path.display()))?
        }
        None => RenderConfig::default(),
    };

    if let Some(spp) = args.spp {
        config.samples_per_pixel = spp;
    }
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let mut config = load_config(&args)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let scene = scenes::build(args.scene, args.texture.as_deref(), &mut rng)?;

    // A settings file decides the background; otherwise the scene does
    if args.settings.is_none() {
        config.background = scene.background;
    }

    let height = args
        .height
        .unwrap_or_else(|| ((args.width as f32 / scene.aspect_ratio) as u32).max(1));
    let mut camera = scene.camera.with_resolution(args.width, height);
    camera.initialize()?;

    let cancel = CancelToken::new();
    if let Some(seconds) = args.time_limit {
        let token = cancel.clone();
        let limit = Duration::from_secs_f32(seconds.max(0.0).min(1e9));
        thread::spawn(move || {
            thread::sleep(limit);
            token.cancel();
        });
    }

    let output = render_parallel(&camera, &scene.world, &config, &cancel)?;
    if output.cancelled {
        log::warn!(
            "Time limit reached: saving {}/{} buckets",
            output.buckets_done,
            output.buckets_total
        );
    }

    let (width, height) = (output.image.width, output.image.height);
    let png = RgbaImage::from_raw(width, height, output.image.into_raw())
        .context("Image buffer does not match its dimensions")?;
    png.save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!("Saved {}", args.output.display());
    Ok(())
}
