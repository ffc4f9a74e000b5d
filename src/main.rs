// What you SEE:
// • A dim checkerboard "map" with a few torches glowing through the darkness.
// • Arrow keys move the player (white dot). L toggles the lantern switch.
// • ESC quits.
// With --snapshot the same map renders headless and the overlay is saved as PNG.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing_subscriber::filter::EnvFilter;

use torchlight::draw::draw_marker;
use torchlight::present::composite_onto;
use torchlight::viewer::Viewer;
use torchlight::{Error, FrameBuffer, LightingConfig, LightingSystem, OverlaySurface, ScreenPos, SwitchBoard};

/// Demo map annotations; the last two are deliberately malformed and stay dark.
const DEMO_LIGHTS: &[(u32, f32, f32, &str)] = &[
    (1, 120.0, 140.0, "<torchlight radius:120 color:#ffaa66 flicker>"),
    (2, 520.0, 140.0, "<torchlight radius:100 color:#ff7733 flicker>"),
    (3, 320.0, 420.0, "Brazier. <TORCHLIGHT RADIUS:160 COLOR:#FFCC88 FLICKER>"),
    (4, 560.0, 440.0, "<torchlight radius:80 color:#66aaff>"),
    (5, 80.0, 440.0, "<torchlight radius:80>"),
    (6, 200.0, 300.0, "a plain chest"),
];

const PLAYER_SPEED: f32 = 3.0; // px per frame

#[derive(Parser)]
#[command(version, about = "Torch and lantern lighting demo")]
struct Cli {
    /// TOML lighting config; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 640)]
    width: usize,

    #[arg(long, default_value_t = 480)]
    height: usize,

    /// Seed for reproducible flicker
    #[arg(long)]
    seed: Option<u64>,

    /// Render headless and write the overlay to this PNG
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Frames to simulate before the snapshot
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Start with the lantern switch ON
    #[arg(long)]
    lantern: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("torchlight=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Error> {
    init_tracing();
    let cli = Cli::parse();

    /* --- Config + lighting system ---
       Visual: nothing yet; torches get their flicker state as they are "built". */
    let config = match &cli.config {
        Some(path) => LightingConfig::load(path)?,
        None => LightingConfig::default(),
    };
    let blend_mode = config.blend_mode;
    let lantern_switch = config.player.switch_id;
    let mut lighting = match cli.seed {
        Some(seed) => LightingSystem::with_seed(config, seed),
        None => LightingSystem::new(config),
    };
    for &(id, _, _, note) in DEMO_LIGHTS {
        lighting.on_light_source_created(id, note);
    }

    let mut switches = SwitchBoard::new();
    switches.set(lantern_switch, cli.lantern);

    let positions: Vec<(u32, ScreenPos)> =
        DEMO_LIGHTS.iter().map(|&(id, x, y, _)| (id, ScreenPos::new(x, y))).collect();
    let mut player = ScreenPos::new(cli.width as f32 / 2.0, cli.height as f32 / 2.0);
    let mut overlay = OverlaySurface::new(cli.width, cli.height);

    /* --- Headless snapshot --- */
    if let Some(path) = &cli.snapshot {
        for _ in 0..cli.frames.max(1) {
            lighting.render_frame(&mut overlay, player, &switches, &positions);
        }
        return overlay.save_png(path);
    }

    /* --- Window + reusable buffers ---
       Visual: `scene` is the map floor, `screen` is what you actually see. */
    let mut viewer = Viewer::new("Torchlight", cli.width, cli.height)?;
    let mut scene = FrameBuffer::new(cli.width, cli.height);
    scene.fill_checker(32, 0x00_40_48_40, 0x00_58_60_50);
    let mut screen = scene.clone();

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    while viewer.is_running() {
        /* 1) Viewport may have changed; keep every buffer matched to it. */
        let (w, h) = viewer.size();
        if (w, h) != (scene.width, scene.height) && w > 0 && h > 0 {
            scene = FrameBuffer::new(w, h);
            scene.fill_checker(32, 0x00_40_48_40, 0x00_58_60_50);
            overlay.resize(w, h);
        }

        /* 2) Inputs */
        if viewer.l_pressed_once() {
            let on = switches.toggle(lantern_switch);
            tracing::info!(on, "Lantern toggled");
        }
        let (dx, dy) = viewer.arrows();
        player.x = (player.x + dx * PLAYER_SPEED).clamp(0.0, scene.width as f32);
        player.y = (player.y + dy * PLAYER_SPEED).clamp(0.0, scene.height as f32);

        /* 3) Lighting frame step: flicker, then overlay */
        lighting.render_frame(&mut overlay, player, &switches, &positions);

        /* 4) Scene + player token + overlay -> screen */
        screen.clone_from(&scene);
        draw_marker(&mut screen, player, 5, 0x00_FF_FF_FF);
        composite_onto(&mut screen, &overlay, blend_mode)?;

        /* 5) Present */
        viewer.present(&screen)?;

        /* 6) FPS once per second (log + title) */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let fps = frames_this_second as f32 / now.duration_since(last_fps_time).as_secs_f32();
            tracing::info!("FPS: {:.1}", fps);
            viewer.set_title(&format!("Torchlight | FPS: {fps:.1}"));
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
