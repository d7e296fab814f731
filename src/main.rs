//! Orbit Scene - animated skill orbits
//!
//! CLI commands:
//! - gui: Launch the native viewer
//! - list: List scenes and their labeled items
//! - frames: Simulate a scene headless and dump per-frame transforms
//! - rings: Dump a scene's static ring polylines

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use orbit_scene::clock::FixedStepClock;
use orbit_scene::config::{Config, Settings, DEFAULT_FRAME_STEP};
use orbit_scene::scene::SceneHandle;
use orbit_scene::sink::FrameRecorder;
use orbit_scene::{gui, log_error, logging};

#[derive(Parser)]
#[command(name = "orbit_scene")]
#[command(about = "Animated 3D skill orbits around a central anchor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to scenes.yaml config
    #[arg(short, long, default_value = "scenes.yaml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch native GUI viewer
    Gui,

    /// List scenes and their items
    List {
        /// Only this scene
        #[arg(short, long)]
        scene: Option<String>,
    },

    /// Simulate a scene and write its frames as JSON
    Frames {
        /// Scene ID
        #[arg(short, long)]
        scene: String,

        /// Number of ticks to simulate
        #[arg(short, long, default_value = "120")]
        ticks: u64,

        /// Seconds per tick (defaults to FRAME_STEP or 1/60)
        #[arg(long)]
        step: Option<f64>,

        /// Keep every Nth frame
        #[arg(long, default_value = "1")]
        every: u64,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a scene's ring polylines as JSON
    Rings {
        /// Scene ID
        #[arg(short, long)]
        scene: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let settings = Settings::load();

    // Initialize logging first
    logging::init_logging(&settings.log_dir)?;
    tracing::info!("Orbit Scene starting up");

    let cli = Cli::parse();
    tracing::debug!("CLI args parsed: config={:?}", cli.config);

    let config = if cli.config.exists() {
        tracing::info!("Loading config from {:?}", cli.config);
        Config::load(&cli.config)?
    } else {
        tracing::warn!("Config file not found: {:?}, using built-in scenes", cli.config);
        Config::builtin()
    };
    let config = config.with_settings(&settings);
    tracing::info!(
        "Config loaded: {} scenes, rotation {:?}",
        config.scenes.len(),
        config.rotation.mode
    );

    let result = match cli.command {
        Commands::Gui => {
            tracing::info!("Launching native GUI viewer");
            gui::run_viewer(config)
        }
        Commands::List { scene } => list_scenes(&config, scene.as_deref()),
        Commands::Frames {
            scene,
            ticks,
            step,
            every,
            output,
        } => dump_frames(
            &config,
            &scene,
            ticks,
            step.unwrap_or(settings.frame_step),
            every,
            output.as_deref(),
        ),
        Commands::Rings { scene, output } => dump_rings(&config, &scene, output.as_deref()),
    };

    if let Err(ref e) = result {
        log_error!(e);
    }
    result
}

/// List scenes, optionally a single one
fn list_scenes(config: &Config, only: Option<&str>) -> anyhow::Result<()> {
    let scenes = match only {
        Some(id) => vec![config.require_scene(id)?],
        None => config.scenes.iter().collect(),
    };

    println!("Available scenes ({}):", scenes.len());
    println!();

    for scene in scenes {
        println!(
            "## {} [{}] ({:?}, radius {})",
            scene.name, scene.id, scene.kind, scene.radius
        );
        for (index, item) in scene.items.iter().enumerate() {
            println!("  {:>2}. {} {}", index, item.color, item.label);
        }
    }
    Ok(())
}

/// Run a scene on a fixed-step clock and dump the recorded frames
fn dump_frames(
    config: &Config,
    id: &str,
    ticks: u64,
    step: f64,
    every: u64,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let spec = config.require_scene(id)?;
    let clock = FixedStepClock::new(step)?;
    let mut scene = SceneHandle::create(spec, config.rotation, Box::new(clock))?;

    let mut recorder = FrameRecorder::new(every);
    for _ in 0..ticks {
        scene.render(&mut recorder)?;
    }
    tracing::info!(
        "Simulated {} ticks of '{}', kept {} frames",
        ticks,
        id,
        recorder.frames().len()
    );

    let data = serde_json::json!({
        "generated": chrono::Local::now().to_rfc3339(),
        "scene": scene.id(),
        "name": scene.name(),
        "kind": scene.kind(),
        "rotation_mode": scene.rotation_mode(),
        "step": step,
        "items": scene.items(),
        "anchor": scene.anchor(),
        "rings": scene.rings().len(),
        "frames": recorder.frames(),
    });
    scene.destroy();

    write_json(&data, output)
}

/// Dump the static ring polylines of a scene
fn dump_rings(config: &Config, id: &str, output: Option<&Path>) -> anyhow::Result<()> {
    let spec = config.require_scene(id)?;
    let clock = FixedStepClock::new(DEFAULT_FRAME_STEP)?;
    let scene = SceneHandle::create(spec, config.rotation, Box::new(clock))?;

    if scene.rings().is_empty() {
        tracing::warn!("Scene '{}' has no rings", id);
    }

    let data = serde_json::json!({
        "scene": scene.id(),
        "rings": scene.rings(),
    });
    scene.destroy();

    write_json(&data, output)
}

fn write_json(data: &serde_json::Value, output: Option<&Path>) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(data)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, text)?;
            println!("Wrote {:?}", path);
        }
        None => println!("{}", text),
    }
    Ok(())
}
