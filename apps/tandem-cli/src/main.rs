use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec3;
use tandem_app::{App, FrameScheduler, Stepped};
use tandem_config::{Vector, WorldSettings};
use tandem_physics::PhysicsBackend;
use tandem_render::DebugTextRenderer;
use tandem_scene::{BoxParams, RingParams};
use tandem_shapes::{Cuboid, CuboidDesc, Ring, RingDesc};
use tandem_tools::SceneInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tandem-cli", about = "Headless tools for tandem scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Drop a cube onto a ground plane and print its height per tick
    Drop {
        /// Number of ticks to run
        #[arg(short, long, default_value = "120")]
        ticks: u64,
        /// Starting height of the cube
        #[arg(long, default_value = "5.0")]
        height: f32,
        /// Settings file (.json, .yaml or .yml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Build a ring and print its tessellation
    Ring {
        /// Geometry as JSON; missing fields take the ring defaults
        #[arg(short, long)]
        geometry: Option<String>,
    },
}

/// Settings for the drop demo: the given file as loaded, or earth gravity
/// without a compositor.
fn drop_settings(config: Option<&Path>) -> anyhow::Result<WorldSettings> {
    match config {
        Some(path) => {
            WorldSettings::load(path).with_context(|| format!("loading {}", path.display()))
        }
        None => Ok(WorldSettings {
            gravity: Vector::new(0.0, -9.8, 0.0),
            wagner: false,
            ..WorldSettings::default()
        }),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("tandem-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("app: {}", tandem_app::crate_info());
            println!("physics: {}", tandem_physics::crate_info());
            println!("shapes: {}", tandem_shapes::crate_info());
            println!("render: {}", tandem_render::crate_info());
            println!("tools: {}", tandem_tools::crate_info());
            println!("timestep: {:.4}s", tandem_physics::FIXED_TIMESTEP);
        }
        Commands::Drop {
            ticks,
            height,
            config,
        } => {
            let settings = drop_settings(config.as_deref())?;
            println!("Drop demo: height={height}, ticks={ticks}, gravity={:?}", settings.gravity);

            let mut app: App<DebugTextRenderer> =
                App::with_rapier(settings, Some(DebugTextRenderer::new()));
            app.add(Cuboid::new(CuboidDesc {
                geometry: BoxParams {
                    width: 20.0,
                    height: 1.0,
                    depth: 20.0,
                },
                mass: 0.0,
                ..CuboidDesc::default()
            })?)?;
            let cube = app.add(Cuboid::new(CuboidDesc {
                position: Vec3::new(0.0, height, 0.0),
                ..CuboidDesc::default()
            })?)?;

            let mut scheduler = Stepped::new(ticks, Duration::from_secs_f64(1.0 / 60.0));
            let mut heights = Vec::with_capacity(ticks as usize);
            while let Some(timestamp) = scheduler.next_frame() {
                let report = app.tick(timestamp)?;
                if let Some(node) = app.scene().get(cube) {
                    heights.push((report.tick, node.transform.position.y));
                }
            }
            for (tick, y) in heights.iter().step_by(10) {
                println!("tick {tick:>4}: y={y:.3}");
            }

            let physics = app.physics().map(|p| p as &dyn PhysicsBackend);
            println!("{}", SceneInspector::summary(app.scene(), physics));
            if let Some(info) = SceneInspector::inspect_node(app.scene(), cube) {
                println!("{info}");
            }
        }
        Commands::Ring { geometry } => {
            let geometry: RingParams = match geometry {
                Some(json) => serde_json::from_str(&json).context("parsing ring geometry")?,
                None => RingParams::default(),
            };
            let ring = Ring::new(RingDesc {
                geometry,
                ..RingDesc::default()
            })?;
            let mesh = &ring.native().context("ring was not built")?.mesh;
            let (min, max) = mesh.bounds().unwrap_or_default();
            println!("Ring: {geometry:?}");
            println!(
                "vertices={} triangles={} bounds=({:.2}, {:.2}, {:.2})..({:.2}, {:.2}, {:.2})",
                mesh.vertex_count(),
                mesh.triangle_count(),
                min.x,
                min.y,
                min.z,
                max.x,
                max.y,
                max.z
            );
        }
    }

    Ok(())
}
