use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use ghostmaze_geometry::{DrawKey, build_with_scale};
use ghostmaze_level::{DemoRun, FixedStep, FrameSnapshot, LevelSet, demo_level_set, load_level_set};
use ghostmaze_render::{DrawLog, MazeRenderer, MeshStore, RenderConfig};

#[derive(Parser)]
#[command(name = "ghostmaze-cli", about = "CLI tool for maze level sets and the render core")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Inputs {
    /// Level set file (.json, .yaml); the built-in demo levels otherwise
    #[arg(short, long)]
    levels: Option<PathBuf>,

    /// Render config file (.json, .yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Inputs {
    fn load(&self) -> Result<(LevelSet, RenderConfig)> {
        let levels = match &self.levels {
            Some(path) => load_level_set(path)
                .with_context(|| format!("loading levels from {}", path.display()))?,
            None => demo_level_set(),
        };
        let config = match &self.config {
            Some(path) => load_config(path)?,
            None => RenderConfig::default(),
        };
        Ok((levels, config))
    }
}

fn load_config(path: &Path) -> Result<RenderConfig> {
    RenderConfig::load(path).with_context(|| format!("loading config from {}", path.display()))
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Summarize every level of a level set
    Inspect {
        #[command(flatten)]
        inputs: Inputs,
    },
    /// Build the shared mesh and print its statistics and draw ranges
    Build {
        #[command(flatten)]
        inputs: Inputs,
    },
    /// Run the scripted demo and print the draw calls of one frame
    Frame {
        #[command(flatten)]
        inputs: Inputs,
        /// Seconds of demo time to simulate before the frame
        #[arg(short, long, default_value = "1.0")]
        seconds: f32,
        /// Display frame rate used to step the demo
        #[arg(long, default_value = "60")]
        fps: f32,
        /// Pointer motion applied to the camera before the frame
        #[arg(long, num_args = 2, value_names = ["DX", "DY"], allow_negative_numbers = true)]
        look: Option<Vec<f32>>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("ghostmaze-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", ghostmaze_common::crate_info());
            println!("level: {}", ghostmaze_level::crate_info());
            println!("geometry: {}", ghostmaze_geometry::crate_info());
            println!("input: {}", ghostmaze_input::crate_info());
            println!("render: {}", ghostmaze_render::crate_info());
        }
        Commands::Inspect { inputs } => {
            let (levels, _) = inputs.load()?;
            println!("Level set: {} levels", levels.len());
            for level in levels.iter() {
                let open = level.doors.iter().filter(|d| d.open).count();
                println!(
                    "  {}: {} wall rings ({} segments), {} floors, {} doors ({open} open), {} switches",
                    level.id,
                    level.walls.len(),
                    level.segment_count(),
                    level.floors.len(),
                    level.doors.len(),
                    level.switches.len(),
                );
                println!(
                    "    start=({:.1}, {:.1}) end=({:.1}, {:.1})",
                    level.start.x, level.start.y, level.end.x, level.end.y
                );
                for switch in &level.switches {
                    println!(
                        "    {} at ({:.1}, {:.1}){}",
                        switch.uid,
                        switch.position.x,
                        switch.position.y,
                        if switch.pressed { " pressed" } else { "" }
                    );
                }
            }
        }
        Commands::Build { inputs } => {
            let (levels, config) = inputs.load()?;
            let output = build_with_scale(levels.iter(), config.world_scale);
            let mesh = &output.mesh;
            tracing::debug!(
                levels = levels.len(),
                vertices = mesh.vertex_count(),
                ranges = output.ranges.len(),
                "mesh built"
            );
            println!(
                "Mesh: {} vertices, {} indices, {} triangles",
                mesh.vertex_count(),
                mesh.index_count(),
                mesh.triangle_count()
            );
            println!("Draw ranges: {}", output.ranges.len());
            for (key, range) in output.ranges.iter() {
                let name = match key {
                    DrawKey::LevelStatic(id) => format!("{id} static"),
                    DrawKey::Door { level, index } => format!("{level} door {index}"),
                    DrawKey::Sprite(kind) => format!("sprite {kind:?}"),
                };
                println!(
                    "  {name:<24} {:>7}..{:<7} ({} tris)",
                    range.start,
                    range.end(),
                    range.count / 3
                );
            }
        }
        Commands::Frame {
            inputs,
            seconds,
            fps,
            look,
        } => {
            let (levels, config) = inputs.load()?;
            if fps <= 0.0 {
                return Err(anyhow!("--fps must be positive"));
            }

            let mut log = DrawLog::new();
            let output = build_with_scale(levels.iter(), config.world_scale);
            let store = MeshStore::upload(&mut log, output);
            let mut renderer = MazeRenderer::new(config.clone(), store, 16.0 / 9.0);
            if let Some([dx, dy]) = look.as_deref() {
                renderer.apply_pointer_delta(*dx, *dy);
            }

            let mut run = DemoRun::new(levels).ok_or_else(|| anyhow!("level set is empty"))?;
            let mut clock = FixedStep::new(config.ticks_per_second);
            let dt = 1.0 / fps;
            let frames = (seconds * fps).round().max(1.0) as u32;
            let mut frame_time = 0.0;
            for _ in 0..frames {
                for _ in 0..clock.advance(dt) {
                    run.tick();
                }
                frame_time += dt;
                log.clear_calls();
                let snapshot = FrameSnapshot {
                    level: run.level(),
                    player: run.player(),
                    ghosts: run.ghosts(),
                    frame_time,
                    time_delta: dt,
                    accumulator: clock.accumulator(),
                };
                renderer.render_frame(&mut log, &snapshot);
            }

            tracing::debug!(
                frames,
                ticks = run.ticks(),
                draws = log.calls().len(),
                headings = renderer.headings().len(),
                "demo frames rendered"
            );
            let camera = renderer.camera();
            println!(
                "{} after {} ticks, t={frame_time:.2}s, camera eye=({:.2}, {:.2}, {:.2}) yaw={:.2} pitch={:.2}",
                run.level().id,
                run.ticks(),
                camera.eye.x,
                camera.eye.y,
                camera.eye.z,
                camera.yaw,
                camera.pitch
            );
            print!("{log}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_accepts_negative_look() {
        let cli = Cli::try_parse_from([
            "ghostmaze-cli",
            "-v",
            "frame",
            "--seconds",
            "2",
            "--look",
            "-40",
            "12.5",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Frame { seconds, look, inputs, .. } => {
                assert_eq!(seconds, 2.0);
                assert_eq!(look, Some(vec![-40.0, 12.5]));
                assert!(inputs.levels.is_none());
            }
            _ => panic!("expected the frame command"),
        }
    }

    #[test]
    fn build_defaults_to_demo_levels() {
        let cli = Cli::try_parse_from(["ghostmaze-cli", "build"]).unwrap();
        let Commands::Build { inputs } = cli.command else {
            panic!("expected the build command");
        };
        let (levels, config) = inputs.load().unwrap();
        assert!(!levels.is_empty());
        assert_eq!(config, RenderConfig::default());
    }
}
