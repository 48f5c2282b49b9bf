//! Easel demos - a catalog of small GPU scenes

mod scenes;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use easel_render::{Context, OffscreenTarget, WindowConfig, run_scene};

#[derive(Parser)]
#[command(name = "easel")]
#[command(about = "GPU pipeline fundamentals, one small scene at a time", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every scene with a one-line summary
    List,

    /// Open a scene in a window
    Run {
        /// Scene name (see `list`)
        name: String,

        /// Window width
        #[arg(long, default_value = "800")]
        width: u32,

        /// Window height
        #[arg(long, default_value = "800")]
        height: u32,
    },

    /// Render a scene to an image file (headless)
    Render {
        /// Scene name (see `list`)
        name: String,

        /// Output image file (.png)
        #[arg(short, long, default_value = "scene.png")]
        output: PathBuf,

        /// Image width
        #[arg(long, default_value = "800")]
        width: u32,

        /// Image height
        #[arg(long, default_value = "800")]
        height: u32,

        /// Scene time in seconds to render at
        #[arg(long, default_value = "0.0")]
        time: f32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            run_list();
        }
        Commands::Run {
            name,
            width,
            height,
        } => {
            run_windowed(&name, width, height)?;
        }
        Commands::Render {
            name,
            output,
            width,
            height,
            time,
        } => {
            run_headless(&name, &output, width, height, time)?;
        }
    }

    Ok(())
}

fn run_list() {
    println!("Scenes:");
    for entry in scenes::SCENES {
        println!("  {:<14} {}", entry.name, entry.summary);
    }
    println!("\nRun one with `easel run <name>`.");
}

fn find_scene(name: &str) -> Result<&'static scenes::SceneEntry> {
    scenes::find(name)
        .ok_or_else(|| anyhow::anyhow!("no scene called `{name}`, try `easel list`"))
}

fn run_windowed(name: &str, width: u32, height: u32) -> Result<()> {
    let entry = find_scene(name)?;

    let config = WindowConfig {
        title: format!("Easel - {}", entry.name),
        width,
        height,
    };

    println!("Opening `{}`: {}", entry.name, entry.summary);
    if !entry.controls.is_empty() {
        println!("Controls: {}", entry.controls);
    }

    run_scene(config, Box::new(entry.build))?;

    Ok(())
}

fn run_headless(name: &str, output: &PathBuf, width: u32, height: u32, time: f32) -> Result<()> {
    let entry = find_scene(name)?;

    println!(
        "Rendering `{}` to {} ({}x{})...",
        entry.name,
        output.display(),
        width,
        height
    );

    let mut ctx = Context::headless()?;
    let mut scene = (entry.build)(&mut ctx)?;

    let target = OffscreenTarget::new(&ctx, width, height, true);
    let mut frame = target.begin_frame(&ctx, scene.clear());
    scene.frame(&mut ctx, &mut frame, time)?;
    drop(frame);

    let img = target.read_rgba(&ctx)?;
    img.save(output)?;
    println!("Saved to: {}", output.display());

    Ok(())
}
