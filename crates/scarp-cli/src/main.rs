//! Scarp CLI - Command-line entry point for the editor

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scarp_grid::MapSource;
use scarp_viewer::ViewerConfig;

#[derive(Parser)]
#[command(name = "scarp")]
#[command(about = "Interactive oblique-projection height-grid editor", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the editor window
    View {
        /// TOML map file (defaults to the built-in demo map)
        #[arg(long)]
        map: Option<PathBuf>,

        /// Grayscale PNG heightmap (ignored when --map is given)
        #[arg(long)]
        image: Option<PathBuf>,

        /// Height a white heightmap pixel maps to
        #[arg(long, default_value_t = 9.0)]
        image_max_height: f32,

        /// Tile width in pixels
        #[arg(long, default_value_t = 64.0)]
        tile_width: f32,

        /// Tile height in pixels
        #[arg(long, default_value_t = 64.0)]
        tile_height: f32,

        /// Screen pixels per unit of corner height
        #[arg(long, default_value_t = 6.0)]
        height_scale: f32,

        /// X projection angle in degrees
        #[arg(long, default_value_t = 45.0)]
        angle_x: f32,

        /// Y projection angle in degrees
        #[arg(long, default_value_t = 35.0)]
        angle_y: f32,

        /// Window width in pixels
        #[arg(long, default_value_t = 1200)]
        width: u32,

        /// Window height in pixels
        #[arg(long, default_value_t = 800)]
        height: u32,
    },

    /// Check that a map file parses and report its dimensions
    Validate {
        /// TOML map file
        map: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::View {
            map,
            image,
            image_max_height,
            tile_width,
            tile_height,
            height_scale,
            angle_x,
            angle_y,
            width,
            height,
        } => scarp_viewer::run(ViewerConfig {
            map_path: map,
            image_path: image,
            image_max_height,
            tile_size_x: tile_width,
            tile_size_y: tile_height,
            height_scale,
            angle_x,
            angle_y,
            window_width: width,
            window_height: height,
        }),

        Commands::Validate { map } => {
            let source = MapSource::from_toml_file(&map)
                .with_context(|| format!("invalid map '{}'", map.display()))?;
            println!(
                "{}: {}x{} corners, {}x{} tiles",
                map.display(),
                source.width(),
                source.height(),
                source.width().saturating_sub(1),
                source.height().saturating_sub(1),
            );
            Ok(())
        }
    }
}
