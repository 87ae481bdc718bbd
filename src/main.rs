// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use photobooth::{Arrangement, Destination, FilterMode};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "photobooth")]
#[command(about = "Assemble photo strips and share them")]
#[command(version, long_version = env!("GIT_VERSION"))]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a strip from captured frames
    Assemble {
        /// Frame image files, in panel order
        #[arg(short, long = "frame", required = true)]
        frames: Vec<PathBuf>,

        /// Filter mode (none, bw, bw-mixed, sepia, sepia-mixed, line-art)
        #[arg(long)]
        filter: Option<FilterMode>,

        /// Arrangement (vertical, horizontal, box)
        #[arg(short, long)]
        arrangement: Option<Arrangement>,

        /// Rotation in degrees clockwise
        #[arg(short, long, allow_negative_numbers = true)]
        rotation: Option<i32>,

        /// Mirror frames horizontally
        #[arg(long)]
        reflect: bool,

        /// Output directory (default: ~/Pictures/photobooth)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Filename prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Thumbnail bounds as WIDTHxHEIGHT
        #[arg(long, value_parser = cli::parse_bounds)]
        thumb: Option<(u32, u32)>,

        /// Share the strip to these destinations once persisted
        #[arg(short, long = "share")]
        share: Vec<Destination>,

        /// Outbox directory used by --share
        #[arg(long, requires = "share")]
        outbox: Option<PathBuf>,
    },

    /// Share a persisted strip
    Share {
        /// Persisted strip file
        #[arg(short, long)]
        strip: PathBuf,

        /// Destinations (print-queue, social-profile, cloud-folder)
        #[arg(short, long = "destination", required = true)]
        destinations: Vec<Destination>,

        /// Outbox directory
        #[arg(long)]
        outbox: PathBuf,
    },

    /// Print the newest persisted strip
    Latest {
        /// Directory to search (default: configured output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=photobooth=debug, RUST_LOG=info
    let fallback = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let mut config = cli::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Assemble {
            frames,
            filter,
            arrangement,
            rotation,
            reflect,
            output,
            prefix,
            thumb,
            share,
            outbox,
        } => {
            if let Some(filter) = filter {
                config.filter_mode = filter;
            }
            if let Some(arrangement) = arrangement {
                config.arrangement = arrangement;
            }
            if let Some(rotation) = rotation {
                config.rotation_degrees = rotation;
            }
            config.reflect |= reflect;
            if output.is_some() {
                config.output_dir = output;
            }
            if let Some(prefix) = prefix {
                config.filename_prefix = prefix;
            }
            if let Some((max_width, max_height)) = thumb {
                config.thumbnail.max_width = max_width;
                config.thumbnail.max_height = max_height;
            }
            config.validate()?;
            cli::assemble(&config, &frames, &share, outbox).map_err(Into::into)
        }
        Commands::Share {
            strip,
            destinations,
            outbox,
        } => cli::share(&config, &strip, &destinations, &outbox).map_err(Into::into),
        Commands::Latest { output } => {
            if output.is_some() {
                config.output_dir = output;
            }
            cli::latest(&config).map_err(Into::into)
        }
    }
}
