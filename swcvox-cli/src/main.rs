//! swcvox command-line interface.
//!
//! Imports SWC neuron tracings, fits them into an image volume and writes
//! a scene or a rasterized skeleton.
#![allow(
    clippy::uninlined_format_args,
    clippy::cast_precision_loss,
    clippy::too_many_lines
)]

use clap::{Args, Parser, Subcommand, ValueEnum};

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use swcvox_core::path::all_points;
use swcvox_core::{CoordinateNormalizer, GuessedOffset, Importer, TransformParameters};
use swcvox_io::{write_skeleton_header, DataFileWriter, ImportConfig, SwcFileImporter};
use swcvox_render::{check_inside, render_with_retry, ModeRenderer, RenderMode, Rendered};
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error: {0}")]
    SwcvoxIo(#[from] swcvox_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] swcvox_core::Error),

    #[error("SWC error: {0}")]
    Swc(#[from] swcvox_swc::Error),

    #[error("Unable to render: {0}")]
    Render(#[from] swcvox_render::Error),
}

/// Rendering choice.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// 3D scene colored by structure type
    Color,
    /// 3D scene in a single color
    Mono,
    /// Untagged rasterized skeleton volume
    Skeleton,
}

impl From<Mode> for RenderMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Color => RenderMode::ColorScene,
            Mode::Mono => RenderMode::MonochromeScene,
            Mode::Skeleton => RenderMode::Skeleton,
        }
    }
}

/// Coordinate transform options shared by all subcommands.
#[derive(Args, Debug, Default)]
struct TransformArgs {
    /// JSON configuration file (flags override its values)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Offset added to SWC coordinates
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    offset: Option<Vec<f64>>,

    /// Scale applied to SWC coordinates (minimum 0.01)
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"])]
    scale: Option<Vec<f64>>,

    /// Voxel calibration of the output
    #[arg(long, num_args = 3, value_names = ["W", "H", "D"])]
    voxel_size: Option<Vec<f64>>,

    /// Unit of the voxel calibration
    #[arg(long)]
    unit: Option<String>,

    /// Leave the output uncalibrated
    #[arg(long)]
    ignore_calibration: bool,
}

impl TransformArgs {
    fn resolve(&self) -> Result<ImportConfig> {
        let mut config = match &self.config {
            Some(path) => ImportConfig::from_file(path)?,
            None => ImportConfig::default(),
        };
        let mut t = config.transform;
        if let Some([x, y, z]) = self.offset.as_deref().and_then(triple) {
            t = t.with_offset(x, y, z);
        }
        if let Some([x, y, z]) = self.scale.as_deref().and_then(triple) {
            t = t.with_scale(x, y, z);
        }
        if let Some([w, h, d]) = self.voxel_size.as_deref().and_then(triple) {
            let unit = self.unit.clone().unwrap_or_else(|| t.voxel_unit.clone());
            t = t.with_voxel_size(w, h, d, &unit);
        } else if let Some(unit) = &self.unit {
            let [w, h, d] = t.voxel_size;
            t = t.with_voxel_size(w, h, d, unit);
        }
        if self.ignore_calibration {
            t = t.ignoring_calibration();
        }
        t.validate()?;
        config.transform = t;
        Ok(config)
    }
}

fn triple(values: &[f64]) -> Option<[f64; 3]> {
    match values {
        [x, y, z] => Some([*x, *y, *z]),
        _ => None,
    }
}

/// Import SWC neuron tracings and fit them into displayable image volumes.
#[derive(Parser)]
#[command(name = "swcvox")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an SWC file as a scene (JSON) or skeleton volume (raw + JSON header)
    Render {
        /// Input SWC file
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Rendering mode (defaults to the config file's, then color)
        #[arg(short, long, value_enum)]
        mode: Option<Mode>,

        #[command(flatten)]
        transform: TransformArgs,

        /// Do not infer a corrective offset when rendering fails
        #[arg(long)]
        no_guess: bool,

        /// Accept the guessed-offset retry without asking
        #[arg(short, long, conflicts_with = "batch")]
        yes: bool,

        /// Non-interactive: never retry
        #[arg(long)]
        batch: bool,
    },

    /// Show information about an SWC file
    Info {
        /// Input SWC file
        input: PathBuf,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Export transformed tracing points as CSV
    Points {
        /// Input SWC file
        input: PathBuf,

        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        transform: TransformArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Render {
            input,
            output,
            mode,
            transform,
            no_guess,
            yes,
            batch,
        } => {
            let config = transform.resolve()?;
            let mode = mode.map_or(config.mode, RenderMode::from);
            let guess = config.guess_offsets && !no_guess;

            log::debug!("Mode: {}", mode);
            log::debug!("Transform: {:?}", config.transform);

            let start = Instant::now();
            let importer = SwcFileImporter::open(&input)?;
            let renderer = ModeRenderer::new(mode);
            let name = importer.source_name();

            let run = render_with_retry(
                &importer,
                &renderer,
                config.transform,
                guess,
                |err, guessed| {
                    if batch {
                        return false;
                    }
                    yes || confirm_retry(&name, err, guessed)
                },
            )?;

            match &run.output {
                Rendered::Scene(scene) => {
                    let mut writer = DataFileWriter::create(&output)?;
                    writer.write_scene_json(scene)?;
                    println!(
                        "Wrote {} polylines ({} vertices) to {}",
                        scene.polylines.len(),
                        scene.vertex_count(),
                        output.display()
                    );
                }
                Rendered::Skeleton(skeleton) => {
                    let mut writer = DataFileWriter::create(&output)?;
                    writer.write_skeleton_raw(skeleton)?;
                    let header = write_skeleton_header(&output, skeleton)?;
                    println!(
                        "Wrote {} skeleton voxels to {} (header: {})",
                        skeleton.foreground_count(),
                        output.display(),
                        header.display()
                    );
                }
            }

            let v = run.normalization.volume;
            println!("Paths: {}", run.path_count);
            println!("Volume: {} x {} x {}", v.width, v.height, v.depth);
            if run.retried {
                let [x, y, z] = run.params.offset;
                println!("Rendered with guessed offset ({:.2}, {:.2}, {:.2})", x, y, z);
            }
            log::debug!("Done in {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Info { input, transform } => {
            let config = transform.resolve()?;
            let importer = SwcFileImporter::open(&input)?;
            print_info(&input, &importer, &config.transform)?;
        }

        Commands::Points {
            input,
            output,
            transform,
        } => {
            let config = transform.resolve()?;
            let importer = SwcFileImporter::open(&input)?;
            let paths = importer.import(&config.transform)?;
            let mut writer = DataFileWriter::create(&output)?;
            writer.write_points_csv(&paths)?;
            println!(
                "Wrote {} points from {} paths to {}",
                all_points(&paths).count(),
                paths.len(),
                output.display()
            );
        }
    }

    Ok(())
}

fn print_info(input: &Path, importer: &SwcFileImporter, params: &TransformParameters) -> Result<()> {
    let doc = importer.document();
    println!("File: {}", input.display());
    println!(
        "Size: {} bytes ({:.2} KB)",
        importer.file_size(),
        importer.file_size() as f64 / 1_000.0
    );
    println!("Header lines: {}", doc.header.len());
    println!("Samples: {}", doc.len());
    for (ty, count) in doc.type_counts() {
        println!("  {:<16} {}", ty.to_string(), count);
    }

    let tree = swcvox_swc::SampleTree::build(&doc.records)?;
    let paths = importer.import(params)?;
    println!("Paths: {}", paths.len());
    println!(
        "Roots: {}  Forks: {}  Tips: {}",
        tree.roots().len(),
        tree.fork_count(),
        tree.tip_count()
    );

    let n = CoordinateNormalizer::new()
        .with_offset_inference(true)
        .normalize(all_points(&paths))?;
    let v = n.volume;
    println!("Volume: {} x {} x {}", v.width, v.height, v.depth);
    println!("Min voxel: {:?}  Max voxel: {:?}", n.min, n.max);
    if let Some(g) = n.guessed_offset {
        println!("Guessed offset: ({:.2}, {:.2}, {:.2})", g.x, g.y, g.z);
    }
    match check_inside(&paths, &v) {
        Ok(()) => println!("Fits volume: yes"),
        Err(e) => println!("Fits volume: no ({})", e),
    }
    Ok(())
}

fn confirm_retry(name: &str, err: &swcvox_render::Error, guessed: &GuessedOffset) -> bool {
    eprintln!("Unable to render {}: {}", name, err);
    eprint!(
        "Re-try with guessed offset ({:.2}, {:.2}, {:.2})? [y/N] ",
        guessed.x, guessed.y, guessed.z
    );
    let _ = io::stderr().flush();

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
