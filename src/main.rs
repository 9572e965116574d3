//! lensprofile CLI
//!
//! Generates JFL lathe data from a lens parameter file and inspects or
//! analyses existing JFL files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lensprofile::{
    analyze, generate_jfl, init_logging_with_level, load_jfl, load_lens, save_lens, summarize,
    Config, CoordinateKind, LensSpec, BUILD_DATE, VERSION,
};

#[derive(Parser)]
#[command(name = "lensprofile")]
#[command(about = "Lens machining profile generator", long_about = None)]
struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a JFL file from a lens parameter file
    Generate {
        /// Lens parameter file (.json or .toml)
        params: PathBuf,
        /// Output JFL file
        #[arg(short, long)]
        output: PathBuf,
        /// Configuration file (default: the user configuration, if any)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Radial sampling step, overriding the configuration
        #[arg(short, long)]
        step: Option<f64>,
    },
    /// List the segments of a JFL file
    Inspect {
        /// JFL file
        file: PathBuf,
    },
    /// Curvature analysis of one segment of a JFL file
    Analyze {
        /// JFL file
        file: PathBuf,
        /// Segment label
        #[arg(short, long, default_value = "F")]
        segment: String,
        /// Lower bound of the analysed x range
        #[arg(long)]
        x_min: Option<f64>,
        /// Upper bound of the analysed x range
        #[arg(long)]
        x_max: Option<f64>,
        /// Print one row per sample
        #[arg(long)]
        table: bool,
    },
    /// Write a default lens parameter file
    Template {
        /// Output parameter file (.json or .toml)
        #[arg(short, long)]
        output: PathBuf,
        /// Center thickness
        #[arg(long, default_value_t = 0.2)]
        thickness: f64,
        /// Machining diameter
        #[arg(long, default_value_t = 10.6)]
        diameter: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    init_logging_with_level(level)?;
    tracing::debug!(version = VERSION, build_date = BUILD_DATE, "Starting lensprofile");

    match cli.command {
        Commands::Generate {
            params,
            output,
            config,
            step,
        } => {
            let mut config = Config::load_or_default(config.as_deref())?;
            if let Some(step) = step {
                config.sampling.step = step;
                config.validate()?;
            }
            let lens = load_lens(&params)
                .with_context(|| format!("Failed to load {}", params.display()))?;
            let document = generate_jfl(lens, &config, &output)?;
            println!(
                "Wrote {} segments to {}",
                document.len(),
                output.display()
            );
        }
        Commands::Inspect { file } => {
            let document = load_jfl(&file)?;
            if document.is_empty() {
                println!("No segments in {}", file.display());
            }
            for summary in summarize(&document) {
                println!(
                    "{:<4} {:<4} {:>7} points  x [{:.6}, {:.6}]  z [{:.6}, {:.6}]",
                    summary.name,
                    summary.kind.to_string(),
                    summary.points,
                    summary.x_range.0,
                    summary.x_range.1,
                    summary.z_range.0,
                    summary.z_range.1
                );
            }
        }
        Commands::Analyze {
            file,
            segment,
            x_min,
            x_max,
            table,
        } => {
            let document = load_jfl(&file)?;
            let polyline = document
                .window(
                    &segment,
                    CoordinateKind::Xz,
                    x_min.unwrap_or(f64::NEG_INFINITY),
                    x_max.unwrap_or(f64::INFINITY),
                )
                .ok_or_else(|| {
                    anyhow::anyhow!("Segment {} not found in {}", segment, file.display())
                })?;
            let analysis = analyze(&polyline)?;

            if table {
                println!("{:>14} {:>14} {:>14} {:>14} {:>14}", "x", "z", "slope", "R", "R_axial");
                for i in 0..analysis.len() {
                    println!(
                        "{:>14.9} {:>14.9} {:>14.6} {:>14.6} {:>14.6}",
                        analysis.x[i],
                        analysis.z[i],
                        analysis.slope[i],
                        analysis.curvature_radius[i],
                        analysis.axial_radius[i]
                    );
                }
            }

            println!("Segment {}: {} samples", analysis.name, analysis.len());
            match analysis.median_curvature_radius() {
                Some(radius) => println!("Median curvature radius: {:.6}", radius),
                None => println!("Median curvature radius: flat"),
            }
            let (lo, hi) = analysis
                .finite_curvature_radii()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
                    (lo.min(r), hi.max(r))
                });
            if lo <= hi {
                println!("Curvature radius range: [{:.6}, {:.6}]", lo, hi);
            }
        }
        Commands::Template {
            output,
            thickness,
            diameter,
        } => {
            let lens = LensSpec::with_defaults(thickness, diameter)?;
            save_lens(&output, &lens)?;
            println!("Wrote default lens parameters to {}", output.display());
        }
    }

    Ok(())
}
