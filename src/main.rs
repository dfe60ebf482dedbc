use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use liftrs::{
    import, logging, AthleteLevel, DeloadPolicy, ExerciseType, ImageSize, IngestOutcome,
    KinematicsTracker, LiftConfig, LogLevel, NormalizedRect, OneRepMaxEstimator, OneRepMaxFormula,
    ProgressionEngine, VelocityZone, WarmupPlanner,
};

/// LiftRS - Barbell velocity tracking and load progression
///
/// Replays recorded bar tracking data to compute bar speed and range of motion,
/// and turns logged sets into next-session weights, 1RM estimates, deload
/// decisions and warm-up ramps.
#[derive(Parser)]
#[command(name = "liftrs")]
#[command(author = "LiftRS Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Barbell velocity tracking and autoregulated progression", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay recorded tracker output (timestamp,x,y CSV) through the kinematics tracker
    Track {
        /// Frames CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Initial plate bounding box, normalized: x,y,width,height
        #[arg(long, value_parser = parse_region)]
        region: NormalizedRect,

        /// Frame size in pixels: WIDTHxHEIGHT
        #[arg(long, value_parser = parse_image_size, default_value = "1920x1080")]
        image: ImageSize,

        /// Print the session summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Estimate a one-rep max from a set
    OneRepMax {
        #[arg(short, long)]
        weight: f64,

        #[arg(short, long)]
        reps: u32,

        /// Formula (epley, brzycki, lander)
        #[arg(short, long, default_value = "epley")]
        formula: OneRepMaxFormula,
    },

    /// Recommend the next working weight after a set
    NextWeight {
        #[arg(short, long)]
        weight: f64,

        #[arg(short, long)]
        reps: u32,

        /// Rate of perceived exertion (0-10)
        #[arg(long)]
        rpe: f64,

        /// Athlete level (beginner, intermediate, advanced, elite)
        #[arg(short, long, default_value = "intermediate")]
        level: AthleteLevel,

        /// Exercise (squat, bench, deadlift)
        #[arg(short, long)]
        exercise: ExerciseType,
    },

    /// Decide whether a deload is due
    Deload {
        /// Recent sets CSV (weight_kg,reps,rpe), newest first
        #[arg(short, long)]
        sets: Option<PathBuf>,

        /// Weeks of training completed
        #[arg(long)]
        weeks: u32,

        /// Current working weight in kg
        #[arg(short, long)]
        weight: f64,
    },

    /// Generate a warm-up ramp for a working weight
    Warmup {
        #[arg(short, long)]
        weight: f64,
    },
}

fn parse_region(s: &str) -> std::result::Result<NormalizedRect, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| format!("Invalid region '{}': {}", s, e))?;

    match parts.as_slice() {
        [x, y, w, h] => Ok(NormalizedRect::new(*x, *y, *w, *h)),
        _ => Err(format!("Region needs 4 values (x,y,width,height), got '{}'", s)),
    }
}

fn parse_image_size(s: &str) -> std::result::Result<ImageSize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("Image size must look like 1920x1080, got '{}'", s))?;
    let width = w.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let height = h.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok(ImageSize::new(width, height))
}

#[derive(Tabled)]
struct WarmupRow {
    #[tabled(rename = "Set")]
    set: usize,
    #[tabled(rename = "Weight (kg)")]
    weight: String,
    #[tabled(rename = "Reps")]
    reps: u32,
    #[tabled(rename = "% Working")]
    percentage: String,
}

fn zone_colored(zone: VelocityZone) -> ColoredString {
    match zone {
        VelocityZone::Fast => zone.as_str().green().bold(),
        VelocityZone::Moderate => zone.as_str().yellow().bold(),
        VelocityZone::Slow => zone.as_str().red().bold(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => LiftConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => LiftConfig::load_or_default(),
    };

    let mut log_config = config.logging.clone();
    log_config.level = LogLevel::from_verbosity(log_config.level, cli.verbose);
    logging::init_logging(&log_config)?;

    match cli.command {
        Commands::Track {
            file,
            region,
            image,
            json,
        } => {
            let frames = import::read_frames(&file)?;

            let mut tracker: KinematicsTracker = config.tracker();
            tracker.start(region, image)?;

            let mut dropped = 0usize;
            for frame in &frames {
                if tracker.ingest(frame.position(), frame.timestamp) == IngestOutcome::Dropped {
                    dropped += 1;
                }
            }
            tracker.stop();

            let stats = tracker.stats();
            if json {
                let summary = serde_json::json!({
                    "frames": frames.len(),
                    "dropped": dropped,
                    "stats": stats,
                    "zone": tracker.color_for_velocity(stats.avg_velocity),
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }

            println!("{}", "Tracked session".cyan().bold());
            println!("  Frames:        {} ({} dropped)", frames.len(), dropped);
            println!("  Avg velocity:  {:.2} m/s", stats.avg_velocity);
            println!(
                "  Peak velocity: {:.2} m/s ({})",
                stats.peak_velocity,
                zone_colored(tracker.color_for_velocity(stats.peak_velocity))
            );
            println!("  ROM:           {:.1} cm", stats.rom_cm);
            println!(
                "  Zone:          {}",
                zone_colored(tracker.color_for_velocity(stats.avg_velocity))
            );
        }

        Commands::OneRepMax {
            weight,
            reps,
            formula,
        } => {
            let estimate = OneRepMaxEstimator::estimate_detailed(weight, reps, formula)?;
            println!("{}", format!("Estimated 1RM ({})", estimate.formula).blue().bold());
            println!("  1RM:          {:.1} kg", estimate.value_kg);
            println!(
                "  Training max: {:.1} kg",
                OneRepMaxEstimator::training_max(estimate.value_kg)
            );
        }

        Commands::NextWeight {
            weight,
            reps,
            rpe,
            level,
            exercise,
        } => {
            let engine = ProgressionEngine::new(config.progression.clone());
            let next = engine.next_weight(weight, reps, rpe, level, exercise)?;
            let volume = ProgressionEngine::recommended_volume(level, exercise);

            println!("{}", format!("{} progression", exercise).green().bold());
            println!("  Last set:    {:.1} kg x {} @ RPE {:.1}", weight, reps, rpe);
            println!("  Next weight: {:.2} kg (+{:.2})", next, next - weight);
            println!(
                "  Volume:      {} sets of {}-{} reps, {}x per week",
                volume.sets,
                volume.reps_range.start(),
                volume.reps_range.end(),
                ProgressionEngine::recommended_frequency(level, exercise)
            );
        }

        Commands::Deload {
            sets,
            weeks,
            weight,
        } => {
            let recent = match sets {
                Some(path) => import::read_sets(path)?,
                None => Vec::new(),
            };

            let decision = DeloadPolicy::new(config.deload.clone()).decide(&recent, weeks, weight);
            if decision.should_deload {
                println!("{}", "Deload recommended".yellow().bold());
                if let Some(reason) = decision.reason {
                    println!("  Reason: {:?}", reason);
                }
            } else {
                println!("{}", "No deload needed".green().bold());
            }
            println!("  Suggested weight: {:.1} kg", decision.suggested_weight_kg);
        }

        Commands::Warmup { weight } => {
            let plan = WarmupPlanner::new(config.warmup.clone()).generate(weight);
            let rows: Vec<WarmupRow> = plan
                .sets
                .iter()
                .enumerate()
                .map(|(i, s)| WarmupRow {
                    set: i + 1,
                    weight: format!("{:.1}", s.weight_kg),
                    reps: s.reps,
                    percentage: if s.percentage == 0 {
                        "bar".to_string()
                    } else {
                        format!("{}%", s.percentage)
                    },
                })
                .collect();

            println!("{}", format!("Warm-up for {:.1} kg", plan.working_weight_kg).magenta().bold());
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
    }

    Ok(())
}
