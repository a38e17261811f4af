mod menu;

use clap::{Parser, Subcommand};
use fitplan_core::*;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fitplan")]
#[command(about = "Exercise catalog, routine and user planner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default)
    Menu {
        /// Start with the built-in sample catalog
        #[arg(long)]
        samples: bool,
    },

    /// Estimate the duration of an exercise without creating it
    Estimate {
        #[arg(long)]
        reps: u32,

        #[arg(long)]
        sets: u32,

        /// Seconds per repetition (defaults to the configured timing)
        #[arg(long)]
        seconds_per_rep: Option<u32>,

        /// Rest between sets in seconds (defaults to the configured timing)
        #[arg(long)]
        rest: Option<u32>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    fitplan_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Some(Commands::Menu { samples }) => cmd_menu(&config, samples),
        Some(Commands::Estimate {
            reps,
            sets,
            seconds_per_rep,
            rest,
        }) => cmd_estimate(&config, reps, sets, seconds_per_rep, rest),
        None => {
            // Default to the interactive menu
            cmd_menu(&config, false)
        }
    }
}

fn cmd_menu(config: &Config, samples: bool) -> Result<()> {
    let mut repo = if samples || config.startup.load_samples {
        build_sample_repository(config.timing)?
    } else {
        Repository::with_timing(config.timing)
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    menu::Menu::new(&mut repo, stdin.lock(), stdout.lock()).run()
}

fn cmd_estimate(
    config: &Config,
    reps: u32,
    sets: u32,
    seconds_per_rep: Option<u32>,
    rest: Option<u32>,
) -> Result<()> {
    let timing = TimingConfig {
        seconds_per_rep: seconds_per_rep.unwrap_or(config.timing.seconds_per_rep),
        rest_between_sets: rest.unwrap_or(config.timing.rest_between_sets),
    };

    match Exercise::with_timing("estimate", reps, sets, timing) {
        Ok(exercise) => {
            println!(
                "{} reps x {} sets: {}",
                reps,
                sets,
                format_duration(exercise.duration_seconds())
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("[Error] {}", e);
            Err(e)
        }
    }
}
