use std::path::PathBuf;

use clap::Parser;
use server::init::{self, RunOptions};
use shared::{load_session_config, water::WaterPreset, SessionConfig, CONFIG_LOAD_ERROR};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 3600, help = "Number of ticks to simulate")]
    ticks: u64,

    #[arg(short, long, help = "Session config file (RON)")]
    config: Option<PathBuf>,

    #[arg(long, help = "Use the 32x32 mobile water grid")]
    mobile: bool,

    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(long, help = "Tick as fast as possible instead of at the frame rate")]
    fast: bool,
}

fn main() {
    let args = Args::parse();

    if args.ticks == 0 {
        eprintln!("Error: --ticks must be at least 1.");
        std::process::exit(1);
    }

    let mut config = match &args.config {
        Some(path) => match load_session_config(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{} {:?}: {err}", CONFIG_LOAD_ERROR, path);
                std::process::exit(1);
            }
        },
        None => SessionConfig::default(),
    };

    if args.mobile {
        config = config.with_preset(WaterPreset::Mobile);
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    init::init(
        config,
        RunOptions {
            ticks: args.ticks,
            fast: args.fast,
        },
    );
}
