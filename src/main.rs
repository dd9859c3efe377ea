use clap::Parser;
use famiboy::config::{self, Cadence, Region};
use famiboy::replay::Replay;
use famiboy::{logging, trace};
use log::{info, warn};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about = "Replay a Game Boy APU register trace as Famicom APU writes")]
struct Args {
    /// Path to register trace
    trace: PathBuf,

    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Update cadence (overrides config)
    #[arg(long, value_enum)]
    cadence: Option<Cadence>,

    /// Host console region (overrides config)
    #[arg(long, value_enum)]
    region: Option<Region>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Print the final host register image
    #[arg(long)]
    image: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    logging::install();

    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(config::default_config_path);
    let mut cfg = config::load_from_file(&config_path);
    if let Some(cadence) = args.cadence {
        cfg.cadence = cadence;
    }
    if let Some(region) = args.region {
        cfg.region = region;
    }
    info!("{cfg:?}");

    let commands = match trace::load(&args.trace) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut replay = Replay::new(&cfg);
    for output in replay.run(&commands, args.frames) {
        println!("{}", output.to_line());
    }

    if args.image {
        let image: Vec<String> = replay
            .image()
            .iter()
            .map(|w| format!("${:04X}={:02X}", w.address(), w.value))
            .collect();
        println!("image: {}", image.join(" "));
    }

    let dropped = replay.apu().sink().dropped();
    if dropped > 0 {
        warn!("{dropped} host writes dropped by a full bus queue");
    }
    info!("replayed {} frames", replay.frames());
    ExitCode::SUCCESS
}
