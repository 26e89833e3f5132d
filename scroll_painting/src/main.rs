//! scroll_painting — interactive entry point.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use scroll_core::ScrollConfig;
use scroll_painting::app::{run, AppConfig};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "scroll_painting", about = "Hand-driven Chinese scroll painting")]
struct Cli {
    /// TOML file overriding the scroll tuning constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for style choice and procedural paintings
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated painting latency in milliseconds
    #[arg(long, default_value_t = 2500)]
    latency_ms: u64,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.print_config {
        match ScrollConfig::default().to_toml() {
            Ok(s) => print!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scroll_painting=info,scroll_core=info".into()),
        )
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Scroll Painting — Hand-Driven Landscape Scroll        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Mouse simulation  (use --features leap for hardware)");
    println!();

    let scroll = match cli.config.as_deref() {
        Some(path) => match ScrollConfig::load(path) {
            Ok(c) => {
                info!("loaded config from {}", path.display());
                c
            }
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        None => ScrollConfig::default(),
    };

    let cfg = AppConfig {
        scroll,
        seed: cli.seed,
        latency: Duration::from_millis(cli.latency_ms),
        ..AppConfig::default()
    };

    if let Err(e) = run(cfg) {
        error!("{}", e);
        std::process::exit(1);
    }
}
