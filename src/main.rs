use std::io;

use clap::Parser;
use havannah::search::Config;
use havannah::Engine;
use tracing_subscriber::EnvFilter;

/// Havannah engine speaking a line-based text protocol on stdin/stdout.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Number of simulations per search.
    #[arg(long, default_value_t = Config::default().simulations)]
    simulations: u32,
    /// Seed of the random number generators. Seeded from OS entropy if absent.
    #[arg(long)]
    seed: Option<u64>,
    /// Log filter used when `RUST_LOG` is not set. Logs go to stderr.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    havannah::log_build_info();

    let config = Config {
        simulations: cli.simulations,
        seed: cli.seed,
        ..Config::default()
    };
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    Engine::new(config, &mut input, &mut output)?.protocol_loop()
}
