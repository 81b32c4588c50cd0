use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use connectn::{create_players, Game, GameConfig, LineConsole};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Play Connect-N on the terminal against people or simple computer players.
#[derive(Debug, Parser)]
#[command(name = "connectn", version, about)]
struct Cli {
    /// Path to the `key: value` game configuration
    #[arg(default_value = "config_files/connect4.txt")]
    config: PathBuf,

    /// Seed for the computer players' random choices
    #[arg(long)]
    seed: Option<u64>,

    /// Log filter, e.g. `debug` or `connectn=info` (falls back to RUST_LOG)
    #[arg(long)]
    log: Option<String>,

    /// Treat names and pieces that differ only in case as distinct
    #[arg(long)]
    case_sensitive: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref());

    let config = GameConfig::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    info!(?config, "loaded configuration");

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut console = LineConsole::stdio();
    let players = create_players(&mut console, &mut rng, config.blank_char, cli.case_sensitive)
        .context("setting up players")?;

    let mut game = Game::from_config(&config, players, console)?;
    let outcome = game.play()?;
    info!(?outcome, "match finished");
    Ok(())
}

fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
