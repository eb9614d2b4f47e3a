use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use game_core::{
    ContentPack, Game, GameConfig, GameRunner, GameSetup, PlayerAgent, RandomAgent, RunOutcome,
    VictoryKind,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Play a full game between random bots", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Player names in turn order (1 to 4)
    #[arg(short, long, value_delimiter = ',', default_value = "alice,bob,carol,dave")]
    players: Vec<String>,
    /// Stop after this many rounds if nobody has won
    #[arg(short, long, default_value_t = 200)]
    rounds: u32,
    /// TOML file overriding rule constants
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write a hash-chained journal of every input here
    #[arg(short, long)]
    journal: Option<PathBuf>,
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Summary {
    seed: u64,
    winner: Option<String>,
    victory: Option<VictoryKind>,
    rounds: u32,
    inputs: usize,
    snapshot_hash: u64,
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let config = load_config(args.config.as_ref())?;
    let names: Vec<&str> = args.players.iter().map(String::as_str).collect();
    let setup = GameSetup::standard(&names).context("cannot seat these players")?;
    let content = ContentPack::default();
    let game = Game::new(args.seed, &content, setup, config).context("cannot set up the game")?;

    let mut seeds = ChaCha8Rng::seed_from_u64(args.seed);
    let agents: Vec<Box<dyn PlayerAgent>> = names
        .iter()
        .map(|name| Box::new(RandomAgent::new(*name, seeds.next_u64())) as Box<dyn PlayerAgent>)
        .collect();

    let mut runner = GameRunner::new(game, agents)?.with_round_limit(args.rounds);
    if let Some(path) = &args.journal {
        runner = runner
            .with_journal_file(path)
            .with_context(|| format!("failed to create journal {}", path.display()))?;
    }

    info!(seed = args.seed, players = names.len(), "simulation started");
    let outcome = runner.run_to_completion().context("simulation aborted")?;

    let (winner, victory) = match outcome {
        RunOutcome::Won(victory) => (Some(victory.winner_name), Some(victory.kind)),
        RunOutcome::RoundLimitReached { .. } => (None, None),
    };
    let summary = Summary {
        seed: args.seed,
        winner,
        victory,
        rounds: runner.game().round(),
        inputs: runner.journal().inputs.len(),
        snapshot_hash: runner.game().snapshot_hash(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        match (&summary.winner, &summary.victory) {
            (Some(name), Some(kind)) => {
                println!("{name} wins by {kind:?} in round {}", summary.rounds)
            }
            _ => println!("No winner after {} rounds", args.rounds),
        }
        println!("Inputs: {}", summary.inputs);
        println!("Snapshot hash: {}", summary.snapshot_hash);
    }
    Ok(())
}
