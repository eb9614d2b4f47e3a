use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use game_core::{
    ContentPack, ReplayResult, journal_file::load_journal_from_file, replay_standard,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Replay a Doomspire journal file", long_about = None)]
struct Args {
    /// Path to the JSONL journal to replay
    #[arg(short, long)]
    journal: PathBuf,
    /// Expected snapshot hash; replay fails when it differs
    #[arg(long)]
    expect_hash: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let journal = load_journal_from_file(&args.journal)
        .with_context(|| format!("failed to load journal {}", args.journal.display()))?;
    let content = ContentPack::default();

    let result: ReplayResult =
        replay_standard(&content, &journal).context("replay failed during execution")?;

    println!("Replay complete.");
    println!("Inputs applied: {}", result.inputs_applied);
    println!("Final round: {}", result.final_round);
    match &result.winner {
        Some(victory) => println!("Winner: {} ({:?})", victory.winner_name, victory.kind),
        None => println!("Winner: undecided"),
    }
    println!("Snapshot hash: {}", result.final_snapshot_hash);

    if let Some(expected) = args.expect_hash {
        anyhow::ensure!(
            expected == result.final_snapshot_hash,
            "snapshot hash {} does not match expected {expected}",
            result.final_snapshot_hash
        );
    }
    Ok(())
}
