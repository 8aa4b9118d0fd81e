//! Generate a Bernoulli reward table

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use deeproute_core::RewardTable;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output CSV path
    #[arg(short, long, default_value = "Networkpath_rand.csv")]
    pub out: PathBuf,

    /// Rounds (rows) to generate
    #[arg(short, long, default_value_t = 10_000)]
    pub rounds: usize,

    /// Per-path probability of a reward of 1, comma separated
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub probabilities: Vec<f64>,

    /// Random seed
    #[arg(short, long, default_value_t = 0)]
    pub seed: u64,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let table = RewardTable::bernoulli(args.rounds, &args.probabilities, args.seed)?;
    table
        .save(&args.out)
        .with_context(|| format!("Failed to write {}", args.out.display()))?;

    info!(
        path = %args.out.display(),
        rounds = table.rounds(),
        arms = table.arms(),
        "Reward table generated"
    );
    println!(
        "Reward table written: {} ({} rounds x {} paths)",
        args.out.display(),
        table.rounds(),
        table.arms()
    );

    Ok(())
}
