//! CLI command modules

pub mod compare;
pub mod config;
pub mod generate;
pub mod run;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, warn};

use deeproute_bandit::{Regret, RunReport};
use deeproute_core::RewardTable;

use crate::settings::Settings;

/// Reward table selection shared by `run` and `compare`
#[derive(Args, Debug, Clone, Default)]
pub struct TableArgs {
    /// Reward table CSV (header row, one row per round, one column per path)
    #[arg(short, long)]
    pub table: Option<PathBuf>,

    /// Rounds to play (defaults to every row of the table)
    #[arg(short, long)]
    pub rounds: Option<usize>,

    /// Paths to choose between (defaults to every column of the table)
    #[arg(short, long)]
    pub arms: Option<usize>,

    /// Seed for randomized policies
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// A loaded table plus the resolved run dimensions
pub struct Prepared {
    pub path: PathBuf,
    pub table: RewardTable,
    pub rounds: usize,
    pub arms: usize,
}

impl TableArgs {
    /// Overlay command-line flags onto the loaded settings
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(table) = &self.table {
            settings.run.reward_table = table.clone();
        }
        if self.rounds.is_some() {
            settings.run.rounds = self.rounds;
        }
        if self.arms.is_some() {
            settings.run.arms = self.arms;
        }
        if let Some(seed) = self.seed {
            settings.run.seed = seed;
        }
    }
}

/// Load the configured reward table and fill in default dimensions
pub fn prepare(settings: &Settings) -> Result<Prepared> {
    let path = settings.run.reward_table.clone();
    let table = RewardTable::load(&path)
        .with_context(|| format!("Failed to load reward table {}", path.display()))?;

    let rounds = settings.run.rounds.unwrap_or(table.rounds());
    let arms = settings.run.arms.unwrap_or(table.arms());

    debug!(
        path = %path.display(),
        table_rounds = table.rounds(),
        table_arms = table.arms(),
        rounds,
        arms,
        "Loaded reward table"
    );

    Ok(Prepared {
        path,
        table,
        rounds,
        arms,
    })
}

/// Regret against the table, or `None` when an unchosen column has a missing cell
pub fn regret_or_warn(report: &RunReport, table: &RewardTable) -> Option<Regret> {
    match report.regret(table) {
        Ok(regret) => Some(regret),
        Err(e) => {
            warn!(policy = %report.policy, "Regret unavailable: {}", e);
            None
        }
    }
}
