//! Selection policy trait and implementations

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use deeproute_core::{DeeprouteError, Result};

use crate::stats::ArmStats;

/// Default UCB exploration coefficient
pub const DEFAULT_UCB_EXPLORATION: f64 = 1.5;

/// Trait for arm selection policies
pub trait SelectionPolicy: Send {
    /// Policy name
    fn name(&self) -> &str;

    /// Pick an arm for `round` (0-indexed) given the statistics so far.
    /// `stats` always covers at least one arm.
    fn select(&mut self, round: usize, stats: &ArmStats) -> usize;

    /// Get policy parameters as JSON
    fn params(&self) -> serde_json::Value;
}

/// Uniform random selection, independent of history
pub struct UniformRandom {
    rng: StdRng,
    seed: u64,
}

impl UniformRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }
}

impl SelectionPolicy for UniformRandom {
    fn name(&self) -> &str {
        "uniform-random"
    }

    fn select(&mut self, _round: usize, stats: &ArmStats) -> usize {
        self.rng.gen_range(0..stats.arms())
    }

    fn params(&self) -> serde_json::Value {
        serde_json::json!({ "seed": self.seed })
    }
}

/// Upper Confidence Bound selection.
///
/// Untried arms are selected first in index order. After that every arm
/// scores `average + sqrt(c * ln(n) / selections)` with `n` the 1-indexed
/// round, and the strictly greatest score wins, so ties go to the lowest index.
pub struct Ucb {
    exploration: f64,
}

impl Ucb {
    pub fn new(exploration: f64) -> Result<Self> {
        if !exploration.is_finite() || exploration < 0.0 {
            return Err(DeeprouteError::config(format!(
                "UCB exploration coefficient must be finite and non-negative, got {exploration}"
            )));
        }
        Ok(Self { exploration })
    }

    pub fn exploration(&self) -> f64 {
        self.exploration
    }

    /// Confidence bound for a tried arm, `None` for an untried one
    pub fn upper_bound(&self, round: usize, arm: usize, stats: &ArmStats) -> Option<f64> {
        let average = stats.average_reward(arm)?;
        let n = (round + 1) as f64;
        let bonus = (self.exploration * n.ln() / stats.selections(arm) as f64).sqrt();
        Some(average + bonus)
    }
}

impl Default for Ucb {
    fn default() -> Self {
        Self {
            exploration: DEFAULT_UCB_EXPLORATION,
        }
    }
}

impl SelectionPolicy for Ucb {
    fn name(&self) -> &str {
        "ucb"
    }

    fn select(&mut self, round: usize, stats: &ArmStats) -> usize {
        if let Some(arm) = stats.first_untried() {
            return arm;
        }

        let mut best_arm = 0;
        let mut best_bound = f64::NEG_INFINITY;
        for arm in 0..stats.arms() {
            let bound = self.upper_bound(round, arm, stats).unwrap_or(f64::INFINITY);
            if bound > best_bound {
                best_bound = bound;
                best_arm = arm;
            }
        }
        best_arm
    }

    fn params(&self) -> serde_json::Value {
        serde_json::json!({ "exploration": self.exploration })
    }
}

/// Known policy names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    UniformRandom,
    Ucb,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 2] = [PolicyKind::UniformRandom, PolicyKind::Ucb];

    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKind::UniformRandom => "uniform-random",
            PolicyKind::Ucb => "ucb",
        }
    }

    /// Instantiate the policy
    pub fn build(self, options: &PolicyOptions) -> Result<Box<dyn SelectionPolicy>> {
        let policy: Box<dyn SelectionPolicy> = match self {
            PolicyKind::UniformRandom => Box::new(UniformRandom::new(options.seed)),
            PolicyKind::Ucb => Box::new(Ucb::new(options.ucb_exploration)?),
        };
        Ok(policy)
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = DeeprouteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" | "uniform" | "uniform-random" | "uniform_random" => {
                Ok(PolicyKind::UniformRandom)
            }
            "ucb" => Ok(PolicyKind::Ucb),
            other => Err(DeeprouteError::config(format!(
                "unknown policy '{other}', expected one of: uniform-random, ucb"
            ))),
        }
    }
}

/// Construction parameters shared by all policies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyOptions {
    pub seed: u64,
    pub ucb_exploration: f64,
}

impl Default for PolicyOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            ucb_exploration: DEFAULT_UCB_EXPLORATION,
        }
    }
}
