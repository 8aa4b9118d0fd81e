//! Run report handed to the console / JSON reporting surface

use std::fmt::Write as _;

use serde::Serialize;

use deeproute_core::{Result, RewardTable};

/// Final statistics for one arm
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArmSummary {
    pub arm: usize,
    pub selections: u64,
    pub total_reward: f64,
    pub average_reward: Option<f64>,
}

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub policy: String,
    pub params: serde_json::Value,
    pub rounds: usize,
    pub arms: usize,
    pub selections: Vec<usize>,
    pub arm_stats: Vec<ArmSummary>,
    pub total_reward: f64,
    /// Filled in by the caller once computed against the table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regret: Option<Regret>,
}

/// Gap between the best fixed arm in hindsight and the achieved reward
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Regret {
    pub best_arm: usize,
    pub best_total: f64,
    pub achieved: f64,
    pub regret: f64,
}

impl RunReport {
    /// Times each arm appears in the selection log
    pub fn selection_counts(&self) -> Vec<u64> {
        let mut counts = vec![0u64; self.arms];
        for &arm in &self.selections {
            counts[arm] += 1;
        }
        counts
    }

    /// Share of rounds each arm was selected
    pub fn frequencies(&self) -> Vec<f64> {
        let total = self.selections.len().max(1) as f64;
        self.selection_counts()
            .into_iter()
            .map(|n| n as f64 / total)
            .collect()
    }

    pub fn average_reward(&self) -> f64 {
        self.total_reward / self.rounds.max(1) as f64
    }

    /// Compare against always playing the single best arm over the same rounds.
    /// Ties on the best column go to the lowest index.
    pub fn regret(&self, table: &RewardTable) -> Result<Regret> {
        let mut best_arm = 0;
        let mut best_total = f64::NEG_INFINITY;
        for arm in 0..self.arms {
            let total = table.column_total(arm, self.rounds)?;
            if total > best_total {
                best_total = total;
                best_arm = arm;
            }
        }

        Ok(Regret {
            best_arm,
            best_total,
            achieved: self.total_reward,
            regret: best_total - self.total_reward,
        })
    }

    /// Horizontal text histogram of selections per arm, longest bar `width` wide
    pub fn render_histogram(&self, width: usize) -> String {
        let counts = self.selection_counts();
        let max = counts.iter().copied().max().unwrap_or(0).max(1);
        let count_width = max.to_string().len();
        let total = self.selections.len().max(1) as f64;

        let mut out = String::new();
        for (arm, &count) in counts.iter().enumerate() {
            let bar = (count as f64 / max as f64 * width as f64).round() as usize;
            let _ = writeln!(
                out,
                "path {arm:>2} | {:<width$} {count:>count_width$} ({:>5.1}%)",
                "#".repeat(bar),
                count as f64 / total * 100.0,
            );
        }
        out
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
