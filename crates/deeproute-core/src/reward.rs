//! Reward table indexed by (round, arm)
//!
//! The table is loaded once before a run and never mutated afterwards.
//! Cells that were blank or non-numeric in the source are kept as missing
//! and only become an error when a lookup reaches them.

use std::fmt::Write as _;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::error::{DeeprouteError, Result};

/// Immutable reward table, one row per round and one column per arm
#[derive(Debug, Clone, PartialEq)]
pub struct RewardTable {
    arm_names: Vec<String>,
    cells: Vec<Option<f64>>,
    rounds: usize,
}

impl RewardTable {
    /// Build a table from fully populated rows. All rows must share one width.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let arms = rows.first().map_or(0, Vec::len);
        if arms == 0 && !rows.is_empty() {
            return Err(DeeprouteError::config(format!(
                "{} rows given with no reward cells",
                rows.len()
            )));
        }
        let mut cells = Vec::with_capacity(rows.len() * arms);

        for (round, row) in rows.iter().enumerate() {
            if row.len() != arms {
                return Err(DeeprouteError::config(format!(
                    "row {round} has {} cells, expected {arms}",
                    row.len()
                )));
            }
            cells.extend(row.iter().map(|&v| v.is_finite().then_some(v)));
        }

        Ok(Self {
            arm_names: default_arm_names(arms),
            cells,
            rounds: rows.len(),
        })
    }

    /// Parse comma-separated text with a header row naming the arms.
    pub fn from_csv_str(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (_, header) = lines
            .next()
            .ok_or_else(|| DeeprouteError::config("reward table is empty, expected a header row"))?;
        let header = header.strip_prefix('\u{feff}').unwrap_or(header);
        let arm_names: Vec<String> = header.split(',').map(|s| s.trim().to_string()).collect();
        let arms = arm_names.len();

        let mut cells = Vec::new();
        let mut rounds = 0;

        for (line_no, line) in lines {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() > arms {
                return Err(DeeprouteError::config(format!(
                    "line {line_no} has {} fields, header declares {arms}",
                    fields.len()
                )));
            }
            if fields.len() < arms {
                warn!(
                    line = line_no,
                    fields = fields.len(),
                    arms, "Short reward row, padding with missing cells"
                );
            }

            cells.extend(fields.iter().map(|field| parse_cell(field)));
            cells.extend(std::iter::repeat(None).take(arms - fields.len()));
            rounds += 1;
        }

        debug!(rounds, arms, "Parsed reward table");

        Ok(Self {
            arm_names,
            cells,
            rounds,
        })
    }

    /// Load a CSV reward table from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_csv_str(&text)
    }

    /// Generate a 0/1 table where arm `i` pays 1 with probability `probabilities[i]`.
    pub fn bernoulli(rounds: usize, probabilities: &[f64], seed: u64) -> Result<Self> {
        if let Some(p) = probabilities.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(DeeprouteError::config(format!(
                "reward probability {p} is outside [0, 1]"
            )));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut cells = Vec::with_capacity(rounds * probabilities.len());
        for _ in 0..rounds {
            for &p in probabilities {
                cells.push(Some(if rng.gen_bool(p) { 1.0 } else { 0.0 }));
            }
        }

        Ok(Self {
            arm_names: default_arm_names(probabilities.len()),
            cells,
            rounds,
        })
    }

    /// Number of rounds (rows)
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Number of arms (columns)
    pub fn arms(&self) -> usize {
        self.arm_names.len()
    }

    pub fn arm_names(&self) -> &[String] {
        &self.arm_names
    }

    /// Look up the reward for `arm` at `round` (both 0-indexed)
    pub fn reward(&self, round: usize, arm: usize) -> Result<f64> {
        if round >= self.rounds || arm >= self.arms() {
            return Err(DeeprouteError::config(format!(
                "cell ({round}, {arm}) is outside a {}x{} reward table",
                self.rounds,
                self.arms()
            )));
        }
        self.cells[round * self.arms() + arm].ok_or(DeeprouteError::Data { round, arm })
    }

    /// Sum of the first `rounds` cells of one arm's column
    pub fn column_total(&self, arm: usize, rounds: usize) -> Result<f64> {
        (0..rounds).map(|round| self.reward(round, arm)).sum()
    }

    /// Serialize back to the CSV layout accepted by [`RewardTable::from_csv_str`]
    pub fn to_csv_string(&self) -> String {
        let mut out = self.arm_names.join(",");
        out.push('\n');
        for row in self.cells.chunks(self.arms().max(1)).take(self.rounds) {
            let fields: Vec<String> = row
                .iter()
                .map(|cell| cell.map(|v| v.to_string()).unwrap_or_default())
                .collect();
            let _ = writeln!(out, "{}", fields.join(","));
        }
        out
    }

    /// Write the table as CSV
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_csv_string())?;
        Ok(())
    }
}

fn parse_cell(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn default_arm_names(arms: usize) -> Vec<String> {
    (0..arms).map(|i| format!("path_{i}")).collect()
}
