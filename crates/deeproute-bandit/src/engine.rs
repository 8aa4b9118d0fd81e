//! Bandit loop - plays a policy against a reward table round by round

use serde::Serialize;
use tracing::{debug, info};

use deeproute_core::{DeeprouteError, Result, RewardTable};

use crate::policy::SelectionPolicy;
use crate::report::RunReport;
use crate::stats::ArmStats;

/// Outcome of a single round
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Selection {
    pub round: usize,
    pub arm: usize,
    pub reward: f64,
}

/// Sequential decision loop over a fixed number of rounds and arms.
///
/// All dimension checks happen in [`BanditLoop::new`]; after that only a
/// missing reward cell can fail a step.
pub struct BanditLoop<'a> {
    table: &'a RewardTable,
    policy: Box<dyn SelectionPolicy>,
    rounds: usize,
    arms: usize,
    round: usize,
    selections: Vec<usize>,
    total_reward: f64,
}

impl<'a> BanditLoop<'a> {
    /// Validate dimensions and prepare a run of `rounds` rounds over the first `arms` columns
    pub fn new(
        table: &'a RewardTable,
        policy: Box<dyn SelectionPolicy>,
        rounds: usize,
        arms: usize,
    ) -> Result<Self> {
        if rounds == 0 {
            return Err(DeeprouteError::config("round count must be at least 1"));
        }
        if arms == 0 {
            return Err(DeeprouteError::config("arm count must be at least 1"));
        }
        if table.rounds() < rounds {
            return Err(DeeprouteError::config(format!(
                "reward table has {} rounds, {rounds} requested",
                table.rounds()
            )));
        }
        if table.arms() < arms {
            return Err(DeeprouteError::config(format!(
                "reward table has {} arms, {arms} requested",
                table.arms()
            )));
        }

        Ok(Self {
            table,
            policy,
            rounds,
            arms,
            round: 0,
            selections: Vec::with_capacity(rounds),
            total_reward: 0.0,
        })
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn arms(&self) -> usize {
        self.arms
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    /// Rounds played so far
    pub fn rounds_played(&self) -> usize {
        self.round
    }

    pub fn is_finished(&self) -> bool {
        self.round >= self.rounds
    }

    /// Selection log so far
    pub fn selections(&self) -> &[usize] {
        &self.selections
    }

    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    /// Fresh statistics sized for this loop
    pub fn new_stats(&self) -> ArmStats {
        ArmStats::new(self.arms)
    }

    /// Play one round: select, look up the reward, record it.
    ///
    /// Nothing is recorded when the lookup fails.
    pub fn step(&mut self, stats: &mut ArmStats) -> Result<Selection> {
        if self.is_finished() {
            return Err(DeeprouteError::config(format!(
                "run already finished after {} rounds",
                self.rounds
            )));
        }
        if stats.arms() != self.arms {
            return Err(DeeprouteError::config(format!(
                "statistics cover {} arms, loop has {}",
                stats.arms(),
                self.arms
            )));
        }

        let round = self.round;
        let arm = self.policy.select(round, stats);
        if arm >= self.arms {
            return Err(DeeprouteError::config(format!(
                "policy {} selected arm {arm} of {}",
                self.policy.name(),
                self.arms
            )));
        }

        let reward = self.table.reward(round, arm)?;

        self.selections.push(arm);
        stats.record(arm, reward);
        self.total_reward += reward;
        self.round += 1;

        debug!(round, arm, reward, "Selected arm");

        Ok(Selection { round, arm, reward })
    }

    /// Consume a finished loop into its report
    pub fn finish(self, stats: &ArmStats) -> Result<RunReport> {
        if !self.is_finished() {
            return Err(DeeprouteError::config(format!(
                "run stopped after {} of {} rounds",
                self.round, self.rounds
            )));
        }

        Ok(RunReport {
            policy: self.policy.name().to_string(),
            params: self.policy.params(),
            rounds: self.rounds,
            arms: self.arms,
            selections: self.selections,
            arm_stats: stats.summaries(),
            total_reward: self.total_reward,
            regret: None,
        })
    }
}

/// Run `policy` for `rounds` rounds over the first `arms` columns of `table`
pub fn run(
    table: &RewardTable,
    policy: Box<dyn SelectionPolicy>,
    rounds: usize,
    arms: usize,
) -> Result<RunReport> {
    let mut bandit = BanditLoop::new(table, policy, rounds, arms)?;
    let mut stats = bandit.new_stats();

    info!(
        policy = bandit.policy_name(),
        rounds, arms, "Starting bandit run"
    );

    while !bandit.is_finished() {
        bandit.step(&mut stats)?;
    }

    let report = bandit.finish(&stats)?;

    info!(
        policy = %report.policy,
        total_reward = report.total_reward,
        "Bandit run complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Ucb, UniformRandom};

    fn identity(k: usize) -> RewardTable {
        let rows = (0..k)
            .map(|r| (0..k).map(|a| if a == r { 1.0 } else { 0.0 }).collect())
            .collect();
        RewardTable::from_rows(rows).unwrap()
    }

    #[test]
    fn test_rejects_zero_rounds_and_arms() {
        let table = identity(4);
        let err = BanditLoop::new(&table, Box::new(Ucb::default()), 0, 4).err().unwrap();
        assert!(err.is_config());
        let err = BanditLoop::new(&table, Box::new(Ucb::default()), 4, 0).err().unwrap();
        assert!(err.is_config());
    }

    #[test]
    fn test_rejects_table_too_small() {
        let table = identity(4);
        assert!(BanditLoop::new(&table, Box::new(Ucb::default()), 5, 4).is_err());
        assert!(BanditLoop::new(&table, Box::new(Ucb::default()), 4, 5).is_err());
        assert!(BanditLoop::new(&table, Box::new(Ucb::default()), 3, 2).is_ok());
    }

    #[test]
    fn test_step_records_into_stats() {
        let table = identity(4);
        let mut bandit = BanditLoop::new(&table, Box::new(Ucb::default()), 4, 4).unwrap();
        let mut stats = bandit.new_stats();

        let first = bandit.step(&mut stats).unwrap();
        assert_eq!(first, Selection { round: 0, arm: 0, reward: 1.0 });
        assert_eq!(stats.selections(0), 1);
        assert_eq!(bandit.rounds_played(), 1);
        assert_eq!(bandit.selections(), &[0]);
        assert_eq!(bandit.total_reward(), 1.0);
    }

    #[test]
    fn test_step_rejects_mismatched_stats() {
        let table = identity(4);
        let mut bandit = BanditLoop::new(&table, Box::new(Ucb::default()), 4, 4).unwrap();
        let mut stats = ArmStats::new(3);
        assert!(bandit.step(&mut stats).unwrap_err().is_config());
        assert_eq!(bandit.rounds_played(), 0);
    }

    #[test]
    fn test_step_past_end_fails() {
        let table = identity(2);
        let mut bandit = BanditLoop::new(&table, Box::new(Ucb::default()), 1, 2).unwrap();
        let mut stats = bandit.new_stats();
        bandit.step(&mut stats).unwrap();
        assert!(bandit.is_finished());
        assert!(bandit.step(&mut stats).unwrap_err().is_config());
    }

    #[test]
    fn test_finish_requires_all_rounds() {
        let table = identity(3);
        let mut bandit = BanditLoop::new(&table, Box::new(Ucb::default()), 3, 3).unwrap();
        let mut stats = bandit.new_stats();
        bandit.step(&mut stats).unwrap();
        assert!(bandit.finish(&stats).is_err());
    }

    #[test]
    fn test_missing_cell_is_data_error_without_recording() {
        let table = RewardTable::from_csv_str("a,b\n1,0\n,0\n").unwrap();
        let mut bandit = BanditLoop::new(&table, Box::new(Ucb::default()), 2, 2).unwrap();
        let mut stats = bandit.new_stats();

        bandit.step(&mut stats).unwrap();
        // Round 1: arm 1 is untried, so UCB picks it and the lookup succeeds.
        bandit.step(&mut stats).unwrap();
        assert!(bandit.is_finished());

        let mut bandit = BanditLoop::new(&table, Box::new(UniformRandom::new(0)), 2, 1).unwrap();
        let mut stats = bandit.new_stats();
        bandit.step(&mut stats).unwrap();
        let err = bandit.step(&mut stats).unwrap_err();
        assert!(matches!(err, DeeprouteError::Data { round: 1, arm: 0 }));
        assert_eq!(bandit.selections().len(), 1);
        assert_eq!(stats.total_selections(), 1);
    }

    #[test]
    fn test_run_identity_with_ucb() {
        let table = identity(4);
        let report = run(&table, Box::new(Ucb::default()), 4, 4).unwrap();
        assert_eq!(report.selections, vec![0, 1, 2, 3]);
        assert_eq!(report.total_reward, 4.0);
        assert_eq!(report.policy, "ucb");
    }

    struct OutOfRange;

    impl SelectionPolicy for OutOfRange {
        fn name(&self) -> &str {
            "out-of-range"
        }
        fn select(&mut self, _round: usize, stats: &ArmStats) -> usize {
            stats.arms()
        }
        fn params(&self) -> serde_json::Value {
            serde_json::Value::Null
        }
    }

    #[test]
    fn test_policy_out_of_range_arm_is_rejected() {
        let table = identity(2);
        let err = run(&table, Box::new(OutOfRange), 2, 2).unwrap_err();
        assert!(err.is_config());
    }
}
