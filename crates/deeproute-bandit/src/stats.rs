//! Per-arm running statistics

use serde::Serialize;

use crate::report::ArmSummary;

/// Selection counts and cumulative rewards, one slot per arm.
///
/// Owned by the caller of [`BanditLoop`](crate::BanditLoop) and only mutated
/// by its `step`, so policies see a read-only view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArmStats {
    selections: Vec<u64>,
    reward_sums: Vec<f64>,
}

impl ArmStats {
    /// Zeroed statistics for `arms` arms
    pub fn new(arms: usize) -> Self {
        Self {
            selections: vec![0; arms],
            reward_sums: vec![0.0; arms],
        }
    }

    pub fn arms(&self) -> usize {
        self.selections.len()
    }

    /// Times `arm` has been selected
    pub fn selections(&self, arm: usize) -> u64 {
        self.selections[arm]
    }

    /// Cumulative reward collected by `arm`
    pub fn reward_sum(&self, arm: usize) -> f64 {
        self.reward_sums[arm]
    }

    /// Mean reward of `arm`, `None` until it has been tried
    pub fn average_reward(&self, arm: usize) -> Option<f64> {
        match self.selections[arm] {
            0 => None,
            n => Some(self.reward_sums[arm] / n as f64),
        }
    }

    pub fn total_selections(&self) -> u64 {
        self.selections.iter().sum()
    }

    /// First arm that has never been selected
    pub fn first_untried(&self) -> Option<usize> {
        self.selections.iter().position(|&n| n == 0)
    }

    pub(crate) fn record(&mut self, arm: usize, reward: f64) {
        self.selections[arm] += 1;
        self.reward_sums[arm] += reward;
    }

    pub fn summaries(&self) -> Vec<ArmSummary> {
        (0..self.arms())
            .map(|arm| ArmSummary {
                arm,
                selections: self.selections[arm],
                total_reward: self.reward_sums[arm],
                average_reward: self.average_reward(arm),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let stats = ArmStats::new(3);
        assert_eq!(stats.arms(), 3);
        assert_eq!(stats.total_selections(), 0);
        assert_eq!(stats.first_untried(), Some(0));
        assert!(stats.average_reward(2).is_none());
    }

    #[test]
    fn test_record_updates_one_arm() {
        let mut stats = ArmStats::new(3);
        stats.record(1, 0.5);
        stats.record(1, 1.5);

        assert_eq!(stats.selections(1), 2);
        assert_eq!(stats.reward_sum(1), 2.0);
        assert_eq!(stats.average_reward(1), Some(1.0));
        assert_eq!(stats.selections(0), 0);
        assert_eq!(stats.first_untried(), Some(0));
    }

    #[test]
    fn test_first_untried_none_when_all_tried() {
        let mut stats = ArmStats::new(2);
        stats.record(0, 0.0);
        stats.record(1, 0.0);
        assert_eq!(stats.first_untried(), None);
    }

    #[test]
    fn test_summaries() {
        let mut stats = ArmStats::new(2);
        stats.record(0, 3.0);
        let summaries = stats.summaries();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].selections, 1);
        assert_eq!(summaries[0].average_reward, Some(3.0));
        assert_eq!(summaries[1].average_reward, None);
    }
}
