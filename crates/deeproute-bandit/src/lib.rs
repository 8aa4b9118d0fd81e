//! deeproute Bandit - Sequential path selection over a recorded reward table
//!
//! Each round a [`SelectionPolicy`] picks one arm (network path), the arm's
//! reward for that round is read from a [`RewardTable`](deeproute_core::RewardTable),
//! and the caller-owned [`ArmStats`] are updated through [`BanditLoop::step`].

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::float_cmp)]

pub mod engine;
pub mod policy;
pub mod report;
pub mod stats;

pub use engine::{run, BanditLoop, Selection};
pub use policy::{PolicyKind, PolicyOptions, SelectionPolicy, Ucb, UniformRandom};
pub use report::{ArmSummary, Regret, RunReport};
pub use stats::ArmStats;
