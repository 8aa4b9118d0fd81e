//! Run a single policy against a reward table

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use deeproute_bandit::{PolicyKind, RunReport};

use super::{prepare, regret_or_warn, TableArgs};
use crate::settings::Settings;

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Selection policy: ucb or uniform-random
    #[arg(short, long)]
    pub policy: Option<String>,

    /// Print the full report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Width of the longest histogram bar
    #[arg(long, default_value_t = 40)]
    pub width: usize,
}

pub fn run(args: RunArgs, mut settings: Settings) -> Result<()> {
    args.table.apply(&mut settings);
    if let Some(policy) = args.policy {
        settings.run.policy = policy;
    }

    let kind: PolicyKind = settings.run.policy.parse()?;
    let policy = kind.build(&settings.policy_options())?;
    let prepared = prepare(&settings)?;

    let mut report =
        deeproute_bandit::run(&prepared.table, policy, prepared.rounds, prepared.arms)
            .with_context(|| format!("{kind} run failed"))?;
    report.regret = regret_or_warn(&report, &prepared.table);

    if args.json {
        info!(path = %prepared.path.display(), "Reward table");
        println!("{}", report.to_json_pretty()?);
        return Ok(());
    }

    println!("Reward table: {}", prepared.path.display());
    print_summary(&report);
    println!();
    println!("Path selections");
    println!("===============");
    print!("{}", report.render_histogram(args.width));

    Ok(())
}

fn print_summary(report: &RunReport) {
    println!("Policy:       {} {}", report.policy, report.params);
    println!("Rounds:       {}", report.rounds);
    println!("Paths:        {}", report.arms);
    println!(
        "Total reward: {} (avg {:.4} per round)",
        report.total_reward,
        report.average_reward()
    );
    if let Some(regret) = &report.regret {
        println!(
            "Best path:    {} (total {}), regret {}",
            regret.best_arm, regret.best_total, regret.regret
        );
    }
}
