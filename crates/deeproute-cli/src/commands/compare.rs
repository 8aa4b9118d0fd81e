//! Run every policy on the same table and compare

use anyhow::{Context, Result};
use clap::Args;

use deeproute_bandit::PolicyKind;

use super::{prepare, regret_or_warn, TableArgs};
use crate::settings::Settings;

#[derive(Args, Debug)]
pub struct CompareArgs {
    #[command(flatten)]
    pub table: TableArgs,
}

pub fn run(args: CompareArgs, mut settings: Settings) -> Result<()> {
    args.table.apply(&mut settings);
    let prepared = prepare(&settings)?;
    let options = settings.policy_options();

    println!(
        "Reward table: {} ({} rounds x {} paths)",
        prepared.path.display(),
        prepared.rounds,
        prepared.arms
    );
    println!();
    println!(
        "{:<16} {:>12} {:>10} {:>12} {:>10}",
        "POLICY", "TOTAL", "AVG", "REGRET", "TOP PATH"
    );
    println!("{}", "-".repeat(64));

    for kind in PolicyKind::ALL {
        let policy = kind.build(&options)?;
        let report = deeproute_bandit::run(&prepared.table, policy, prepared.rounds, prepared.arms)
            .with_context(|| format!("{kind} run failed"))?;

        let regret = regret_or_warn(&report, &prepared.table)
            .map(|r| format!("{:.2}", r.regret))
            .unwrap_or_else(|| "-".to_string());

        let counts = report.selection_counts();
        let top = counts
            .iter()
            .enumerate()
            .fold(0, |best, (arm, &n)| if n > counts[best] { arm } else { best });

        println!(
            "{:<16} {:>12.2} {:>10.4} {:>12} {:>10}",
            kind.as_str(),
            report.total_reward,
            report.average_reward(),
            regret,
            top
        );
    }

    Ok(())
}
