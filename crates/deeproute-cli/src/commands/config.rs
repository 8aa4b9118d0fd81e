//! Configuration management commands

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::settings::{Settings, CONFIG_FILE_NAME};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a configuration file with default values
    Init {
        /// Destination (defaults to ./deeproute.toml)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

pub fn run(cmd: ConfigCommands, settings: &Settings) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(settings),
        ConfigCommands::Init { path, force } => {
            init(&path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME)), force)
        }
    }
}

fn show(settings: &Settings) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    match &settings.source {
        Some(path) => println!("Config file: {}\n", path.display()),
        None => println!("No configuration file found. Using defaults.\n"),
    }
    print!("{}", settings.to_toml()?);

    Ok(())
}

fn init(path: &std::path::Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!("Configuration file already exists: {}", path.display());
        println!("Use --force to overwrite");
        return Ok(());
    }

    std::fs::write(path, Settings::default().to_toml()?)?;
    println!("Configuration file created: {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        init(&path, false).unwrap();
        let loaded = Settings::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded.run.policy, "ucb");
        assert_eq!(loaded.bandit.ucb_exploration, 1.5);
    }

    #[test]
    fn test_init_does_not_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[run]\npolicy = \"random\"\n").unwrap();

        init(&path, false).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("random"));

        init(&path, true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("ucb"));
    }
}
