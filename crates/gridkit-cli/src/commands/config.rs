use std::path::Path;

use anyhow::{bail, Result};
use gridkit_cli::cli::ConfigCommands;
use gridkit_cli::config::{default_config_path, save_config, GridkitConfig};
use tracing::info;

pub fn handle(command: &ConfigCommands, path: Option<&Path>, effective: &GridkitConfig) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            print!("{}", toml::to_string_pretty(effective)?);
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let target = match path {
                Some(path) => path.to_path_buf(),
                None => default_config_path()?,
            };
            if target.exists() && !force {
                bail!(
                    "{} already exists; pass --force to overwrite",
                    target.display()
                );
            }
            save_config(&target, &GridkitConfig::default())?;
            info!("default configuration written to {}", target.display());
            Ok(())
        }
    }
}
