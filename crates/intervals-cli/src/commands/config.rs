use std::path::Path;

use clap::Subcommand;
use intervals_core::error::Result;
use intervals_core::WidgetConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Dot-separated key (e.g. "work_secs", "tones.rest_hz")
        key: String,
    },
    /// Print the effective configuration as TOML
    Show,
    /// Print where the default config file is looked up
    Path,
}

pub fn run(action: ConfigAction, config_path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = WidgetConfig::load(config_path)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Show => {
            let config = WidgetConfig::load(config_path)?;
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => match WidgetConfig::default_path() {
            Some(path) => println!("{}", path.display()),
            None => {
                eprintln!("no config directory on this platform");
                std::process::exit(1);
            }
        },
    }
    Ok(())
}
