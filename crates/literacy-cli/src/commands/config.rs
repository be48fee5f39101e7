use std::path::PathBuf;

use clap::Subcommand;
use literacy_core::{CoreError, LiteracyConfig};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as JSON
    Show {
        /// Config file (defaults to ~/.config/literacy-widget/config.toml)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Write the default configuration
    Init {
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show { path } => {
            let path = path.unwrap_or_else(LiteracyConfig::default_path);
            let config = LiteracyConfig::load_or_default(&path);
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Init { path } => {
            let path = path.unwrap_or_else(LiteracyConfig::default_path);
            LiteracyConfig::default()
                .save(&path)
                .map_err(CoreError::from)?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}
