//! Config command implementations.

use super::emit;
use crate::cli::ConfigCommands;
use crate::config::{
    DashboardConfig, config_path, load_config, mask_secret, resolve_ai_config, save_config,
};
use crate::error::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct AiView {
    provider: &'static str,
    model: Option<String>,
    endpoint: Option<String>,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct ConfigView {
    path: PathBuf,
    file: DashboardConfig,
    ai: AiView,
}

/// Execute config commands.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or written, or the
/// key or value is invalid.
pub fn execute(command: &ConfigCommands, json: bool) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = load_config()?;
            let ai = resolve_ai_config(&config)?;
            let view = ConfigView {
                path: config_path()?,
                file: config.redacted(),
                ai: AiView {
                    provider: ai.provider.as_str(),
                    model: ai.model,
                    endpoint: ai.endpoint,
                    api_key: ai.api_key.as_deref().map(mask_secret),
                },
            };
            emit(view, json, print_view)
        }
        ConfigCommands::Set { key, value } => {
            let mut config = load_config()?;
            config.set(key, value)?;
            let path = save_config(&config)?;
            emit(path, json, |p| {
                println!("{} Set {key} in {}", "✓".green(), p.display());
            })
        }
    }
}

fn print_view(view: &ConfigView) {
    let unset = || "-".dimmed().to_string();
    println!("{}", view.path.display().to_string().dimmed());
    println!(
        "  user_id:  {}",
        view.file.user_id.clone().unwrap_or_else(unset)
    );
    println!("  provider: {}", view.ai.provider);
    println!("  model:    {}", view.ai.model.clone().unwrap_or_else(unset));
    println!(
        "  endpoint: {}",
        view.ai.endpoint.clone().unwrap_or_else(unset)
    );
    println!(
        "  api_key:  {}",
        view.ai.api_key.clone().unwrap_or_else(unset)
    );
}
