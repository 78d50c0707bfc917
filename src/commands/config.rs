//! `driftscope config` - inspect configuration

use anyhow::Result;
use colored::Colorize;

use crate::Context;
use crate::cli::ConfigCommand;
use crate::config::default_config_path;
use crate::ui;

pub fn run(ctx: &Context, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show(ctx),
        ConfigCommand::Path => {
            println!("{}", default_config_path()?.display());
            Ok(())
        }
    }
}

fn show(ctx: &Context) -> Result<()> {
    ui::header("Configuration");

    let path = match &ctx.config_path {
        Some(explicit) => explicit.clone(),
        None => default_config_path()?,
    };
    ui::kv("File", &path.display().to_string());
    if path.exists() {
        ui::kv("Status", &"loaded".green().to_string());
    } else {
        ui::kv("Status", &"not found, using defaults".yellow().to_string());
    }

    ui::section("Effective settings");
    for line in ctx.config.to_toml()?.lines() {
        println!("  {line}");
    }
    Ok(())
}
