//! `tplcheck config` command - Inspect configuration

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::{find_project_config, PROJECT_CONFIG_FILE};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

pub fn run(cmd: ConfigCommands, global: &GlobalOpts, config: &Config) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global, config),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    if let Some(key) = &args.key {
        if !Config::KEYS.iter().any(|(k, _)| *k == key.as_str()) {
            return Err(miette::miette!(
                help = "Run 'tplcheck config keys' to list valid keys",
                "Unknown config key '{}'",
                key
            ));
        }
        return match config.get(key) {
            Some(value) => {
                println!("{}", value);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(config).into_diagnostic()?);
        }
        _ => {
            println!("{}", style("Effective Configuration").bold().underlined());
            println!();
            for (key, _) in Config::KEYS {
                print_config_value(key, config.get(key).as_deref());
            }

            println!();
            println!("{}", style("Config Sources (in priority order):").dim());
            println!("  1. Environment variables (TPLCHECK_FORMAT, TPLCHECK_SUITE_POLICY, TPLCHECK_STRICT, TPLCHECK_LOG)");
            println!("  2. Project config ({})", PROJECT_CONFIG_FILE);
            println!("  3. Global config (~/.config/tplcheck/config.yaml)");
        }
    }

    Ok(())
}

fn print_config_value(key: &str, value: Option<&str>) {
    match value {
        Some(v) => println!("  {} = {}", style(key).cyan(), v),
        None => println!("  {} = {}", style(key).cyan(), style("(not set)").dim()),
    }
}

fn run_path() -> Result<()> {
    println!("{}", style("Configuration file paths:").bold());
    println!();

    match Config::global_config_path() {
        Some(path) => {
            println!("  {} {}", style("Global:").cyan(), path.display());
            if path.exists() {
                println!("          {}", style("(exists)").green());
            } else {
                println!("          {}", style("(not created)").dim());
            }
        }
        None => println!("  {} {}", style("Global:").cyan(), style("(no home directory)").dim()),
    }

    let project = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_project_config(&cwd));
    match project {
        Some(path) => println!("  {} {}", style("Project:").cyan(), path.display()),
        None => println!(
            "  {} {}",
            style("Project:").cyan(),
            style(format!("(no {} found)", PROJECT_CONFIG_FILE)).dim()
        ),
    }

    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();
    for (key, description) in Config::KEYS {
        println!("  {:<16} {}", style(key).cyan(), description);
    }
    Ok(())
}
