//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    completions::CompletionsArgs, config::ConfigCommands, normalize::NormalizeArgs,
    schema::SchemaCommands, validate::ValidateArgs,
};
use crate::core::Config;

#[derive(Parser)]
#[command(name = "tplcheck")]
#[command(author, version, about = "Validate AI-generated email template content")]
#[command(long_about = "Checks generated templates, generation suites, blocks and edit results against their content contracts, fills in defaults, and reports every violation with its field path.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose (debug) logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

impl GlobalOpts {
    /// The requested format, falling back to the configured default when
    /// left on `auto`
    pub fn resolved_format(&self, config: &Config) -> OutputFormat {
        if self.format != OutputFormat::Auto {
            return self.format;
        }
        config
            .default_format
            .as_deref()
            .and_then(|f| OutputFormat::from_str(f, true).ok())
            .unwrap_or(OutputFormat::Auto)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate documents against their contracts
    Validate(ValidateArgs),

    /// Validate one document and print its normalized form
    Normalize(NormalizeArgs),

    /// Inspect contract schemas
    #[command(subcommand)]
    Schema(SchemaCommands),

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with diagnostics
    #[default]
    Auto,
    /// JSON (for programming)
    Json,
    /// YAML
    Yaml,
    /// CSV (one row per violation)
    Csv,
    /// Markdown tables
    Md,
}
