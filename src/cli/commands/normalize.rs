//! `tplcheck normalize` command - Print the normalized form of a document

use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::output::{Envelope, FailureBody};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::input::{load_document, SourceReport};
use crate::schema::{validate_with, ContractError, ContractKind, SuitePolicy};

#[derive(clap::Args, Debug)]
pub struct NormalizeArgs {
    /// Document to normalize
    pub path: PathBuf,

    /// Contract to check against (default: detected from the file name)
    #[arg(long, short = 'k')]
    pub kind: Option<ContractKind>,

    /// Wrap the value in a success envelope
    #[arg(long)]
    pub envelope: bool,

    /// How suites handle failing templates (report-all, fail-fast)
    #[arg(long)]
    pub suite_policy: Option<SuitePolicy>,
}

pub fn run(args: NormalizeArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let contract = args
        .kind
        .or_else(|| ContractKind::from_path(&args.path))
        .ok_or_else(|| {
            miette::miette!(
                help = "Pass --kind block|template|suite|edit",
                "Cannot tell which contract {} follows",
                args.path.display()
            )
        })?;
    let policy = args.suite_policy.unwrap_or_else(|| config.suite_policy());
    let format = global.resolved_format(config);

    let document = load_document(&args.path).map_err(miette::Report::new)?;

    let normalized = match validate_with(contract, &document.value, policy) {
        Ok(normalized) => normalized,
        Err(ContractError::Invalid(failure)) => {
            if format == OutputFormat::Json {
                let body = FailureBody::from_failure(&failure);
                println!("{}", serde_json::to_string_pretty(&body).into_diagnostic()?);
                return Err(miette::miette!("{}", failure));
            }
            let report = SourceReport::from_failure(&failure, &document.source, &document.name());
            return Err(miette::Report::new(report));
        }
        Err(internal) => return Err(miette::Report::new(internal)),
    };

    let output = if args.envelope {
        serde_json::to_value(Envelope::success(&normalized, "Successful")).into_diagnostic()?
    } else {
        serde_json::to_value(&normalized).into_diagnostic()?
    };

    match format {
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&output).into_diagnostic()?),
        _ => println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?),
    }

    Ok(())
}
