//! `tplcheck validate` command - Check documents against their contracts

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::cli::helpers::{count, mark_failed, mark_ok, mark_skipped, mark_warning};
use crate::cli::output::{render_rows, FileRecord, FindingRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::input::{collect_documents, load_document, Document, InputError, SourceReport};
use crate::schema::{
    lint, validate_with, ContractError, ContractKind, LintWarning, SuitePolicy, ValidationFailure,
};

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Files or directories to validate (default: current directory)
    #[arg()]
    pub paths: Vec<PathBuf>,

    /// Contract to check against (default: detected from the file name)
    #[arg(long, short = 'k')]
    pub kind: Option<ContractKind>,

    /// Strict mode - consistency warnings become errors
    #[arg(long)]
    pub strict: bool,

    /// Continue validation after first failing file
    #[arg(long)]
    pub keep_going: bool,

    /// Show summary only, don't show individual errors
    #[arg(long)]
    pub summary: bool,

    /// How suites handle failing templates (report-all, fail-fast)
    #[arg(long)]
    pub suite_policy: Option<SuitePolicy>,
}

/// Validation statistics
#[derive(Default)]
struct ValidationStats {
    files_checked: usize,
    files_passed: usize,
    files_failed: usize,
    files_skipped: usize,
    total_errors: usize,
    total_warnings: usize,
}

/// Result of checking one file
enum Outcome {
    Passed {
        contract: ContractKind,
        document: Document,
        warnings: Vec<LintWarning>,
    },
    Rejected {
        contract: ContractKind,
        document: Document,
        failure: ValidationFailure,
    },
    Unreadable {
        contract: ContractKind,
        error: InputError,
    },
}

pub fn run(args: ValidateArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let strict = args.strict || config.strict();
    let policy = args.suite_policy.unwrap_or_else(|| config.suite_policy());
    let format = global.resolved_format(config);
    let human = format == OutputFormat::Auto;
    let show_details = human && !args.summary;

    let roots = if args.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        args.paths.clone()
    };
    let files = collect_documents(&roots);

    let mut stats = ValidationStats::default();
    let mut records = Vec::new();
    let mut rows = Vec::new();

    if human && !global.quiet {
        println!(
            "{} Validating {}...\n",
            style("→").blue(),
            count(files.len(), "file")
        );
    }

    for path in &files {
        let Some(contract) = args.kind.or_else(|| ContractKind::from_path(path)) else {
            warn!(path = %path.display(), "unknown contract, skipping");
            stats.files_skipped += 1;
            if show_details {
                println!(
                    "{} {} - unknown contract (skipped)",
                    mark_skipped(),
                    path.display()
                );
            }
            continue;
        };

        stats.files_checked += 1;
        let outcome = check_file(path, contract, policy)?;
        let file = path.display().to_string();
        let failed = match &outcome {
            Outcome::Passed { warnings, .. } => strict && !warnings.is_empty(),
            Outcome::Rejected { .. } | Outcome::Unreadable { .. } => true,
        };

        match &outcome {
            Outcome::Passed { warnings, .. } => {
                info!(path = %file, warnings = warnings.len(), "passed");
                stats.total_warnings += warnings.len();
                if strict {
                    stats.total_errors += warnings.len();
                }
            }
            Outcome::Rejected { failure, .. } => {
                info!(path = %file, violations = failure.violation_count(), "rejected");
                stats.total_errors += failure.violation_count();
            }
            Outcome::Unreadable { error, .. } => {
                info!(path = %file, error = %error, "unreadable");
                stats.total_errors += 1;
            }
        }

        if failed {
            stats.files_failed += 1;
        } else {
            stats.files_passed += 1;
        }

        match format {
            OutputFormat::Auto => {
                if show_details {
                    print_outcome(path, outcome, strict, global.quiet);
                }
            }
            OutputFormat::Json | OutputFormat::Yaml => {
                let record = file_record(&file, &outcome, failed);
                if format == OutputFormat::Json {
                    println!("{}", serde_json::to_string(&record).into_diagnostic()?);
                } else {
                    records.push(serde_json::to_value(&record).into_diagnostic()?);
                }
            }
            OutputFormat::Csv | OutputFormat::Md => {
                rows.extend(finding_rows(&file, &outcome, strict));
            }
        }

        if failed && !args.keep_going {
            break;
        }
    }

    match format {
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&records).into_diagnostic()?),
        OutputFormat::Csv | OutputFormat::Md => print!("{}", render_rows(&rows, format)?),
        _ => {}
    }

    if human {
        print_summary(&stats);
    }

    if stats.files_failed > 0 {
        if stats.files_failed == 1 {
            Err(miette::miette!("Validation failed: 1 file has errors"))
        } else {
            Err(miette::miette!(
                "Validation failed: {} files have errors",
                stats.files_failed
            ))
        }
    } else {
        if human && !global.quiet {
            println!("{} All files passed validation!", style("✓").green().bold());
        }
        Ok(())
    }
}

fn check_file(path: &Path, contract: ContractKind, policy: SuitePolicy) -> Result<Outcome> {
    let document = match load_document(path) {
        Ok(document) => document,
        Err(error) => return Ok(Outcome::Unreadable { contract, error }),
    };

    match validate_with(contract, &document.value, policy) {
        Ok(normalized) => {
            let warnings = lint(&normalized);
            for warning in &warnings {
                warn!(path = %path.display(), finding = %warning, "consistency warning");
            }
            Ok(Outcome::Passed {
                contract,
                document,
                warnings,
            })
        }
        Err(ContractError::Invalid(failure)) => Ok(Outcome::Rejected {
            contract,
            document,
            failure,
        }),
        Err(internal) => Err(miette::Report::new(internal)),
    }
}

fn print_outcome(path: &Path, outcome: Outcome, strict: bool, quiet: bool) {
    match outcome {
        Outcome::Passed { warnings, .. } if warnings.is_empty() => {
            if !quiet {
                println!("{} {}", mark_ok(), path.display());
            }
        }
        Outcome::Passed {
            document, warnings, ..
        } => {
            let mark = if strict { mark_failed() } else { mark_warning() };
            println!(
                "{} {} - {}",
                mark,
                path.display(),
                count(warnings.len(), "consistency warning")
            );
            let report = SourceReport::from_warnings(&warnings, &document.source, &document.name());
            println!("{:?}", miette::Report::new(report));
        }
        Outcome::Rejected {
            document, failure, ..
        } => {
            println!(
                "{} {} - {}",
                mark_failed(),
                path.display(),
                count(failure.violation_count(), "error")
            );
            let report = SourceReport::from_failure(&failure, &document.source, &document.name());
            println!("{:?}", miette::Report::new(report));
        }
        Outcome::Unreadable { error, .. } => {
            println!("{} {} - unreadable", mark_failed(), path.display());
            println!("{:?}", miette::Report::new(error));
        }
    }
}

fn file_record<'a>(file: &str, outcome: &'a Outcome, failed: bool) -> FileRecord<'a> {
    match outcome {
        Outcome::Passed {
            contract, warnings, ..
        } => FileRecord {
            path: file.to_string(),
            contract: Some(*contract),
            valid: !failed,
            error: None,
            violations: &[],
            warnings,
        },
        Outcome::Rejected {
            contract, failure, ..
        } => FileRecord {
            path: file.to_string(),
            contract: Some(*contract),
            valid: false,
            error: Some(failure.to_string()),
            violations: failure.violations(),
            warnings: &[],
        },
        Outcome::Unreadable { contract, error } => FileRecord {
            path: file.to_string(),
            contract: Some(*contract),
            valid: false,
            error: Some(error.to_string()),
            violations: &[],
            warnings: &[],
        },
    }
}

fn finding_rows(file: &str, outcome: &Outcome, strict: bool) -> Vec<FindingRow> {
    match outcome {
        Outcome::Passed { warnings, .. } => FindingRow::warnings(file, warnings, strict),
        Outcome::Rejected { failure, .. } => FindingRow::errors(file, failure),
        Outcome::Unreadable { error, .. } => vec![FindingRow {
            file: file.to_string(),
            severity: "error",
            path: String::new(),
            kind: "unreadable".to_string(),
            message: error.to_string(),
        }],
    }
}

fn print_summary(stats: &ValidationStats) {
    println!();
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", style("Validation Summary").bold());
    println!("{}", style("─".repeat(60)).dim());
    println!("  Files checked:  {}", style(stats.files_checked).cyan());
    println!("  Files passed:   {}", style(stats.files_passed).green());
    println!("  Files failed:   {}", style(stats.files_failed).red());
    println!("  Total errors:   {}", style(stats.total_errors).red());

    if stats.total_warnings > 0 {
        println!("  Total warnings: {}", style(stats.total_warnings).yellow());
    }
    if stats.files_skipped > 0 {
        println!("  Files skipped:  {}", style(stats.files_skipped).yellow());
    }
    println!();
}
