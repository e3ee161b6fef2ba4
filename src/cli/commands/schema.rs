//! Schema introspection
//!
//! Prints the contract definitions so generation prompts and downstream
//! tooling can see the expected shapes without reading the source.

use clap::Subcommand;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{format_default, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::schema::registry::SchemaBody;
use crate::schema::{json_schema, ContractKind, FieldShape};

#[derive(Subcommand, Debug)]
pub enum SchemaCommands {
    /// List all contracts
    List,

    /// Show the fields of one contract
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Contract (block, template, suite, edit)
    pub kind: ContractKind,

    /// Print the exported JSON Schema instead of a field summary
    #[arg(long)]
    pub raw: bool,
}

pub fn run(cmd: SchemaCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        SchemaCommands::List => list_schemas(),
        SchemaCommands::Show(args) => {
            if args.raw || global.format == OutputFormat::Json {
                let schema = json_schema(args.kind);
                println!("{}", serde_json::to_string_pretty(&schema).into_diagnostic()?);
                Ok(())
            } else {
                show_schema(args.kind);
                Ok(())
            }
        }
    }
}

fn list_schemas() -> Result<()> {
    println!("Available contracts:\n");
    println!("{:<10} {:<22} DESCRIPTION", "KIND", "TITLE");
    println!("{}", "-".repeat(76));

    for kind in ContractKind::all() {
        let schema = kind.schema();
        println!(
            "{:<10} {:<22} {}",
            kind.as_str(),
            schema.title,
            truncate_str(schema.description, 42)
        );
    }

    println!("\nUse 'tplcheck schema show <kind>' for field details");
    Ok(())
}

fn show_schema(kind: ContractKind) {
    let schema = kind.schema();
    println!("{}", schema.title);
    println!("{}", "=".repeat(schema.title.len()));
    println!("{}\n", schema.description);

    if let SchemaBody::ListOf(item) = schema.body {
        println!("A list of {} values (may be empty).", item);
        println!("\nUse 'tplcheck schema show {}' for item fields", item);
        return;
    }

    println!("Fields:");
    println!(
        "{:<18} {:<10} {:<5} {:<15} DESCRIPTION",
        "NAME", "TYPE", "REQ", "DEFAULT"
    );
    println!("{}", "-".repeat(80));

    for field in schema.fields() {
        println!(
            "{:<18} {:<10} {:<5} {:<15} {}",
            field.name,
            field.shape.label(),
            if field.is_required() { "yes" } else { "" },
            format_default(field.default_value().as_ref()),
            truncate_str(field.description, 36)
        );
    }

    let enums: Vec<_> = schema
        .fields()
        .iter()
        .filter_map(|field| match field.shape {
            FieldShape::OneOf(values) => Some((field.name, values)),
            _ => None,
        })
        .collect();

    if !enums.is_empty() {
        println!("\nEnum values:");
        for (name, values) in enums {
            println!("  {}: {}", name, values.join(", "));
        }
    }
}
