//! Consignee CSV commands: run the importer on a local file or write the
//! blank template. Neither touches the database.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use tenderdb_core::{generate_template, import_locations, ImportResult};

/// Sub-commands available under `consignees`.
#[derive(Debug, Subcommand)]
pub enum ConsigneeCommands {
    /// Parse a consignee CSV and print the locations and warnings
    Import {
        /// Path to the CSV file
        file: PathBuf,
        /// Print the result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Write the blank import template
    Template {
        /// Destination file; stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

pub(crate) fn run(command: ConsigneeCommands) -> anyhow::Result<()> {
    match command {
        ConsigneeCommands::Import { file, json } => {
            let result = import_file(&file)?;
            print!("{}", render_import(&result, json)?);
        }
        ConsigneeCommands::Template { output } => write_template(output.as_deref())?,
    }
    Ok(())
}

fn import_file(path: &Path) -> anyhow::Result<ImportResult> {
    let raw = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let result =
        import_locations(&raw).with_context(|| format!("parsing {}", path.display()))?;
    tracing::info!(
        file = %path.display(),
        locations = result.locations.len(),
        "consignee file parsed"
    );
    Ok(result)
}

fn write_template(output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, generate_template())
                .with_context(|| format!("writing {}", path.display()))?;
            println!("wrote template to {}", path.display());
        }
        None => print!("{}", String::from_utf8_lossy(generate_template())),
    }
    Ok(())
}

fn render_import(result: &ImportResult, json: bool) -> anyhow::Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(result)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    if result.locations.is_empty() {
        out.push_str("no locations found\n");
    } else {
        writeln!(
            out,
            "{:<5}{:<20}{:<20}{:<30}{:<20}{:<15}EMAIL",
            "SR", "DISTRICT", "BLOCK", "FACILITY", "CONTACT", "PHONE"
        )?;
        for loc in &result.locations {
            writeln!(
                out,
                "{:<5}{:<20}{:<20}{:<30}{:<20}{:<15}{}",
                loc.serial_number,
                loc.district_name,
                loc.block_name,
                loc.facility_name,
                loc.contact_name,
                loc.contact_phone,
                loc.contact_email
            )?;
        }
    }

    if let Some(warnings) = &result.warnings {
        writeln!(out, "\n{} warning(s):", result.warning_count())?;
        for warning in warnings {
            writeln!(out, "  {warning}")?;
        }
    }

    Ok(out)
}
