//! Workflow status step.
//!
//! Status reads a finished run's output table and checks each record's status
//! against the image artifact it should (or should not) have.
use crate::cli::StatusArgs;
use crate::dataset;
use crate::enrich::{EnrichConfig, ImageStatus, OutputPaths};
use anyhow::{Context, Result};
use serde::Serialize;

/// Record whose status disagrees with the artifacts on disk.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct StatusMismatch {
    pub row: usize,
    pub name: String,
    pub status: String,
    pub image_present: bool,
}

/// Summary of an output directory.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub table: String,
    pub rows: usize,
    pub found: usize,
    pub not_found: usize,
    pub details_present: usize,
    pub mismatches: Vec<StatusMismatch>,
}

/// Build a status report without side effects.
pub fn status_report(config: &EnrichConfig) -> Result<StatusReport> {
    let paths = OutputPaths::new(config.out_dir.clone());
    let table_path = paths.table_path();
    let rows = dataset::read_output(&table_path, &config.columns)?;

    let mut report = StatusReport {
        table: table_path.display().to_string(),
        rows: rows.len(),
        found: 0,
        not_found: 0,
        details_present: 0,
        mismatches: Vec::new(),
    };
    for row in rows {
        let image_present = paths.image_path(row.position).is_file();
        if paths.details_path(row.position).is_file() {
            report.details_present += 1;
        }
        match row.status {
            ImageStatus::Found => report.found += 1,
            ImageStatus::NotFound => report.not_found += 1,
        }
        if image_present != (row.status == ImageStatus::Found) {
            report.mismatches.push(StatusMismatch {
                row: row.position,
                name: row.name,
                status: row.status.as_str().to_string(),
                image_present,
            });
        }
    }
    Ok(report)
}

/// Run the status step and print text or JSON.
pub fn run_status(args: &StatusArgs) -> Result<()> {
    let mut config = super::resolve_config(args.config.as_deref())?;
    if let Some(out_dir) = &args.out_dir {
        config.out_dir = out_dir.clone();
    }
    let report = status_report(&config)?;

    if args.json {
        let text = serde_json::to_string_pretty(&report).context("serialize status report")?;
        println!("{text}");
        return Ok(());
    }

    println!("table: {}", report.table);
    println!(
        "rows: {} (with image: {}, without: {}, details saved: {})",
        report.rows, report.found, report.not_found, report.details_present
    );
    if report.mismatches.is_empty() {
        println!("artifacts: consistent");
    } else {
        println!("artifacts: {} mismatched", report.mismatches.len());
        for mismatch in &report.mismatches {
            let note = if mismatch.image_present {
                "image present but status"
            } else {
                "image missing but status"
            };
            println!(
                "  row {} {:?}: {note} {}",
                mismatch.row, mismatch.name, mismatch.status
            );
        }
    }
    Ok(())
}
