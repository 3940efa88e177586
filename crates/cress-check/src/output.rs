//! Helpers for rendering check reports.

use std::io::Write;

use eyre::{Context, Result};
use serde::Serialize;

use crate::report::{Diagnostic, FileReport, ScenarioSummary};

/// Report format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per file, followed by a summary.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files: &'a [FileReport],
    checked: usize,
    failed: usize,
}

/// Write `reports` in `format`.
///
/// # Errors
///
/// Returns an error if writing or serialisation fails.
pub fn write_reports(
    writer: &mut dyn Write,
    reports: &[FileReport],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(writer, reports),
        OutputFormat::Json => write_json(writer, reports),
    }
}

fn failed(reports: &[FileReport]) -> usize {
    reports.iter().filter(|report| !report.is_ok()).count()
}

fn write_json(writer: &mut dyn Write, reports: &[FileReport]) -> Result<()> {
    let report = JsonReport {
        files: reports,
        checked: reports.len(),
        failed: failed(reports),
    };
    serde_json::to_writer_pretty(&mut *writer, &report)
        .wrap_err("failed to serialize check report to JSON")?;
    writer
        .write_all(b"\n")
        .wrap_err("failed to terminate JSON output with newline")
}

fn write_text(writer: &mut dyn Write, reports: &[FileReport]) -> Result<()> {
    for report in reports {
        write_file(writer, report)?;
    }
    writeln!(
        writer,
        "{} checked, {} failed",
        plural(reports.len(), "file"),
        failed(reports)
    )
    .wrap_err("failed to write check summary")
}

fn write_file(writer: &mut dyn Write, report: &FileReport) -> Result<()> {
    let path = report.path.display();
    if let Some(error) = &report.error {
        return write_diagnostic(writer, &path.to_string(), "error", error);
    }
    if let Some(feature) = &report.feature {
        let examples: usize = feature.scenarios.iter().map(|s| s.example_count).sum();
        writeln!(
            writer,
            "{path}: ok: {} ({}, {})",
            feature.name,
            plural(feature.scenarios.len(), "scenario"),
            plural(examples, "example"),
        )
        .wrap_err_with(|| format!("failed to write report for {path}"))?;
        for scenario in &feature.scenarios {
            write_examples(writer, scenario)?;
        }
    }
    for warning in &report.warnings {
        write_diagnostic(writer, &path.to_string(), "warning", warning)?;
    }
    Ok(())
}

fn write_diagnostic(
    writer: &mut dyn Write,
    path: &str,
    level: &str,
    diagnostic: &Diagnostic,
) -> Result<()> {
    let position = match (diagnostic.line, diagnostic.column) {
        (Some(line), Some(column)) => format!("{path}:{line}:{column}"),
        (Some(line), None) => format!("{path}:{line}"),
        _ => path.to_owned(),
    };
    writeln!(writer, "{position}: {level}: {}", diagnostic.message)
        .wrap_err_with(|| format!("failed to write {level} for {path}"))?;
    if let Some(source) = &diagnostic.source {
        writeln!(writer, "    {source}")
            .wrap_err_with(|| format!("failed to write {level} source for {path}"))?;
    }
    Ok(())
}

fn write_examples(writer: &mut dyn Write, scenario: &ScenarioSummary) -> Result<()> {
    for example in &scenario.examples {
        let mut header = format!("  {}: {}", scenario.keyword, scenario.name);
        if let Some(row) = &example.row {
            let cells: Vec<String> = row
                .0
                .iter()
                .map(|(key, value)| format!("{key} = {value}"))
                .collect();
            header.push_str(&format!(" [{}]", cells.join(", ")));
        }
        writeln!(writer, "{header}")
            .wrap_err_with(|| format!("failed to write example of {}", scenario.name))?;
        for step in &example.steps {
            writeln!(writer, "    {step}")
                .wrap_err_with(|| format!("failed to write step '{step}'"))?;
        }
    }
    Ok(())
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
