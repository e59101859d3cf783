// Ranked results on disk.
//
// `json` writes the whole report as one pretty-printed object; `jsonl`
// writes one result per line in rank order. Either way the file is replaced,
// so re-running a screen never mixes results from two runs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::pipeline::ScreeningReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed report object
    Json,
    /// One result object per line
    Jsonl,
}

/// Write `report` to `path`, creating parent directories as needed.
pub fn write_report(report: &ScreeningReport, path: &Path, format: OutputFormat) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, report)?;
            writeln!(writer)?;
        }
        OutputFormat::Jsonl => {
            for result in &report.results {
                serde_json::to_writer(&mut writer, result)?;
                writeln!(writer)?;
            }
        }
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        path = %path.display(),
        format = ?format,
        results = report.results.len(),
        "Report written"
    );
    Ok(())
}
