//! Executes deliveries by performing actual I/O.
//!
//! This module is the only place where the CSV text touches a file or
//! stdout, keeping the rest of the codebase pure and testable.

use super::types::*;
use crate::error::AppError;
use crate::export::CsvDocument;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

/// Delivers the document to its target.
pub fn deliver(document: &CsvDocument, target: DeliveryTarget) -> Result<DeliveryReport, AppError> {
    let start_time = Instant::now();

    let bytes_written = match &target {
        DeliveryTarget::WriteFile { path } => write_file(path, document)?,
        DeliveryTarget::PrintToStdout => {
            let stdout = std::io::stdout();
            write_lines(document.lines(), stdout.lock())?
        }
    };

    let report = DeliveryReport {
        target,
        lines_written: document.lines().len(),
        bytes_written,
        duration_ms: start_time.elapsed().as_millis() as u64,
    };

    log::info!(
        "Delivered {} line(s), {} bytes in {}ms",
        report.lines_written,
        report.bytes_written,
        report.duration_ms
    );

    Ok(report)
}

/// Writes the document to a file.
fn write_file(path: &Path, document: &CsvDocument) -> Result<usize, AppError> {
    log::debug!("Writing {} bytes to {}", document.byte_len(), path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = fs::File::create(path)?;
    let written = write_lines(document.lines(), file)?;

    log::info!("Wrote file: {}", path.display());
    Ok(written)
}

/// Writes lines in order and flushes, returning the byte count.
pub fn write_lines<W: Write>(lines: &[String], writer: W) -> Result<usize, AppError> {
    let mut writer = BufWriter::new(writer);
    let mut written = 0;
    for line in lines {
        writer.write_all(line.as_bytes())?;
        written += line.len();
    }
    writer.flush()?;
    Ok(written)
}
