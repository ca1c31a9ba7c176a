//! Type definitions for output delivery.

use std::path::PathBuf;

/// Where a rendered CSV document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryTarget {
    /// Write the document to a file, creating parent directories
    WriteFile { path: PathBuf },
    /// Stream the document to stdout
    PrintToStdout,
}

impl DeliveryTarget {
    /// `--save PATH` writes a file; otherwise the CSV goes to stdout.
    pub fn from_save_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::WriteFile { path },
            None => Self::PrintToStdout,
        }
    }
}

/// Result of a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub target: DeliveryTarget,
    pub lines_written: usize,
    pub bytes_written: usize,
    pub duration_ms: u64,
}
