// src/pipeline.rs
//! Pipeline capability traits — abstract the three stages of the export.
//!
//! Each trait describes a single capability, enabling testing each stage in isolation.

use crate::error::AppError;
use crate::export::CsvDocument;
use crate::output::DeliveryReport;
use serde_json::Value;

/// Retrieves the raw event records to export.
#[async_trait::async_trait]
pub trait RecordSource {
    async fn fetch(&self) -> Result<Vec<Value>, AppError>;
}

/// Transforms raw records into a CSV document.
pub trait CsvComposer {
    fn compose(&self, records: &[Value]) -> Result<CsvDocument, AppError>;
}

/// Delivers a rendered document to its destination.
pub trait CsvDelivery {
    fn deliver(&self, document: &CsvDocument) -> Result<DeliveryReport, AppError>;
}
