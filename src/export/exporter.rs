//! Batch orchestration: flatten → select schema → encode.
//!
//! The schema needs every row, so [`CsvExporter::prepare`] is a full
//! materialization barrier. Rendering after it is lazy.

use super::encoder::encode_row;
use super::flatten::{flatten_record, FlatRow};
use super::schema::{select_schema, Schema, SchemaPolicy};
use crate::error::AppError;
use serde_json::Value;

/// A flattened key written by more than one path of the same record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCollision {
    pub record_index: usize,
    pub key: String,
}

/// Shape of one export batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub rows: usize,
    pub columns: usize,
    pub collisions: Vec<KeyCollision>,
}

/// Turns a batch of JSON records into CSV under one schema policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter {
    policy: SchemaPolicy,
}

impl CsvExporter {
    pub fn new(policy: SchemaPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SchemaPolicy {
        self.policy
    }

    /// Flattens every record and fixes the batch schema.
    pub fn prepare(&self, records: &[Value]) -> Result<PreparedExport, AppError> {
        let rows = records
            .iter()
            .enumerate()
            .map(|(index, record)| flatten_record(index, record))
            .collect::<Result<Vec<_>, _>>()?;

        let schema = select_schema(&rows, self.policy);
        log::info!(
            "Selected {} column(s) from {} row(s) using the {} schema policy",
            schema.len(),
            rows.len(),
            self.policy
        );

        Ok(PreparedExport { schema, rows })
    }

    /// Renders the whole batch into a [`CsvDocument`].
    pub fn export(&self, records: &[Value]) -> Result<CsvDocument, AppError> {
        Ok(self.prepare(records)?.into_document())
    }
}

/// Flattened rows plus their schema, ready to render.
#[derive(Debug, Clone)]
pub struct PreparedExport {
    schema: Schema,
    rows: Vec<FlatRow>,
}

impl PreparedExport {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[FlatRow] {
        &self.rows
    }

    pub fn header(&self) -> String {
        encode_row(self.schema.columns())
    }

    /// Header line, then one line per record in input order.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.header()).chain(
            self.rows
                .iter()
                .map(|row| encode_row(&self.schema.project(row))),
        )
    }

    pub fn summary(&self) -> ExportSummary {
        let collisions = self
            .rows
            .iter()
            .enumerate()
            .flat_map(|(record_index, row)| {
                row.collisions().iter().map(move |key| KeyCollision {
                    record_index,
                    key: key.clone(),
                })
            })
            .collect();

        ExportSummary {
            rows: self.rows.len(),
            columns: self.schema.len(),
            collisions,
        }
    }

    pub fn into_document(self) -> CsvDocument {
        let lines = self.lines().collect();
        CsvDocument {
            summary: self.summary(),
            lines,
        }
    }
}

/// Rendered CSV: header line first, every line `\n`-terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    lines: Vec<String>,
    summary: ExportSummary,
}

impl CsvDocument {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn summary(&self) -> &ExportSummary {
        &self.summary
    }

    pub fn byte_len(&self) -> usize {
        self.lines.iter().map(String::len).sum()
    }

    pub fn into_string(self) -> String {
        self.lines.concat()
    }
}

/// Exports records to CSV text in one call.
pub fn export_csv(records: &[Value], policy: SchemaPolicy) -> Result<String, AppError> {
    Ok(CsvExporter::new(policy).export(records)?.into_string())
}
