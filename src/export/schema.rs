//! Column selection for one export batch.

use super::flatten::FlatRow;
use indexmap::IndexMap;
use std::fmt;

/// How the batch-wide column list is derived from heterogeneous rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SchemaPolicy {
    /// Every key seen in any row, most common first; missing cells are blank.
    #[default]
    Frequency,
    /// Only keys shared by the rows; extra keys are dropped.
    Intersection,
}

impl fmt::Display for SchemaPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frequency => write!(f, "frequency"),
            Self::Intersection => write!(f, "intersection"),
        }
    }
}

/// Ordered column names of one export batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Cells of `row` in column order, blank where the row lacks a column.
    pub fn project<'r>(&self, row: &'r FlatRow) -> Vec<&'r str> {
        self.columns
            .iter()
            .map(|col| row.get(col).unwrap_or(""))
            .collect()
    }
}

impl From<Vec<String>> for Schema {
    fn from(columns: Vec<String>) -> Self {
        Self { columns }
    }
}

/// Computes the schema of a fully flattened batch.
pub fn select_schema(rows: &[FlatRow], policy: SchemaPolicy) -> Schema {
    let columns = match policy {
        SchemaPolicy::Frequency => frequency_columns(rows),
        SchemaPolicy::Intersection => intersection_columns(rows),
    };
    Schema { columns }
}

/// Keys ranked by how many rows contain them; ties keep first-seen order.
fn frequency_columns(rows: &[FlatRow]) -> Vec<String> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for row in rows {
        for key in row.keys() {
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    // sort_by is stable, so equal counts stay in insertion order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().map(|(key, _)| key.to_string()).collect()
}

/// Running intersection in row order.
///
/// An empty running set is replaced by the next row's keys, so a row that
/// shares nothing with its predecessors restarts the accumulation at the
/// row after it.
fn intersection_columns(rows: &[FlatRow]) -> Vec<String> {
    let mut merged: Vec<&str> = Vec::new();
    for row in rows {
        merged = if merged.is_empty() {
            row.keys().collect()
        } else {
            merged.into_iter().filter(|k| row.contains_key(k)).collect()
        };
    }
    merged.into_iter().map(str::to_string).collect()
}
