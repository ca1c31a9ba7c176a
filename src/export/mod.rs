//! The data-shaping core: JSON records in, CSV lines out.
//!
//! Nothing in here performs I/O. Records come from whatever produced them
//! and the rendered lines go to whatever delivers them.

pub mod encoder;
pub mod exporter;
pub mod flatten;
pub mod schema;

pub use encoder::encode_row;
pub use exporter::{export_csv, CsvDocument, CsvExporter, ExportSummary, KeyCollision, PreparedExport};
pub use flatten::{flatten, flatten_record, stringify, FlatRow};
pub use schema::{select_schema, Schema, SchemaPolicy};
