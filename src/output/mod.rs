// src/output/mod.rs
//! Output handling with clear separation of rendering and delivery.
//!
//! The export core produces a finished `CsvDocument`; this module decides
//! nothing about its content and only moves the bytes.

mod types;
mod writer;

// Re-export the public interface
pub use types::{DeliveryReport, DeliveryTarget};
pub use writer::{deliver, write_lines};
