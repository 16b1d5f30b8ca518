//! # sentiment-types
//!
//! Domain types for the sentiment prediction service.
//! This crate contains pure data types with zero external dependencies
//! (except serde for serialization).

pub mod error;
pub mod record;
pub mod schema;

// Re-exports for convenience.
pub use error::{DiagnosticError, ErrorKind, PredictError};
pub use record::{SentimentInput, SentimentOutput};
pub use schema::{ColumnBinding, ColumnMapping, ColumnRole, ColumnType};
