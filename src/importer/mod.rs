//! Price-list import pipeline.
//!
//! Raw upload → [`spreadsheet`] grid → [`mapping`] validation → per-row
//! planning ([`planner`], with [`markup`] pricing and [`category`]
//! resolution) → chunked persistence ([`executor`] over [`store`]).
//! Structural failures abort the whole run; row-level failures downgrade the
//! affected row to skipped and the run continues.

pub mod category;
pub mod executor;
pub mod mapping;
pub mod markup;
pub mod planner;
pub mod spreadsheet;
pub mod store;

pub use mapping::{ColumnMapping, FieldIndexes, ProductField};
pub use markup::{Adjustment, MarkupRule, PricingRules};
pub use planner::{RawProductRow, RowError, RowPlan};
pub use spreadsheet::RowGrid;
pub use store::{
    ExistingProduct, ImportStore, NewImportLog, NewProduct, ProductUpdate, SeaOrmImportStore,
    StoreError,
};

use thiserror::Error;

/// Structural import failures. These abort the entire run before any row is
/// processed; nothing is written.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unreadable file: {0}")]
    UnreadableFile(String),

    #[error("unsupported file format '{0}'")]
    UnsupportedFormat(String),

    #[error(
        "incomplete column mapping: missing [{}], conflicting [{}]",
        format_fields(.missing),
        format_fields(.conflicting)
    )]
    IncompleteMapping {
        missing: Vec<ProductField>,
        conflicting: Vec<ProductField>,
    },
}

fn format_fields(fields: &[ProductField]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
