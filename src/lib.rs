//! colcalc - derived-column calculator
//!
//! Applies one arithmetic operation to the columns of a table and writes
//! the result as a new column. Saved parameters of any schema age are
//! migrated to the current schema first.
//!
//! # Example
//!
//! ```no_run
//! use colcalc::core::{render, RenderOutcome};
//! use colcalc::host::DefaultNameCleaner;
//! use colcalc::migrate::migrate_params;
//! use colcalc::params::Params;
//! use colcalc::parser::{load_params, parse_table};
//! use std::path::Path;
//!
//! let parsed = parse_table(Path::new("table.yaml"))?;
//! let migrated = migrate_params(load_params(Path::new("params.json"))?)?;
//! let params = Params::from_value(migrated.params)?;
//!
//! let mut table = parsed.table;
//! let outcome = render(&mut table, &params, &parsed.input_columns, &DefaultNameCleaner::default())?;
//! if let RenderOutcome::Applied { column_name, .. } = outcome {
//!     println!("Added {column_name}");
//! }
//! # Ok::<(), colcalc::error::CalcError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod host;
pub mod migrate;
pub mod params;
pub mod parser;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use error::{CalcError, CalcResult};
pub use params::{Params, SingleValueSelector};
pub use types::{Column, ColumnMetadata, ColumnType, ColumnValue, InputColumns, Table};
