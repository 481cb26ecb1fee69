use serde::{Deserialize, Serialize};
use std::collections::HashMap;

//==============================================================================
// Column Data
//==============================================================================

/// Column value arrays. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Number(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    /// ISO-8601 timestamps, kept as text
    Datetime(Vec<Option<String>>),
}

impl ColumnValue {
    /// Get the length of the array
    pub fn len(&self) -> usize {
        match self {
            ColumnValue::Number(v) => v.len(),
            ColumnValue::Text(v) => v.len(),
            ColumnValue::Datetime(v) => v.len(),
        }
    }

    /// Check if array is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnValue::Number(_) => ColumnType::Number,
            ColumnValue::Text(_) => ColumnType::Text,
            ColumnValue::Datetime(_) => ColumnType::Datetime,
        }
    }

    pub fn as_numbers(&self) -> Option<&[Option<f64>]> {
        match self {
            ColumnValue::Number(v) => Some(v),
            _ => None,
        }
    }
}

/// Semantic column type as the host reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Number,
    Text,
    Datetime,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Number => "number",
            ColumnType::Text => "text",
            ColumnType::Datetime => "datetime",
        }
    }
}

/// A named column in a table
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: ColumnValue,
}

impl Column {
    pub fn new(name: impl Into<String>, values: ColumnValue) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

//==============================================================================
// Table
//==============================================================================

/// Row-aligned columns in display order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Replace the column with the same name in place, or append it.
    pub fn set_column(&mut self, column: Column) {
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Get the number of rows (length of first column, all should be same)
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |col| col.len())
    }

    /// Validate all columns have the same length
    pub fn validate_lengths(&self) -> Result<(), String> {
        let row_count = self.row_count();
        for column in &self.columns {
            if column.len() != row_count {
                return Err(format!(
                    "Column '{}' has {} rows, expected {} rows",
                    column.name,
                    column.len(),
                    row_count
                ));
            }
        }
        Ok(())
    }

    /// Metadata for every column, with a thousands-separator format on
    /// number columns and no format elsewhere.
    pub fn infer_input_columns(&self) -> InputColumns {
        self.columns
            .iter()
            .map(|column| {
                let semantic_type = column.values.column_type();
                let display_format = match semantic_type {
                    ColumnType::Number => Some(DEFAULT_NUMBER_FORMAT.to_string()),
                    _ => None,
                };
                (
                    column.name.clone(),
                    ColumnMetadata {
                        name: column.name.clone(),
                        semantic_type,
                        display_format,
                    },
                )
            })
            .collect()
    }
}

//==============================================================================
// Column Metadata
//==============================================================================

pub const DEFAULT_NUMBER_FORMAT: &str = "{:,}";

/// Host-supplied description of one input column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub semantic_type: ColumnType,
    #[serde(default, rename = "format")]
    pub display_format: Option<String>,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, semantic_type: ColumnType, format: Option<&str>) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            display_format: format.map(str::to_string),
        }
    }
}

/// Column metadata keyed by column name
pub type InputColumns = HashMap<String, ColumnMetadata>;
