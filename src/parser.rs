use crate::error::{CalcError, CalcResult};
use crate::types::{Column, ColumnMetadata, ColumnType, ColumnValue, InputColumns, Table};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::Path;

/// On-disk table document
///
/// ```yaml
/// columns:
///   - name: revenue
///     type: number
///     format: "{:,.2f}"
///     values: [1000, 1200, null]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDocument {
    pub columns: Vec<ColumnDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDocument {
    pub name: String,
    #[serde(rename = "type", default = "default_column_type")]
    pub semantic_type: ColumnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default)]
    pub values: Vec<Value>,
}

fn default_column_type() -> ColumnType {
    ColumnType::Number
}

/// A table plus the host metadata describing its columns
#[derive(Debug, Clone)]
pub struct ParsedTable {
    pub table: Table,
    pub input_columns: InputColumns,
}

/// Parse a table document from a YAML file.
///
/// # Example
/// ```no_run
/// use colcalc::parser::parse_table;
/// use std::path::Path;
///
/// let parsed = parse_table(Path::new("table.yaml"))?;
/// println!("Rows: {}", parsed.table.row_count());
/// # Ok::<(), colcalc::error::CalcError>(())
/// ```
pub fn parse_table(path: &Path) -> CalcResult<ParsedTable> {
    let content = std::fs::read_to_string(path)?;
    parse_table_str(&content)
}

pub fn parse_table_str(content: &str) -> CalcResult<ParsedTable> {
    let document: TableDocument = serde_yaml::from_str(content)?;

    let mut table = Table::new();
    let mut input_columns = InputColumns::new();

    for column in document.columns {
        if table.column(&column.name).is_some() {
            return Err(CalcError::Parse(format!(
                "Duplicate column name '{}'",
                column.name
            )));
        }
        let values = parse_values(&column)?;
        input_columns.insert(
            column.name.clone(),
            ColumnMetadata {
                name: column.name.clone(),
                semantic_type: column.semantic_type,
                display_format: column.format,
            },
        );
        table.add_column(Column::new(column.name, values));
    }

    table
        .validate_lengths()
        .map_err(|e| CalcError::Validation(format!("Table: {}", e)))?;

    Ok(ParsedTable {
        table,
        input_columns,
    })
}

fn parse_values(column: &ColumnDocument) -> CalcResult<ColumnValue> {
    let bad_value = |index: usize, value: &Value| {
        CalcError::Parse(format!(
            "Column '{}' row {}: expected {}, got {:?}",
            column.name,
            index + 1,
            column.semantic_type.as_str(),
            value
        ))
    };

    match column.semantic_type {
        ColumnType::Number => column
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| match v {
                Value::Null => Ok(None),
                Value::Number(n) => n.as_f64().map(Some).ok_or_else(|| bad_value(i, v)),
                _ => Err(bad_value(i, v)),
            })
            .collect::<CalcResult<Vec<_>>>()
            .map(ColumnValue::Number),
        ColumnType::Text | ColumnType::Datetime => {
            let strings = column
                .values
                .iter()
                .enumerate()
                .map(|(i, v)| match v {
                    Value::Null => Ok(None),
                    Value::String(s) => Ok(Some(s.clone())),
                    _ => Err(bad_value(i, v)),
                })
                .collect::<CalcResult<Vec<_>>>()?;
            Ok(if column.semantic_type == ColumnType::Text {
                ColumnValue::Text(strings)
            } else {
                ColumnValue::Datetime(strings)
            })
        }
    }
}

/// Load a saved parameter snapshot (JSON or YAML) of any schema age
pub fn load_params(path: &Path) -> CalcResult<serde_json::Value> {
    let content = std::fs::read_to_string(path)?;
    parse_params_str(&content)
}

pub fn parse_params_str(content: &str) -> CalcResult<serde_json::Value> {
    Ok(serde_yaml::from_str(content)?)
}
