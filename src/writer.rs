use crate::error::CalcResult;
use crate::parser::{ColumnDocument, TableDocument};
use crate::types::{ColumnValue, InputColumns, Table};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Build the YAML document for a table.
///
/// Column formats come from `input_columns`; `new_column` supplies the
/// name and format of the derived column, which has no input metadata.
pub fn table_document(
    table: &Table,
    input_columns: &InputColumns,
    new_column: Option<(&str, Option<&str>)>,
) -> TableDocument {
    let columns = table
        .columns
        .iter()
        .map(|column| {
            let format = match new_column {
                Some((name, format)) if name == column.name => format.map(str::to_string),
                _ => input_columns
                    .get(&column.name)
                    .and_then(|meta| meta.display_format.clone()),
            };
            ColumnDocument {
                name: column.name.clone(),
                semantic_type: column.values.column_type(),
                format,
                values: yaml_values(&column.values),
            }
        })
        .collect();

    TableDocument { columns }
}

fn yaml_values(values: &ColumnValue) -> Vec<Value> {
    match values {
        ColumnValue::Number(v) => v
            .iter()
            .map(|n| match n {
                Some(n) => Value::Number(serde_yaml::Number::from(*n)),
                None => Value::Null,
            })
            .collect(),
        ColumnValue::Text(v) | ColumnValue::Datetime(v) => v
            .iter()
            .map(|s| match s {
                Some(s) => Value::String(s.clone()),
                None => Value::Null,
            })
            .collect(),
    }
}

pub fn to_yaml_string(document: &TableDocument) -> CalcResult<String> {
    Ok(serde_yaml::to_string(document)?)
}

/// Write a table document to a YAML file
pub fn write_table(path: &Path, document: &TableDocument) -> CalcResult<()> {
    fs::write(path, to_yaml_string(document)?)?;
    Ok(())
}
