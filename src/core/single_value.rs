//! Extra scalar for sum/product: a constant or one table cell

use crate::error::{CalcError, CalcResult};
use crate::params::SingleValueSelector;
use crate::types::{ColumnValue, Table};

/// Resolve the extra scalar. Returns `Ok(None)` when no scalar is selected.
pub fn resolve(
    selector: SingleValueSelector,
    table: &Table,
    column: &str,
    row_1based: i64,
    constant: f64,
) -> CalcResult<Option<f64>> {
    match selector {
        SingleValueSelector::None => Ok(None),
        SingleValueSelector::Constant => Ok(Some(constant)),
        SingleValueSelector::Cell => cell_value(table, column, row_1based).map(Some),
    }
}

// Checks run column choice, row bounds, column existence. An unchosen
// column wins over a bad row, including on a zero-row table.
fn cell_value(table: &Table, column: &str, row_1based: i64) -> CalcResult<f64> {
    if column.is_empty() {
        return Err(CalcError::MissingColumnSelection);
    }

    let row_count = table.row_count();
    let row = row_1based.saturating_sub(1);
    if row < 0 {
        return Err(CalcError::RowTooSmall);
    }
    let row = row as usize;
    if row >= row_count {
        return Err(CalcError::RowTooBig { limit: row_count });
    }

    let column = table
        .column(column)
        .ok_or_else(|| CalcError::ColumnNotFound {
            column: column.to_string(),
        })?;

    let value = match &column.values {
        ColumnValue::Number(values) => values.get(row).copied().flatten(),
        ColumnValue::Text(values) => values
            .get(row)
            .and_then(|v| v.as_deref())
            .and_then(|s| s.trim().parse::<f64>().ok()),
        ColumnValue::Datetime(_) => None,
    };

    value
        .filter(|v| !v.is_nan())
        .ok_or(CalcError::CellNotNumeric)
}
