use crate::error::{CalcError, CalcResult};
use crate::host::colnames::NameCleaner;
use crate::host::messages::I18nMessage;
use crate::params::Params;
use crate::types::{Column, ColumnValue, InputColumns, Table};
use tracing::debug;

use super::operations::{self, OperationDescriptor, OperationShape};

mod aggregate;
mod binary;
mod unary;

#[cfg(test)]
mod tests;

/// A computed column before it is named and written
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    pub default_name: String,
    pub values: Vec<Option<f64>>,
    pub format: Option<String>,
}

/// Result of one render call
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// Parameters are incomplete; the table was not touched
    NoOp,
    Applied {
        column_name: String,
        column_format: Option<String>,
        /// Non-fatal naming warnings
        warnings: Vec<I18nMessage>,
    },
}

impl RenderOutcome {
    pub fn is_noop(&self) -> bool {
        matches!(self, RenderOutcome::NoOp)
    }
}

/// Computes one derived column from a table and current-schema parameters
pub struct Evaluator<'a> {
    table: &'a Table,
    params: &'a Params,
    input_columns: &'a InputColumns,
}

impl<'a> Evaluator<'a> {
    pub fn new(table: &'a Table, params: &'a Params, input_columns: &'a InputColumns) -> Self {
        Self {
            table,
            params,
            input_columns,
        }
    }

    /// Compute the derived column, or `None` while parameters are incomplete.
    pub fn evaluate(&self) -> CalcResult<Option<Derived>> {
        let op = operations::lookup(&self.params.operation)?;
        debug!(
            operation = op.key,
            arity = op.shape.arity(),
            "evaluating operation"
        );

        match op.shape {
            OperationShape::Aggregate(kind) => self.eval_aggregate(op, kind),
            OperationShape::Binary(compute) => self.eval_binary(op, compute),
            OperationShape::Unary(compute) => self.eval_unary(op, compute),
        }
    }

    /// Values of a number column
    fn numbers(&self, name: &str) -> CalcResult<&'a [Option<f64>]> {
        let column = self
            .table
            .column(name)
            .ok_or_else(|| CalcError::ColumnNotFound {
                column: name.to_string(),
            })?;
        column
            .values
            .as_numbers()
            .ok_or_else(|| CalcError::ColumnNotNumeric {
                column: name.to_string(),
            })
    }

    /// Host-reported display format of a column
    fn format_of(&self, name: &str) -> Option<&'a str> {
        self.input_columns
            .get(name)
            .and_then(|meta| meta.display_format.as_deref())
    }

    fn output_format(
        &self,
        op: &OperationDescriptor,
        first: &str,
        second: Option<&str>,
    ) -> Option<String> {
        op.output_format(self.format_of(first), second.and_then(|c| self.format_of(c)))
    }
}

/// Evaluate `params` against `table` and write the derived column.
///
/// The table is only written after the column has been computed, so on
/// `NoOp` or on error it is exactly as it was passed in. On success exactly
/// one column is added, or, when `outcolname` names an existing column,
/// that column is replaced in place.
pub fn render(
    table: &mut Table,
    params: &Params,
    input_columns: &InputColumns,
    cleaner: &dyn NameCleaner,
) -> CalcResult<RenderOutcome> {
    let Some(derived) = Evaluator::new(table, params, input_columns).evaluate()? else {
        debug!(operation = %params.operation, "waiting for parameters");
        return Ok(RenderOutcome::NoOp);
    };

    let (column_name, warnings) = if params.outcolname.is_empty() {
        let (names, warnings) = cleaner.clean_and_deduplicate(
            std::slice::from_ref(&derived.default_name),
            &table.column_names(),
        );
        let name = names.into_iter().next().ok_or_else(|| {
            CalcError::Validation("name cleaner returned no column name".to_string())
        })?;
        (name, warnings)
    } else {
        (params.outcolname.clone(), Vec::new())
    };

    table.set_column(Column::new(
        column_name.clone(),
        ColumnValue::Number(derived.values),
    ));

    Ok(RenderOutcome::Applied {
        column_name,
        column_format: derived.format,
        warnings,
    })
}
