//! N-column operations: sum, product, mean, median, minimum, maximum

use crate::core::operations::{AggregateKind, OperationDescriptor};
use crate::core::single_value;
use crate::error::CalcResult;
use crate::params::SingleValueSelector;

use super::{Derived, Evaluator};

impl Evaluator<'_> {
    pub(super) fn eval_aggregate(
        &self,
        op: &OperationDescriptor,
        kind: AggregateKind,
    ) -> CalcResult<Option<Derived>> {
        let colnames = &self.params.colnames;
        let Some(first) = colnames.first() else {
            return Ok(None);
        };

        let extra_scalar = kind.accepts_single_value()
            && self.params.single_value_selector != SingleValueSelector::None;
        // A one-column aggregate is the column itself
        if colnames.len() == 1 && !extra_scalar {
            return Ok(None);
        }

        let columns = colnames
            .iter()
            .map(|name| self.numbers(name))
            .collect::<CalcResult<Vec<_>>>()?;

        let scalar = if extra_scalar {
            single_value::resolve(
                self.params.single_value_selector,
                self.table,
                &self.params.single_value_col,
                self.params.single_value_row,
                self.params.single_value_constant,
            )?
        } else {
            None
        };

        let mut row = Vec::with_capacity(columns.len());
        let values = (0..self.table.row_count())
            .map(|i| {
                row.clear();
                row.extend(columns.iter().filter_map(|c| c.get(i).copied().flatten()));
                let value = aggregate_row(kind, &mut row);
                let value = match (scalar, kind) {
                    (Some(s), AggregateKind::Sum) => value.map(|v| v + s),
                    (Some(s), AggregateKind::Product) => value.map(|v| v * s),
                    _ => value,
                };
                value.filter(|v| !v.is_nan())
            })
            .collect();

        Ok(Some(Derived {
            default_name: op.aggregate_name(colnames),
            values,
            format: self.output_format(op, first, None),
        }))
    }
}

/// Reduce one row's present values. Missing values are skipped; an empty
/// row sums to 0 and multiplies to 1, and has no mean, median or extreme.
fn aggregate_row(kind: AggregateKind, values: &mut [f64]) -> Option<f64> {
    match kind {
        AggregateKind::Sum => Some(values.iter().sum()),
        AggregateKind::Product => Some(values.iter().product()),
        AggregateKind::Mean => {
            if values.is_empty() {
                None
            } else {
                Some(values.iter().sum::<f64>() / values.len() as f64)
            }
        }
        AggregateKind::Median => {
            if values.is_empty() {
                return None;
            }
            values.sort_by(f64::total_cmp);
            let mid = values.len() / 2;
            if values.len() % 2 == 0 {
                Some((values[mid - 1] + values[mid]) / 2.0)
            } else {
                Some(values[mid])
            }
        }
        AggregateKind::Min => values.iter().copied().reduce(f64::min),
        AggregateKind::Max => values.iter().copied().reduce(f64::max),
    }
}
