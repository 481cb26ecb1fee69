//! Two-column operations

use crate::core::operations::{BinaryCompute, OperationDescriptor};
use crate::error::CalcResult;

use super::{Derived, Evaluator};

impl Evaluator<'_> {
    pub(super) fn eval_binary(
        &self,
        op: &OperationDescriptor,
        compute: BinaryCompute,
    ) -> CalcResult<Option<Derived>> {
        let (col1, col2) = (&self.params.col1, &self.params.col2);
        if col1.is_empty() || col2.is_empty() {
            return Ok(None);
        }

        let x = self.numbers(col1)?;
        let y = self.numbers(col2)?;
        let (x_format, y_format) = (self.format_of(col1), self.format_of(col2));

        let values = x
            .iter()
            .zip(y.iter())
            .map(|pair| match pair {
                (Some(a), Some(b)) => match compute {
                    BinaryCompute::Elementwise(f) => f(*a, *b),
                    BinaryCompute::FormatAware(f) => f(*a, *b, x_format, y_format),
                },
                _ => None,
            })
            .collect();

        Ok(Some(Derived {
            default_name: op.binary_name(col1, col2),
            values,
            format: self.output_format(op, col1, Some(col2)),
        }))
    }
}
