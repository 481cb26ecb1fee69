//! Single-column operations

use crate::core::operations::{OperationDescriptor, UnaryCompute};
use crate::error::CalcResult;

use super::{Derived, Evaluator};

impl Evaluator<'_> {
    pub(super) fn eval_unary(
        &self,
        op: &OperationDescriptor,
        compute: UnaryCompute,
    ) -> CalcResult<Option<Derived>> {
        let col1 = &self.params.col1;
        if col1.is_empty() {
            return Ok(None);
        }

        let values = compute(self.numbers(col1)?)?;

        Ok(Some(Derived {
            default_name: op.unary_name(col1),
            values,
            format: self.output_format(op, col1, None),
        }))
    }
}
