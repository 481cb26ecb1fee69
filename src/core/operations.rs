//! Operation registry
//!
//! Keys are persisted in saved parameters. Never rename or remove one.

use crate::error::{CalcError, CalcResult};

/// Display format that marks a column as holding fractions shown as percents
pub const PERCENT_FORMAT: &str = "{:,.1%}";

/// Row-wise reduction for N-column operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
    Sum,
    Product,
    Mean,
    Median,
    Min,
    Max,
}

impl AggregateKind {
    /// Only sum and product accept the extra scalar
    pub fn accepts_single_value(&self) -> bool {
        matches!(self, AggregateKind::Sum | AggregateKind::Product)
    }
}

/// Two-column computation, per row. Missing operands never reach these.
#[derive(Clone, Copy)]
pub enum BinaryCompute {
    Elementwise(fn(f64, f64) -> Option<f64>),
    /// Also sees both input columns' display formats
    FormatAware(fn(f64, f64, Option<&str>, Option<&str>) -> Option<f64>),
}

/// Whole-column computation for single-column operations
pub type UnaryCompute = fn(&[Option<f64>]) -> CalcResult<Vec<Option<f64>>>;

/// How an operation's output display format is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatRule {
    FirstInput,
    SecondInput,
    Forced(&'static str),
}

/// Arity-specific shape of an operation
#[derive(Clone, Copy)]
pub enum OperationShape {
    Aggregate(AggregateKind),
    Binary(BinaryCompute),
    Unary(UnaryCompute),
}

impl OperationShape {
    pub fn arity(&self) -> &'static str {
        match self {
            OperationShape::Aggregate(_) => "N",
            OperationShape::Binary(_) => "2",
            OperationShape::Unary(_) => "1",
        }
    }
}

#[derive(Clone, Copy)]
pub struct OperationDescriptor {
    pub key: &'static str,
    pub shape: OperationShape,
    /// Placeholders: `{cols}` for aggregates, `{col1}` and `{col2}` for
    /// binary, `{col}` for unary.
    pub name_template: &'static str,
    pub format_rule: FormatRule,
}

impl std::fmt::Debug for OperationDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("key", &self.key)
            .field("arity", &self.shape.arity())
            .field("name_template", &self.name_template)
            .field("format_rule", &self.format_rule)
            .finish()
    }
}

impl OperationDescriptor {
    /// Default output name for an N-column operation
    pub fn aggregate_name(&self, colnames: &[String]) -> String {
        let cols = if colnames.len() < 4 {
            colnames.join(", ")
        } else {
            format!("{} columns", colnames.len())
        };
        fill_template(self.name_template, &[("cols", &cols)])
    }

    pub fn binary_name(&self, col1: &str, col2: &str) -> String {
        fill_template(self.name_template, &[("col1", col1), ("col2", col2)])
    }

    pub fn unary_name(&self, col: &str) -> String {
        fill_template(self.name_template, &[("col", col)])
    }

    /// Output format given the first and (for binary ops) second input
    /// formats
    pub fn output_format(&self, first: Option<&str>, second: Option<&str>) -> Option<String> {
        match self.format_rule {
            FormatRule::FirstInput => first.map(str::to_string),
            FormatRule::SecondInput => second.map(str::to_string),
            FormatRule::Forced(format) => Some(format.to_string()),
        }
    }
}

/// Substitute `{name}` placeholders in one pass, so substituted column
/// names are never re-scanned.
fn fill_template(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let substituted = tail.find('}').and_then(|end| {
            let name = &tail[1..end];
            args.iter()
                .find(|(n, _)| *n == name)
                .map(|(_, value)| (*value, end + 1))
        });
        match substituted {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

//==============================================================================
// Computations
//==============================================================================

/// Division results: ±infinity and NaN become missing
fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn not_nan(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

fn subtract(x: f64, y: f64) -> Option<f64> {
    not_nan(x - y)
}

fn divide(x: f64, y: f64) -> Option<f64> {
    finite(x / y)
}

fn percent_change(x: f64, y: f64) -> Option<f64> {
    finite((y - x) / x)
}

fn percent_multiply(x: f64, y: f64, x_format: Option<&str>, _y_format: Option<&str>) -> Option<f64> {
    if x_format == Some(PERCENT_FORMAT) {
        not_nan(x * y)
    } else {
        not_nan(x * y / 100.0)
    }
}

fn percent_of_column_sum(values: &[Option<f64>]) -> CalcResult<Vec<Option<f64>>> {
    let all_missing = values.iter().all(Option::is_none);
    let sum: f64 = values.iter().flatten().sum();
    if sum == 0.0 && !all_missing {
        return Err(CalcError::ZeroColumnSum);
    }
    Ok(values
        .iter()
        .map(|v| v.and_then(|x| finite(x / sum)))
        .collect())
}

//==============================================================================
// Registry
//==============================================================================

pub static OPERATIONS: [OperationDescriptor; 12] = [
    OperationDescriptor {
        key: "add",
        shape: OperationShape::Aggregate(AggregateKind::Sum),
        name_template: "Sum of {cols}",
        format_rule: FormatRule::FirstInput,
    },
    OperationDescriptor {
        key: "subtract",
        shape: OperationShape::Binary(BinaryCompute::Elementwise(subtract)),
        name_template: "{col1} minus {col2}",
        format_rule: FormatRule::FirstInput,
    },
    OperationDescriptor {
        key: "multiply",
        shape: OperationShape::Aggregate(AggregateKind::Product),
        name_template: "Product of {cols}",
        format_rule: FormatRule::FirstInput,
    },
    OperationDescriptor {
        key: "divide",
        shape: OperationShape::Binary(BinaryCompute::Elementwise(divide)),
        name_template: "{col1} divided by {col2}",
        format_rule: FormatRule::FirstInput,
    },
    OperationDescriptor {
        key: "mean",
        shape: OperationShape::Aggregate(AggregateKind::Mean),
        name_template: "Average of {cols}",
        format_rule: FormatRule::FirstInput,
    },
    OperationDescriptor {
        key: "median",
        shape: OperationShape::Aggregate(AggregateKind::Median),
        name_template: "Median of {cols}",
        format_rule: FormatRule::FirstInput,
    },
    OperationDescriptor {
        key: "minimum",
        shape: OperationShape::Aggregate(AggregateKind::Min),
        name_template: "Minimum of {cols}",
        format_rule: FormatRule::FirstInput,
    },
    OperationDescriptor {
        key: "maximum",
        shape: OperationShape::Aggregate(AggregateKind::Max),
        name_template: "Maximum of {cols}",
        format_rule: FormatRule::FirstInput,
    },
    OperationDescriptor {
        key: "percent_change",
        shape: OperationShape::Binary(BinaryCompute::Elementwise(percent_change)),
        name_template: "Percent change {col1} to {col2}",
        format_rule: FormatRule::Forced(PERCENT_FORMAT),
    },
    OperationDescriptor {
        key: "percent_multiply",
        shape: OperationShape::Binary(BinaryCompute::FormatAware(percent_multiply)),
        name_template: "{col1} percent of {col2}",
        format_rule: FormatRule::SecondInput,
    },
    OperationDescriptor {
        key: "percent_divide",
        shape: OperationShape::Binary(BinaryCompute::Elementwise(divide)),
        name_template: "{col1} is this percent of {col2}",
        format_rule: FormatRule::Forced(PERCENT_FORMAT),
    },
    OperationDescriptor {
        key: "percent_of_column_sum",
        shape: OperationShape::Unary(percent_of_column_sum),
        name_template: "Percent of {col}",
        format_rule: FormatRule::Forced(PERCENT_FORMAT),
    },
];

pub fn lookup(key: &str) -> CalcResult<&'static OperationDescriptor> {
    OPERATIONS
        .iter()
        .find(|op| op.key == key)
        .ok_or_else(|| CalcError::UnknownOperation {
            operation: key.to_string(),
        })
}
