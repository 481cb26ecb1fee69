use crate::host::messages::{I18nMessage, MessageArg};
use thiserror::Error;

pub type CalcResult<T> = Result<T, CalcError>;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("Please select the cell value's column")]
    MissingColumnSelection,

    #[error("Row number cannot be less than 1")]
    RowTooSmall,

    #[error("Row number cannot be greater than {limit}")]
    RowTooBig { limit: usize },

    #[error("The chosen cell does not contain a number")]
    CellNotNumeric,

    #[error("Column sum is 0.")]
    ZeroColumnSum,

    #[error("Unknown operation: {operation}")]
    UnknownOperation { operation: String },

    #[error("Column '{column}' does not exist")]
    ColumnNotFound { column: String },

    #[error("Column '{column}' is not a number column")]
    ColumnNotNumeric { column: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl CalcError {
    /// Structured message for the host's translation service.
    ///
    /// Only evaluation errors carry one; host-layer failures (I/O, document
    /// parsing) are reported through `Display`.
    pub fn message(&self) -> Option<I18nMessage> {
        let message = match self {
            CalcError::MissingColumnSelection => {
                I18nMessage::new("badParam.single_value_col.missing")
            }
            CalcError::RowTooSmall => I18nMessage::new("badParam.single_value_row.tooSmall"),
            CalcError::RowTooBig { limit } => I18nMessage::new("badParam.single_value_row.tooBig")
                .with_arg("limit", MessageArg::Int(*limit as i64)),
            CalcError::CellNotNumeric => I18nMessage::new("badParam.single_value_col.notANumber"),
            CalcError::ZeroColumnSum => {
                I18nMessage::new("badData.percent_of_column_sum.sumIsZero")
            }
            CalcError::UnknownOperation { operation } => {
                I18nMessage::new("badParam.operation.unknown")
                    .with_arg("operation", MessageArg::Text(operation.clone()))
            }
            CalcError::ColumnNotFound { column } => I18nMessage::new("badParam.column.notFound")
                .with_arg("column", MessageArg::Text(column.clone())),
            CalcError::ColumnNotNumeric { column } => {
                I18nMessage::new("badData.column.notNumeric")
                    .with_arg("column", MessageArg::Text(column.clone()))
            }
            _ => return None,
        };
        Some(message)
    }

    /// True for errors a user can fix by editing parameters or data.
    pub fn is_user_error(&self) -> bool {
        self.message().is_some() && !matches!(self, CalcError::UnknownOperation { .. })
    }
}
