//! Current parameter schema
//!
//! Saved snapshots of any age go through [`crate::migrate`] first; the
//! result is validated against the embedded JSON Schema and deserialized
//! into [`Params`].

use crate::error::{CalcError, CalcResult};
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};

/// Where the extra scalar for sum/product comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SingleValueSelector {
    #[default]
    None,
    Cell,
    Constant,
}

/// Evaluation parameters, current schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Operation registry key
    pub operation: String,
    pub colnames: Vec<String>,
    pub col1: String,
    pub col2: String,
    pub single_value_selector: SingleValueSelector,
    pub single_value_col: String,
    /// 1-based, as shown to the user
    pub single_value_row: i64,
    pub single_value_constant: f64,
    /// Output column name; empty means "derive from the operation"
    pub outcolname: String,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            operation: "add".to_string(),
            colnames: Vec::new(),
            col1: String::new(),
            col2: String::new(),
            single_value_selector: SingleValueSelector::None,
            single_value_col: String::new(),
            single_value_row: 1,
            single_value_constant: 1.0,
            outcolname: String::new(),
        }
    }
}

impl Params {
    /// Validate a migrated snapshot and deserialize it.
    pub fn from_value(value: serde_json::Value) -> CalcResult<Self> {
        validate_against_schema(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> CalcResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Validate a snapshot against the current parameter JSON Schema
fn validate_against_schema(value: &serde_json::Value) -> CalcResult<()> {
    let schema_str = include_str!("../schema/params.schema.json");
    let schema_value: serde_json::Value = serde_json::from_str(schema_str)
        .map_err(|e| CalcError::Validation(format!("Failed to parse schema: {}", e)))?;

    let compiled_schema = JSONSchema::compile(&schema_value)
        .map_err(|e| CalcError::Validation(format!("Failed to compile schema: {}", e)))?;

    if let Err(errors) = compiled_schema.validate(value) {
        let error_messages: Vec<String> = errors.map(|e| format!("  - {}", e)).collect();
        return Err(CalcError::Validation(format!(
            "Parameter validation failed:\n{}",
            error_messages.join("\n")
        )));
    }

    Ok(())
}
