//! Structured user-facing messages
//!
//! The engine never produces final text. It emits an identifier plus
//! arguments, and a `MessageCatalog` turns that into a string for the
//! user's locale.

use crate::error::{CalcError, CalcResult};
use regex::{Captures, Regex};
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// A substitution argument
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageArg {
    Int(i64),
    Text(String),
}

impl fmt::Display for MessageArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageArg::Int(n) => write!(f, "{n}"),
            MessageArg::Text(s) => f.write_str(s),
        }
    }
}

/// Message identifier with ordered arguments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct I18nMessage {
    pub id: String,
    pub args: Vec<(String, MessageArg)>,
}

impl I18nMessage {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, name: impl Into<String>, value: MessageArg) -> Self {
        self.args.push((name.into(), value));
        self
    }

    pub fn arg(&self, name: &str) -> Option<&MessageArg> {
        self.args.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// Translation lookup: identifier + arguments to final text
pub trait MessageCatalog {
    fn render(&self, message: &I18nMessage) -> String;
}

/// Built-in English catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishCatalog;

impl EnglishCatalog {
    fn template(id: &str) -> Option<&'static str> {
        let template = match id {
            "badParam.single_value_col.missing" => "Please select the cell value's column",
            "badParam.single_value_row.tooSmall" => "Row number cannot be less than 1",
            "badParam.single_value_row.tooBig" => "Row number cannot be greater than {limit}",
            "badParam.single_value_col.notANumber" => "The chosen cell does not contain a number",
            "badData.percent_of_column_sum.sumIsZero" => "Column sum is 0.",
            "badParam.operation.unknown" => "Unknown operation \"{operation}\"",
            "badParam.column.notFound" => "Column \"{column}\" does not exist",
            "badData.column.notNumeric" => "Column \"{column}\" is not a number column",
            "migrate.operation.unknownCode" => {
                "Saved operation code {code} is unknown; using \"{fallback}\" instead"
            }
            "migrate.single_value_selector.unknownCode" => {
                "Saved value-source code {code} is unknown; using \"{fallback}\" instead"
            }
            "util.colnames.warnings.ascii_cleaned" => {
                "Removed special characters from {n_columns} column names (see \"{first_colname}\")"
            }
            "util.colnames.warnings.default" => {
                "Renamed {n_columns} column names (because values were empty; see \"{first_colname}\")"
            }
            "util.colnames.warnings.truncated" => {
                "Truncated {n_columns} column names (to {n_bytes} bytes each; see \"{first_colname}\")"
            }
            "util.colnames.warnings.numbered" => {
                "Renamed {n_columns} duplicate column names (see \"{first_colname}\")"
            }
            _ => return None,
        };
        Some(template)
    }
}

static ENGLISH: EnglishCatalog = EnglishCatalog;

/// Catalog for a settings locale. Region tags (`en-GB`, `en_US`) use their
/// language's catalog.
pub fn catalog_for_locale(locale: &str) -> CalcResult<&'static dyn MessageCatalog> {
    let language = locale.split(['-', '_']).next().unwrap_or(locale);
    match language.to_ascii_lowercase().as_str() {
        "en" => Ok(&ENGLISH),
        _ => Err(CalcError::Validation(format!(
            "Unsupported locale '{locale}' (available: en)"
        ))),
    }
}

fn placeholder_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").ok())
        .as_ref()
}

impl MessageCatalog for EnglishCatalog {
    fn render(&self, message: &I18nMessage) -> String {
        let Some(template) = Self::template(&message.id) else {
            return message.id.clone();
        };
        let Some(pattern) = placeholder_pattern() else {
            return template.to_string();
        };
        pattern
            .replace_all(template, |caps: &Captures| match message.arg(&caps[1]) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}
