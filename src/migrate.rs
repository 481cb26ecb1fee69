//! Saved-parameter migration
//!
//! Saved snapshots carry no version tag. Each step recognizes its input
//! shape structurally (a defunct key, an integer where text is expected, a
//! string where a list is expected) and rewrites it into the next shape.
//! Steps run in order and every step is a no-op on shapes it does not
//! recognize, so migrating a current snapshot returns it unchanged.

use crate::error::{CalcError, CalcResult};
use crate::host::messages::{I18nMessage, MessageArg};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

type Object = Map<String, Value>;

/// Result of running the migration chain
#[derive(Debug, Clone, PartialEq)]
pub struct Migrated {
    /// Current-schema snapshot
    pub params: Value,
    /// Fallbacks taken while upgrading (unknown legacy codes)
    pub warnings: Vec<I18nMessage>,
}

/// One upgrade from a historical shape to the next
pub struct MigrationStep {
    pub name: &'static str,
    pub applies: fn(&Object) -> bool,
    pub apply: fn(Object, &mut Vec<I18nMessage>) -> Object,
}

/// The chain, oldest first
pub const MIGRATIONS: [MigrationStep; 3] = [
    MigrationStep {
        name: "v0_to_v1",
        applies: has_static_text_values,
        apply: migrate_v0_to_v1,
    },
    MigrationStep {
        name: "v1_to_v2",
        applies: has_numeric_menus,
        apply: migrate_v1_to_v2,
    },
    MigrationStep {
        name: "v2_to_v3",
        applies: has_joined_colnames,
        apply: migrate_v2_to_v3,
    },
];

/// Keys of the current schema, in their canonical order
const CURRENT_KEYS: [&str; 9] = [
    "operation",
    "colnames",
    "col1",
    "col2",
    "single_value_selector",
    "single_value_col",
    "single_value_row",
    "single_value_constant",
    "outcolname",
];

/// Historical menu positions. Slots 4 and 9 were separators.
const LEGACY_OPERATION_CODES: [(i64, &str); 12] = [
    (0, "add"),
    (1, "subtract"),
    (2, "multiply"),
    (3, "divide"),
    (5, "mean"),
    (6, "median"),
    (7, "minimum"),
    (8, "maximum"),
    (10, "percent_change"),
    (11, "percent_multiply"),
    (12, "percent_divide"),
    (13, "percent_of_column_sum"),
];

const LEGACY_OPERATION_FALLBACK: &str = "add";

const LEGACY_SELECTOR_CODES: [(i64, &str); 3] = [(0, "none"), (1, "cell"), (2, "constant")];

const LEGACY_SELECTOR_FALLBACK: &str = "none";

/// Upgrade a saved snapshot of any age to the current schema.
pub fn migrate_params(params: Value) -> CalcResult<Migrated> {
    let mut object = match params {
        Value::Object(map) => map,
        other => {
            return Err(CalcError::Migration(format!(
                "parameters must be an object, got {}",
                json_type_name(&other)
            )))
        }
    };

    let mut warnings = Vec::new();
    for step in &MIGRATIONS {
        if (step.applies)(&object) {
            debug!(step = step.name, "migrating parameters");
            object = (step.apply)(object, &mut warnings);
        }
    }

    Ok(Migrated {
        params: Value::Object(object),
        warnings,
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_integer(value: Option<&Value>) -> bool {
    value.is_some_and(|v| v.is_i64() || v.is_u64())
}

//==============================================================================
// v0 -> v1: static-text widgets stored values; outcolname did not exist
//==============================================================================

fn has_static_text_values(params: &Object) -> bool {
    params.contains_key("xtext") || !params.contains_key("outcolname")
}

/// Value a v0 snapshot implicitly had for a key it did not store
fn v0_default(key: &str) -> Value {
    match key {
        "operation" => json!(0),
        "single_value_selector" => json!(0),
        "single_value_row" => json!(1),
        "single_value_constant" => json!(1.0),
        _ => json!(""),
    }
}

/// Keep only the current keys; everything else (`xtext`,
/// `add_additional`, `multiply_additional`, ...) is dropped.
fn migrate_v0_to_v1(mut params: Object, _warnings: &mut Vec<I18nMessage>) -> Object {
    CURRENT_KEYS
        .iter()
        .map(|key| {
            let value = params.remove(*key).unwrap_or_else(|| v0_default(key));
            (key.to_string(), value)
        })
        .collect()
}

//==============================================================================
// v1 -> v2: menus stored their position; now they store a key
//==============================================================================

fn has_numeric_menus(params: &Object) -> bool {
    is_integer(params.get("operation")) || is_integer(params.get("single_value_selector"))
}

fn lookup_code(codes: &[(i64, &'static str)], code: i64) -> Option<&'static str> {
    codes.iter().find(|(c, _)| *c == code).map(|(_, key)| *key)
}

/// Replace one integer menu position with its key. Codes outside the map
/// (including integers too large for `i64`) take the fallback.
fn migrate_menu(
    params: &mut Object,
    field: &str,
    codes: &[(i64, &'static str)],
    fallback: &'static str,
    warnings: &mut Vec<I18nMessage>,
) {
    let Some(value) = params.get(field).filter(|v| is_integer(Some(v))) else {
        return;
    };
    let code = value.as_i64();
    let key = match code.and_then(|c| lookup_code(codes, c)) {
        Some(key) => key,
        None => {
            let shown = value.to_string();
            warn!(field, code = %shown, fallback, "unknown legacy menu code");
            let code_arg = match code {
                Some(c) => MessageArg::Int(c),
                None => MessageArg::Text(shown),
            };
            warnings.push(
                I18nMessage::new(format!("migrate.{field}.unknownCode"))
                    .with_arg("code", code_arg)
                    .with_arg("fallback", MessageArg::Text(fallback.to_string())),
            );
            fallback
        }
    };
    params.insert(field.to_string(), json!(key));
}

fn migrate_v1_to_v2(mut params: Object, warnings: &mut Vec<I18nMessage>) -> Object {
    migrate_menu(
        &mut params,
        "operation",
        &LEGACY_OPERATION_CODES,
        LEGACY_OPERATION_FALLBACK,
        warnings,
    );
    migrate_menu(
        &mut params,
        "single_value_selector",
        &LEGACY_SELECTOR_CODES,
        LEGACY_SELECTOR_FALLBACK,
        warnings,
    );
    params
}

//==============================================================================
// v2 -> v3: colnames was comma-joined text; now it is a list
//==============================================================================

fn has_joined_colnames(params: &Object) -> bool {
    params.get("colnames").is_some_and(Value::is_string)
}

fn migrate_v2_to_v3(mut params: Object, _warnings: &mut Vec<I18nMessage>) -> Object {
    if let Some(Value::String(joined)) = params.get("colnames") {
        let list: Vec<Value> = joined
            .split(',')
            .filter(|c| !c.is_empty())
            .map(|c| json!(c))
            .collect();
        params.insert("colnames".to_string(), Value::Array(list));
    }
    params
}
