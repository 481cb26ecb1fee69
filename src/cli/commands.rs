use crate::core::{self, RenderOutcome, OPERATIONS};
use crate::error::{CalcError, CalcResult};
use crate::host::{
    catalog_for_locale, DefaultNameCleaner, EnglishCatalog, I18nMessage, MessageCatalog, Settings,
};
use crate::migrate::migrate_params;
use crate::params::Params;
use crate::{parser, writer};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::info;

fn load_settings(settings: Option<&Path>) -> CalcResult<Settings> {
    match settings {
        Some(path) => Settings::load(path),
        None => Ok(Settings::default()),
    }
}

fn print_messages(messages: &[I18nMessage], catalog: &dyn MessageCatalog) {
    for message in messages {
        eprintln!("{}", format!("⚠️  {}", catalog.render(message)).yellow());
    }
}

/// Print a failed command's error the way the host would show it to a
/// user. Uses the settings locale when the settings themselves are usable.
pub fn report_error(error: &CalcError, settings: Option<&Path>) {
    let catalog = load_settings(settings)
        .and_then(|s| catalog_for_locale(&s.locale))
        .unwrap_or(&EnglishCatalog);
    let text = match error.message() {
        Some(message) => catalog.render(&message),
        None => error.to_string(),
    };
    eprintln!("{}", format!("❌ {text}").bold().red());
}

/// Load and migrate a saved parameter snapshot
fn load_current_params(path: &Path, catalog: &dyn MessageCatalog) -> CalcResult<Params> {
    let raw = parser::load_params(path)?;
    let migrated = migrate_params(raw)?;
    print_messages(&migrated.warnings, catalog);
    Params::from_value(migrated.params)
}

/// Execute the calculate command
pub fn calculate(
    table_path: PathBuf,
    params_path: PathBuf,
    output: Option<PathBuf>,
    settings: Option<PathBuf>,
) -> CalcResult<()> {
    let settings = load_settings(settings.as_deref())?;
    let catalog = catalog_for_locale(&settings.locale)?;

    info!(table = %table_path.display(), params = %params_path.display(), "calculating");

    let parsed = parser::parse_table(&table_path)?;
    let params = load_current_params(&params_path, catalog)?;
    let cleaner = DefaultNameCleaner::new(settings);

    let mut table = parsed.table;
    let outcome = core::render(&mut table, &params, &parsed.input_columns, &cleaner)?;

    let document = match &outcome {
        RenderOutcome::NoOp => {
            eprintln!("{}", "⏸  Waiting for parameters - table unchanged".yellow());
            writer::table_document(&table, &parsed.input_columns, None)
        }
        RenderOutcome::Applied {
            column_name,
            column_format,
            warnings,
        } => {
            print_messages(warnings, catalog);
            eprintln!(
                "{} {}",
                "✅ Added column".bold().green(),
                column_name.bright_blue().bold()
            );
            writer::table_document(
                &table,
                &parsed.input_columns,
                Some((column_name.as_str(), column_format.as_deref())),
            )
        }
    };

    match output {
        Some(path) => {
            writer::write_table(&path, &document)?;
            eprintln!("   Written to {}", path.display());
        }
        None => print!("{}", writer::to_yaml_string(&document)?),
    }

    Ok(())
}

/// Execute the migrate command: print the current-schema parameters as JSON
pub fn migrate(params_path: PathBuf) -> CalcResult<()> {
    let catalog = EnglishCatalog;
    let params = load_current_params(&params_path, &catalog)?;
    println!("{}", serde_json::to_string_pretty(&params.to_value()?)?);
    Ok(())
}

/// Execute the operations command: list the operation registry
pub fn operations() -> CalcResult<()> {
    println!("{}", "🧮 Operations".bold().green());
    for op in OPERATIONS.iter() {
        println!(
            "   {:<24} {:<2} {}",
            op.key.bright_blue(),
            op.shape.arity(),
            op.name_template
        );
    }
    Ok(())
}
