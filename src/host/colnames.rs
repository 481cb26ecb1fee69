//! Output column name cleaning and de-duplication

use super::messages::{I18nMessage, MessageArg};
use super::settings::Settings;
use std::collections::HashSet;

/// Turns candidate column names into valid, unique names.
///
/// Returns the final names (same order as `candidates`) plus non-fatal
/// warnings describing what was changed.
pub trait NameCleaner {
    fn clean_and_deduplicate(
        &self,
        candidates: &[String],
        existing: &[String],
    ) -> (Vec<String>, Vec<I18nMessage>);
}

/// Strips control characters, truncates, fills empty names and numbers
/// duplicates.
#[derive(Debug, Clone, Default)]
pub struct DefaultNameCleaner {
    settings: Settings,
}

#[derive(Default)]
struct WarningTally {
    names: Vec<String>,
}

impl WarningTally {
    fn record(&mut self, name: &str) {
        self.names.push(name.to_string());
    }

    fn into_message(self, id: &str) -> Option<I18nMessage> {
        let first = self.names.first()?.clone();
        Some(
            I18nMessage::new(id)
                .with_arg("n_columns", MessageArg::Int(self.names.len() as i64))
                .with_arg("first_colname", MessageArg::Text(first)),
        )
    }
}

impl DefaultNameCleaner {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    fn max_bytes(&self) -> usize {
        self.settings.max_bytes_per_column_name.max(1)
    }
}

/// Longest prefix of `name` that fits in `max_bytes` without splitting a char.
fn truncate_to_bytes(name: &str, max_bytes: usize) -> &str {
    if name.len() <= max_bytes {
        return name;
    }
    let mut end = max_bytes;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

impl NameCleaner for DefaultNameCleaner {
    fn clean_and_deduplicate(
        &self,
        candidates: &[String],
        existing: &[String],
    ) -> (Vec<String>, Vec<I18nMessage>) {
        let max_bytes = self.max_bytes();
        let mut taken: HashSet<String> = existing.iter().cloned().collect();

        let mut ascii_cleaned = WarningTally::default();
        let mut defaulted = WarningTally::default();
        let mut truncated = WarningTally::default();
        let mut numbered = WarningTally::default();

        let mut result = Vec::with_capacity(candidates.len());

        for (index, candidate) in candidates.iter().enumerate() {
            let mut name: String = candidate.chars().filter(|c| !c.is_ascii_control()).collect();
            if name.len() != candidate.len() {
                ascii_cleaned.record(&name);
            }

            if name.is_empty() {
                name = format!("Column {}", index + 1);
                defaulted.record(&name);
            }

            if name.len() > max_bytes {
                name = truncate_to_bytes(&name, max_bytes).to_string();
                truncated.record(&name);
            }

            if taken.contains(&name) {
                let base = name.clone();
                let mut n = 2;
                loop {
                    let suffix = format!(" {n}");
                    let room = max_bytes.saturating_sub(suffix.len());
                    let attempt = format!("{}{}", truncate_to_bytes(&base, room), suffix);
                    if !taken.contains(&attempt) {
                        name = attempt;
                        break;
                    }
                    n += 1;
                }
                numbered.record(&name);
            }

            taken.insert(name.clone());
            result.push(name);
        }

        let warnings = [
            ascii_cleaned.into_message("util.colnames.warnings.ascii_cleaned"),
            defaulted.into_message("util.colnames.warnings.default"),
            truncated.into_message("util.colnames.warnings.truncated").map(|m| {
                m.with_arg("n_bytes", MessageArg::Int(max_bytes as i64))
            }),
            numbered.into_message("util.colnames.warnings.numbered"),
        ]
        .into_iter()
        .flatten()
        .collect();

        (result, warnings)
    }
}
