use crate::config::IdentifierRename;
use crate::error::{ConversionError, ConversionResult};
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

static TYPE_RENAMES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)\bstring\b", "VARCHAR"),
        (r"(?i)\bfloat\b", "DOUBLE"),
        (r"(?i)\bint\b", "INTEGER"),
        (r"(?i)\bbigint\b", "BIGINT"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

static INTERVAL_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\binterval (\d+) ").unwrap());

static BACKSLASH_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\+").unwrap());

static IDENTIFIER_RENAMES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)default\.gb_format_datetime", "gb_format_datetime"),
        (r"(?i)default\.gb_json_parser", "gb_json_parser"),
        (r"(?i)default\.gb_to_est", "gb_to_est"),
        (r"(?i)default\.gb_completed_months", "gb_completed_months"),
        (r"(?i)\btempdb\b", "caastle_insights"),
        (r"(?i)'EDT'", "'EST5EDT'"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

/// Unconditional text substitutions applied after the rule table.
///
/// None of these are aware of string literals: `'int'` inside a quoted value
/// is renamed just like the type keyword.
#[derive(Debug, Default)]
pub struct PostProcessor {
    extra_renames: Vec<IdentifierRename>,
}

impl PostProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_renames(extra_renames: Vec<IdentifierRename>) -> Self {
        Self { extra_renames }
    }

    /// Apply every substitution in order
    pub fn process(&self, sql: &str) -> ConversionResult<String> {
        let mut result = self.rename_types(sql);
        result = result.replace('`', "\"");
        result = self.quote_interval_literals(&result);
        result = self.normalize_backslashes(&result);
        result = self.rename_identifiers(&result)?;
        Ok(result)
    }

    fn rename_types(&self, sql: &str) -> String {
        TYPE_RENAMES
            .iter()
            .fold(sql.to_string(), |acc, (regex, name)| {
                regex.replace_all(&acc, NoExpand(name)).into_owned()
            })
    }

    /// `interval 3 ` becomes `INTERVAL '3' `
    fn quote_interval_literals(&self, sql: &str) -> String {
        INTERVAL_LITERAL
            .replace_all(sql, "INTERVAL '${1}' ")
            .into_owned()
    }

    /// Any run of backslashes collapses to exactly two
    fn normalize_backslashes(&self, sql: &str) -> String {
        BACKSLASH_RUN
            .replace_all(sql, NoExpand(r"\\"))
            .into_owned()
    }

    fn rename_identifiers(&self, sql: &str) -> ConversionResult<String> {
        let mut result = IDENTIFIER_RENAMES
            .iter()
            .fold(sql.to_string(), |acc, (regex, name)| {
                regex.replace_all(&acc, NoExpand(name)).into_owned()
            });

        for rename in &self.extra_renames {
            let regex = Regex::new(&format!("(?i){}", rename.pattern)).map_err(|e| {
                ConversionError::InvalidPattern {
                    pattern: rename.pattern.clone(),
                    source: e,
                }
            })?;
            result = regex
                .replace_all(&result, NoExpand(&rename.replacement))
                .into_owned();
        }

        Ok(result)
    }
}
