use serde::Serialize;
use std::collections::BTreeMap;

/// Per-call conversion statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub total_conversions: usize,
    /// Only rules with at least one conversion appear here
    pub functions_converted: BTreeMap<String, usize>,
    pub errors: usize,
}

impl ConversionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `count` conversions for `rule`. A zero count leaves the stats untouched.
    pub fn record(&mut self, rule: &str, count: usize) {
        if count == 0 {
            return;
        }
        *self.functions_converted.entry(rule.to_string()).or_insert(0) += count;
        self.total_conversions += count;
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    pub fn conversions_for(&self, rule: &str) -> usize {
        self.functions_converted.get(rule).copied().unwrap_or(0)
    }
}

/// Successful conversion result: the text, advisory warnings and stats
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionOutput {
    pub sql: String,
    pub warnings: Vec<String>,
    pub stats: ConversionStats,
}

impl ConversionOutput {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_parts(self) -> (String, Vec<String>, ConversionStats) {
        (self.sql, self.warnings, self.stats)
    }
}
