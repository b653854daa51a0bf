use crate::config::{ArgumentCapture, ConversionConfig};
use crate::error::RuleResult;
use crate::rules::{rule_table, Rule};
use crate::stats::ConversionStats;
use log::Level;

/// Applies the rule table to SQL text, one full pass per rule
pub struct RuleEngine<'r> {
    rules: &'r [Rule],
    capture: ArgumentCapture,
    trace_level: Level,
}

impl RuleEngine<'static> {
    /// Engine over the built-in rule table
    pub fn new(config: &ConversionConfig) -> Self {
        Self::with_rules(rule_table(), config)
    }
}

impl<'r> RuleEngine<'r> {
    pub fn with_rules(rules: &'r [Rule], config: &ConversionConfig) -> Self {
        Self {
            rules,
            capture: config.argument_capture,
            trace_level: if config.debug {
                Level::Info
            } else {
                Level::Debug
            },
        }
    }

    /// Run every rule in order.
    ///
    /// A failing rule leaves the text as it was before that rule, adds one
    /// warning and one error to the stats, and the next rule still runs.
    pub fn run(&self, sql: &str, warnings: &mut Vec<String>, stats: &mut ConversionStats) -> String {
        let mut current = sql.to_string();

        for rule in self.rules {
            log::log!(self.trace_level, "Applying {} conversion...", rule.name);

            let before = self.occurrences(rule, &current);
            match self.apply_rule(rule, &current) {
                Ok((converted, conversions)) => {
                    if let (Some(before), Some(after)) = (before, self.occurrences(rule, &converted)) {
                        log::log!(
                            self.trace_level,
                            "  {}: {} match(es) before, {} after",
                            rule.name,
                            before,
                            after
                        );
                    }
                    log::log!(
                        self.trace_level,
                        "  {}: {} conversions applied",
                        rule.name,
                        conversions
                    );

                    stats.record(rule.name, conversions);
                    current = converted;
                }
                Err(e) => {
                    log::warn!("Rule '{}' failed: {}", rule.name, e);
                    warnings.push(format!(
                        "Warning: Failed to apply {} conversion: {}",
                        rule.name, e
                    ));
                    stats.record_error();
                }
            }
        }

        current
    }

    /// Rewrite every occurrence of `rule` in `sql`.
    ///
    /// Returns the new text and the number of rewrites performed. Any rewrite
    /// error discards the whole pass for this rule.
    pub fn apply_rule(&self, rule: &Rule, sql: &str) -> RuleResult<(String, usize)> {
        let occurrences = rule.find_all(sql, self.capture);
        if occurrences.is_empty() {
            return Ok((sql.to_string(), 0));
        }

        let mut result = String::with_capacity(sql.len());
        let mut last = 0;
        for occurrence in &occurrences {
            result.push_str(&sql[last..occurrence.range.start]);
            result.push_str(&rule.rewrite(&occurrence.args)?);
            last = occurrence.range.end;
        }
        result.push_str(&sql[last..]);

        Ok((result, occurrences.len()))
    }

    /// Occurrence count for the trace, skipped when the trace is filtered out
    fn occurrences(&self, rule: &Rule, sql: &str) -> Option<usize> {
        log::log_enabled!(self.trace_level).then(|| rule.count(sql, self.capture))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use crate::rules::matcher::Arity;
    use crate::rules::{find_rule, Rewrite};

    fn run(engine: &RuleEngine<'_>, sql: &str) -> (String, Vec<String>, ConversionStats) {
        let mut warnings = Vec::new();
        let mut stats = ConversionStats::new();
        let result = engine.run(sql, &mut warnings, &mut stats);
        (result, warnings, stats)
    }

    fn always_fails(args: &[&str]) -> RuleResult<String> {
        Err(RuleError::malformed("broken", args.first().copied().unwrap_or(""), "cannot rewrite"))
    }

    #[test]
    fn test_apply_rule_counts_rewrites() {
        let engine = RuleEngine::new(&ConversionConfig::default());
        let rule = find_rule("ifnull").unwrap();

        let (sql, count) = engine
            .apply_rule(rule, "SELECT ifnull(a, 0), IFNULL(b, 1) FROM t")
            .unwrap();
        assert_eq!(sql, "SELECT COALESCE(a, 0), COALESCE(b, 1) FROM t");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_date_add_counted_at_rewrite_site() {
        let engine = RuleEngine::new(&ConversionConfig::default());
        let rule = find_rule("date_add").unwrap();

        let (sql, count) = engine.apply_rule(rule, "date_add(col, 5)").unwrap();
        assert_eq!(sql, "date_add('day', 5, CAST(col AS TIMESTAMP))");
        assert_eq!(count, 1);

        // the output still matches the greedy date_add pattern, so subtracting
        // occurrence counts would report zero conversions here
        assert_eq!(rule.count(&sql, ArgumentCapture::Greedy), 1);
    }

    #[test]
    fn test_failed_rule_is_isolated() {
        let rules = vec![
            Rule::new(
                "broken",
                "ifnull",
                Arity::Two,
                Rewrite::Computed(always_fails),
                "Always fails",
            )
            .unwrap(),
            find_rule("ifnull").unwrap().clone(),
            find_rule("instr").unwrap().clone(),
        ];
        let engine = RuleEngine::with_rules(&rules, &ConversionConfig::default());

        let (sql, warnings, stats) = run(&engine, "SELECT ifnull(a, 0), instr(s, 'x')");

        assert_eq!(sql, "SELECT COALESCE(a, 0), strpos(s, 'x')");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Warning: Failed to apply broken conversion:"));
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.total_conversions, 2);
        assert!(!stats.functions_converted.contains_key("broken"));
    }

    #[test]
    fn test_partial_failure_keeps_previous_text() {
        let engine = RuleEngine::new(&ConversionConfig::default());
        let sql = "SELECT date_add(a, 1), date_add(b, interval 3)";

        let (result, warnings, stats) = run(&engine, sql);

        // the second call is malformed, so neither call is rewritten
        assert_eq!(result, sql);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("date_add"));
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.total_conversions, 0);
    }

    #[test]
    fn test_rules_run_in_table_order() {
        let engine = RuleEngine::new(&ConversionConfig::default());

        // add_months output is visible to the date_add rule. Balanced capture
        // rejects the 3-argument call, greedy capture rewrites it again.
        let balanced = RuleEngine::new(
            &ConversionConfig::default().with_argument_capture(ArgumentCapture::Balanced),
        );
        let (sql, _, stats) = run(&balanced, "add_months(created_date, 3)");
        assert_eq!(sql, "date_add('month', 3, CAST(created_date AS TIMESTAMP))");
        assert_eq!(stats.conversions_for("add_months"), 1);
        assert_eq!(stats.conversions_for("date_add"), 0);

        let (_, _, stats) = run(&engine, "add_months(created_date, 3)");
        assert_eq!(stats.conversions_for("add_months"), 1);
        assert_eq!(stats.conversions_for("date_add"), 1);
    }

    #[test]
    fn test_no_matches_leaves_text() {
        let engine = RuleEngine::new(&ConversionConfig::default());
        let (sql, warnings, stats) = run(&engine, "SELECT id FROM users");
        assert_eq!(sql, "SELECT id FROM users");
        assert!(warnings.is_empty());
        assert_eq!(stats, ConversionStats::default());
    }
}
