/// Heuristic checks on converted SQL. Read-only; never changes the text.
pub struct SqlValidator;

/// Function calls that should not survive a conversion
const UNCONVERTED_CALLS: &[(&str, &str)] = &[
    ("add_months(", "add_months"),
    ("datediff(", "datediff"),
    ("current_timestamp()", "current_timestamp"),
];

impl SqlValidator {
    pub fn new() -> Self {
        Self
    }

    /// Scan `sql` and collect advisory warnings
    pub fn validate(&self, sql: &str) -> ValidationResult {
        let mut result = ValidationResult::new();
        let lowered = sql.to_lowercase();

        for (needle, function) in UNCONVERTED_CALLS {
            if lowered.contains(needle) {
                result.warnings.push(format!(
                    "Potential unconverted {} function detected",
                    function
                ));
            }
        }

        if !self.parentheses_balanced(sql) {
            result.warnings.push("Unbalanced parentheses detected".to_string());
        }

        if lowered.contains("group_concat(") {
            result
                .warnings
                .push("group_concat function detected - verify conversion to array_join".to_string());
        }

        result
    }

    /// Compares counts only; `)(` is considered balanced
    pub fn parentheses_balanced(&self, sql: &str) -> bool {
        sql.matches('(').count() == sql.matches(')').count()
    }
}

impl Default for SqlValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validation outcome. Warnings are advisory and never fail a conversion.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
