/// Impala function rules and their Trino rewrites
pub mod functions;
pub mod matcher;

use crate::config::ArgumentCapture;
use crate::error::RuleResult;
use matcher::{Arity, Matcher, Occurrence};
use once_cell::sync::Lazy;

/// Computed rewrite: captured arguments in, replacement text out
pub type RewriteFn = fn(&[&str]) -> RuleResult<String>;

/// How a matched call is replaced
#[derive(Clone, Copy)]
pub enum Rewrite {
    /// Fixed output regardless of arguments
    Literal(&'static str),
    Computed(RewriteFn),
}

impl Rewrite {
    pub fn apply(&self, args: &[&str]) -> RuleResult<String> {
        match self {
            Rewrite::Literal(text) => Ok((*text).to_string()),
            Rewrite::Computed(rewrite) => rewrite(args),
        }
    }
}

/// A single function rewrite rule
#[derive(Clone)]
pub struct Rule {
    pub name: &'static str,
    pub description: &'static str,
    matcher: Matcher,
    rewrite: Rewrite,
}

impl Rule {
    /// Build a rule matching calls of `function` with the given arity
    pub fn new(
        name: &'static str,
        function: &str,
        arity: Arity,
        rewrite: Rewrite,
        description: &'static str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            description,
            matcher: Matcher::new(function, arity)?,
            rewrite,
        })
    }

    pub fn find_all<'t>(&self, text: &'t str, capture: ArgumentCapture) -> Vec<Occurrence<'t>> {
        self.matcher.find_all(text, capture)
    }

    pub fn count(&self, text: &str, capture: ArgumentCapture) -> usize {
        self.matcher.count(text, capture)
    }

    pub fn rewrite(&self, args: &[&str]) -> RuleResult<String> {
        self.rewrite.apply(args)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.matcher.pattern())
            .field("description", &self.description)
            .finish()
    }
}

/// Rule table in application order.
///
/// Order matters: add_months and adddate produce `date_add(` calls, so they
/// run before the date_add rule sees the text.
static RULE_TABLE: Lazy<Vec<Rule>> = Lazy::new(|| {
    use self::functions as f;
    use self::matcher::Arity::{None as Zero, One, Optional, Two};
    use self::Rewrite::{Computed, Literal};

    #[rustfmt::skip]
    let table = [
        ("add_months", Two, Computed(f::add_months), "Convert add_months to date_add with month interval"),
        ("adddate", Two, Computed(f::adddate), "Convert adddate to date_add with day interval"),
        ("date_add", Two, Computed(f::date_add), "Convert date_add to Trino syntax"),
        ("date_part", Two, Computed(f::date_part), "Convert date_part to extract function"),
        ("date_sub", Two, Computed(f::date_sub), "Convert date_sub to date_add with negative values"),
        ("datediff", Two, Computed(f::datediff), "Convert datediff to date_diff"),
        ("dayofmonth", One, Computed(f::dayofmonth), "Convert dayofmonth to DAY function"),
        ("dayofweek", One, Computed(f::dayofweek), "Convert dayofweek to day_of_week with adjustment"),
        ("from_utc_timestamp", Two, Computed(f::from_utc_timestamp), "Convert from_utc_timestamp to at_timezone"),
        ("to_utc_timestamp", Two, Computed(f::to_utc_timestamp), "Convert to_utc_timestamp to at_timezone with UTC"),
        ("group_concat", One, Computed(f::group_concat), "Convert group_concat to array_join with array_agg"),
        ("ifnull", Two, Computed(f::ifnull), "Convert ifnull to COALESCE"),
        ("instr", Two, Computed(f::instr), "Convert instr to strpos"),
        ("int_months_between", Two, Computed(f::int_months_between), "Convert int_months_between to date_diff with month interval"),
        ("left", Two, Computed(f::left), "Convert left to substring"),
        ("strleft", Two, Computed(f::left), "Convert strleft to substring"),
        ("strright", Two, Computed(f::right), "Convert strright to substring with negative start"),
        ("right", Two, Computed(f::right), "Convert right to substring with negative start"),
        ("to_date", One, Computed(f::to_date), "Convert to_date to date function"),
        ("trunc", Two, Computed(f::trunc), "Convert trunc to date_trunc"),
        ("unix_timestamp", Optional, Computed(f::unix_timestamp), "Convert unix_timestamp to to_unixtime"),
        ("weekofyear", One, Computed(f::weekofyear), "Convert weekofyear to week function"),
        ("current_timestamp", Zero, Literal("CAST(NOW() AS TIMESTAMP)"), "Convert current_timestamp to NOW with CAST"),
    ];

    table
        .into_iter()
        .map(|(name, arity, rewrite, description)| {
            Rule::new(name, name, arity, rewrite, description)
        })
        .collect::<Result<Vec<_>, _>>()
        .expect("built-in rule patterns are valid")
});

/// The built-in rules, in application order
pub fn rule_table() -> &'static [Rule] {
    &RULE_TABLE
}

pub fn find_rule(name: &str) -> Option<&'static Rule> {
    rule_table()
        .iter()
        .find(|rule| rule.name.eq_ignore_ascii_case(name))
}
