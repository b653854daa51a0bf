//! Computed rewrites for the rule table.
//!
//! Every function receives the captured arguments verbatim and builds the
//! Trino call around them; argument text is never parsed.

use crate::error::{RuleError, RuleResult};

fn arg<'a>(
    rule: &'static str,
    args: &[&'a str],
    index: usize,
    expected: usize,
) -> RuleResult<&'a str> {
    args.get(index).copied().ok_or(RuleError::Arity {
        rule,
        expected,
        found: args.len(),
    })
}

fn two<'a>(rule: &'static str, args: &[&'a str]) -> RuleResult<(&'a str, &'a str)> {
    Ok((arg(rule, args, 0, 2)?, arg(rule, args, 1, 2)?))
}

fn one<'a>(rule: &'static str, args: &[&'a str]) -> RuleResult<&'a str> {
    arg(rule, args, 0, 1)
}

/// Interval argument of date_add / date_sub
enum Interval<'a> {
    /// Bare amount, unit defaults to day
    Days(&'a str),
    /// `interval <amount> <unit>`
    Explicit { amount: &'a str, unit: &'a str },
}

fn parse_interval<'a>(rule: &'static str, value: &'a str) -> RuleResult<Interval<'a>> {
    let tokens: Vec<&'a str> = value.split_whitespace().collect();
    match tokens.as_slice() {
        [_] => Ok(Interval::Days(value)),
        &[_, amount, unit, ..] => Ok(Interval::Explicit {
            amount,
            unit: unit.strip_suffix('s').unwrap_or(unit),
        }),
        _ => Err(RuleError::malformed(
            rule,
            value,
            "expected a single value or 'interval <amount> <unit>'",
        )),
    }
}

pub(crate) fn date_add(args: &[&str]) -> RuleResult<String> {
    let (date, value) = two("date_add", args)?;
    Ok(match parse_interval("date_add", value)? {
        Interval::Days(days) => format!("date_add('day', {}, CAST({} AS TIMESTAMP))", days, date),
        Interval::Explicit { amount, unit } => {
            format!("date_add('{}', {}, {})", unit, amount, date)
        }
    })
}

pub(crate) fn date_sub(args: &[&str]) -> RuleResult<String> {
    let (date, value) = two("date_sub", args)?;
    Ok(match parse_interval("date_sub", value)? {
        Interval::Days(days) => format!("date_add('day', -{}, {})", days, date),
        Interval::Explicit { amount, unit } => {
            format!("date_add('{}', -{}, {})", unit, amount, date)
        }
    })
}

pub(crate) fn date_part(args: &[&str]) -> RuleResult<String> {
    let (part, date) = two("date_part", args)?;
    let part = part.trim().to_lowercase();
    let unit = match part.as_str() {
        "'year'" => "year".to_string(),
        "'month'" => "month".to_string(),
        "'day'" => "day".to_string(),
        "'hour'" => "hour".to_string(),
        "'minute'" => "minute".to_string(),
        "'second'" => "second".to_string(),
        other => other.replace('\'', ""),
    };

    Ok(format!("extract({} FROM {})", unit, date.trim()))
}

pub(crate) fn add_months(args: &[&str]) -> RuleResult<String> {
    let (date, months) = two("add_months", args)?;
    Ok(format!("date_add('month', {}, CAST({} AS TIMESTAMP))", months, date))
}

pub(crate) fn adddate(args: &[&str]) -> RuleResult<String> {
    let (date, days) = two("adddate", args)?;
    Ok(format!("date_add('day', {}, {})", days, date))
}

pub(crate) fn datediff(args: &[&str]) -> RuleResult<String> {
    let (end, start) = two("datediff", args)?;
    Ok(format!("date_diff('day', {}, {})", start, end))
}

pub(crate) fn dayofmonth(args: &[&str]) -> RuleResult<String> {
    Ok(format!("DAY({})", one("dayofmonth", args)?))
}

pub(crate) fn dayofweek(args: &[&str]) -> RuleResult<String> {
    // Impala counts from Sunday = 1, Trino from Monday = 1
    let date = one("dayofweek", args)?;
    Ok(format!(
        "IF(day_of_week({0})+1 > 7, 1, day_of_week({0})+1)",
        date
    ))
}

pub(crate) fn from_utc_timestamp(args: &[&str]) -> RuleResult<String> {
    let (ts, zone) = two("from_utc_timestamp", args)?;
    Ok(format!("at_timezone({}, {})", ts, zone))
}

pub(crate) fn to_utc_timestamp(args: &[&str]) -> RuleResult<String> {
    let (ts, _zone) = two("to_utc_timestamp", args)?;
    Ok(format!("at_timezone({}, 'UTC')", ts))
}

pub(crate) fn group_concat(args: &[&str]) -> RuleResult<String> {
    Ok(format!(
        "array_join(array_agg({}), ',')",
        one("group_concat", args)?
    ))
}

pub(crate) fn ifnull(args: &[&str]) -> RuleResult<String> {
    let (value, fallback) = two("ifnull", args)?;
    Ok(format!("COALESCE({}, {})", value, fallback))
}

pub(crate) fn instr(args: &[&str]) -> RuleResult<String> {
    let (haystack, needle) = two("instr", args)?;
    Ok(format!("strpos({}, {})", haystack, needle))
}

pub(crate) fn int_months_between(args: &[&str]) -> RuleResult<String> {
    let (end, start) = two("int_months_between", args)?;
    Ok(format!("date_diff('month', {}, {})", start, end))
}

pub(crate) fn left(args: &[&str]) -> RuleResult<String> {
    let (s, n) = two("left", args)?;
    Ok(format!("substring({}, 1, {})", s, n))
}

pub(crate) fn right(args: &[&str]) -> RuleResult<String> {
    let (s, n) = two("right", args)?;
    Ok(format!("substring({}, -{})", s, n))
}

pub(crate) fn to_date(args: &[&str]) -> RuleResult<String> {
    Ok(format!("date({})", one("to_date", args)?))
}

pub(crate) fn trunc(args: &[&str]) -> RuleResult<String> {
    let (date, unit) = two("trunc", args)?;
    Ok(format!("date_trunc({}, {})", unit, date))
}

pub(crate) fn unix_timestamp(args: &[&str]) -> RuleResult<String> {
    let value = args.first().copied().filter(|v| !v.is_empty()).unwrap_or("now()");
    Ok(format!("to_unixtime({})", value))
}

pub(crate) fn weekofyear(args: &[&str]) -> RuleResult<String> {
    Ok(format!("week({})", one("weekofyear", args)?))
}
