use crate::config::ArgumentCapture;
use regex::Regex;
use std::ops::Range;

/// Argument shape a rule accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// `f()`
    None,
    /// `f()` or `f(x)`
    Optional,
    /// `f(x)`
    One,
    /// `f(x, y)`
    Two,
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::None => count == 0,
            Arity::Optional => count <= 1,
            Arity::One => count == 1,
            Arity::Two => count == 2,
        }
    }

    /// Argument part of the greedy pattern, between the parentheses
    fn greedy_arguments(self) -> &'static str {
        match self {
            Arity::None => "",
            Arity::Optional => r"([^)]*)",
            Arity::One => r"([^)]+)",
            Arity::Two => r"([^,]+),\s*([^)]+)",
        }
    }
}

/// One matched call: its byte range in the text and its captured arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence<'t> {
    pub range: Range<usize>,
    pub args: Vec<&'t str>,
}

/// Case-insensitive matcher for calls of a single function
#[derive(Debug, Clone)]
pub struct Matcher {
    arity: Arity,
    greedy: Regex,
    head: Regex,
}

impl Matcher {
    pub fn new(function: &str, arity: Arity) -> Result<Self, regex::Error> {
        let name = regex::escape(function);
        let greedy = Regex::new(&format!(
            r"(?i)\b{}\s*\({}\)",
            name,
            arity.greedy_arguments()
        ))?;
        let head = Regex::new(&format!(r"(?i)\b{}\s*\(", name))?;

        Ok(Self {
            arity,
            greedy,
            head,
        })
    }

    pub fn pattern(&self) -> &str {
        self.greedy.as_str()
    }

    /// All non-overlapping calls in `text`, left to right
    pub fn find_all<'t>(&self, text: &'t str, capture: ArgumentCapture) -> Vec<Occurrence<'t>> {
        match capture {
            ArgumentCapture::Greedy => self.find_greedy(text),
            ArgumentCapture::Balanced => self.find_balanced(text),
        }
    }

    pub fn count(&self, text: &str, capture: ArgumentCapture) -> usize {
        match capture {
            ArgumentCapture::Greedy => self.greedy.find_iter(text).count(),
            ArgumentCapture::Balanced => self.find_balanced(text).len(),
        }
    }

    fn find_greedy<'t>(&self, text: &'t str) -> Vec<Occurrence<'t>> {
        self.greedy
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let args = caps
                    .iter()
                    .skip(1)
                    .map(|group| group.map_or("", |m| m.as_str()))
                    .collect();
                Some(Occurrence {
                    range: whole.range(),
                    args,
                })
            })
            .collect()
    }

    fn find_balanced<'t>(&self, text: &'t str) -> Vec<Occurrence<'t>> {
        let mut found = Vec::new();
        let mut pos = 0;

        while let Some(head) = self.head.find_at(text, pos) {
            match scan_arguments(text, head.end()) {
                Some((args, end))
                    if self.arity.accepts(args.len()) && args.iter().all(|a| !a.is_empty()) =>
                {
                    found.push(Occurrence {
                        range: head.start()..end,
                        args,
                    });
                    pos = end;
                }
                _ => pos = head.end(),
            }
        }

        found
    }
}

/// Split the argument list starting right after an opening parenthesis.
///
/// Returns the trimmed top-level arguments and the byte offset just past the
/// matching closing parenthesis, or `None` if the list is never closed.
fn scan_arguments(text: &str, start: usize) -> Option<(Vec<&str>, usize)> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut segment_start = start;

    for (offset, ch) in text[start..].char_indices() {
        let idx = start + offset;

        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            ')' => {
                let last = text[segment_start..idx].trim();
                if !(args.is_empty() && last.is_empty()) {
                    args.push(last);
                }
                return Some((args, idx + 1));
            }
            ',' if depth == 0 => {
                args.push(text[segment_start..idx].trim());
                segment_start = idx + 1;
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greedy_captures_verbatim() {
        let matcher = Matcher::new("ifnull", Arity::Two).unwrap();
        let found = matcher.find_all("SELECT IFNULL(a,   b ) FROM t", ArgumentCapture::Greedy);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].args, vec!["a", "b "]);
        assert_eq!(found[0].range, 7..22);
    }

    #[test]
    fn test_greedy_misses_nested_call() {
        let matcher = Matcher::new("ifnull", Arity::Two).unwrap();
        let found = matcher.find_all("ifnull(f(x, y), 0)", ArgumentCapture::Greedy);

        // the first argument stops at the inner comma, the second at the inner ')'
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].args, vec!["f(x", "y"]);
        assert_eq!(found[0].range, 0..14);
    }

    #[test]
    fn test_balanced_handles_nested_call() {
        let matcher = Matcher::new("ifnull", Arity::Two).unwrap();
        let found = matcher.find_all("ifnull(f(x, y), 0) + 1", ArgumentCapture::Balanced);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].args, vec!["f(x, y)", "0"]);
        assert_eq!(found[0].range, 0..18);
    }

    #[test]
    fn test_balanced_ignores_parens_in_literals() {
        let matcher = Matcher::new("instr", Arity::Two).unwrap();
        let found = matcher.find_all("instr(name, ')(,')", ArgumentCapture::Balanced);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].args, vec!["name", "')(,'"]);
    }

    #[test]
    fn test_balanced_enforces_arity() {
        let matcher = Matcher::new("date_add", Arity::Two).unwrap();
        let text = "date_add('day', 5, CAST(x AS TIMESTAMP))";

        assert_eq!(matcher.count(text, ArgumentCapture::Balanced), 0);
        assert_eq!(matcher.count(text, ArgumentCapture::Greedy), 1);
    }

    #[test]
    fn test_balanced_rejects_empty_argument() {
        let matcher = Matcher::new("ifnull", Arity::Two).unwrap();

        assert_eq!(matcher.count("ifnull(a, )", ArgumentCapture::Balanced), 0);
        assert_eq!(matcher.count("ifnull( , b)", ArgumentCapture::Balanced), 0);
        assert_eq!(matcher.count("ifnull(a, ) + ifnull(b, 0)", ArgumentCapture::Balanced), 1);
    }

    #[test]
    fn test_balanced_unclosed_call() {
        let matcher = Matcher::new("to_date", Arity::One).unwrap();
        assert!(matcher
            .find_all("to_date(x", ArgumentCapture::Balanced)
            .is_empty());
    }

    #[test]
    fn test_word_boundary() {
        let left = Matcher::new("left", Arity::Two).unwrap();
        let trunc = Matcher::new("trunc", Arity::Two).unwrap();

        assert_eq!(left.count("strleft(s, 3)", ArgumentCapture::Greedy), 0);
        assert_eq!(trunc.count("date_trunc('month', d)", ArgumentCapture::Greedy), 0);
        assert_eq!(left.count("LEFT (s, 3)", ArgumentCapture::Greedy), 1);
    }

    #[test]
    fn test_optional_and_empty_arguments() {
        let matcher = Matcher::new("unix_timestamp", Arity::Optional).unwrap();

        let greedy = matcher.find_all("unix_timestamp()", ArgumentCapture::Greedy);
        assert_eq!(greedy[0].args, vec![""]);

        let balanced = matcher.find_all("unix_timestamp( )", ArgumentCapture::Balanced);
        assert!(balanced[0].args.is_empty());

        let none = Matcher::new("current_timestamp", Arity::None).unwrap();
        assert_eq!(none.count("CURRENT_TIMESTAMP()", ArgumentCapture::Greedy), 1);
        assert_eq!(none.count("current_timestamp(1)", ArgumentCapture::Balanced), 0);
    }
}
