use crate::stats::ConversionStats;
use std::fmt;
use thiserror::Error;

/// Result type for the conversion pipeline
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Result type for a single rule rewrite
pub type RuleResult<T> = Result<T, RuleError>;

/// Failure while rewriting one matched occurrence.
///
/// These never abort a conversion: the engine turns them into a warning and
/// moves on to the next rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("malformed argument '{argument}' for {rule}: {reason}")]
    MalformedArgument {
        rule: &'static str,
        argument: String,
        reason: String,
    },

    #[error("{rule} expects {expected} argument(s), found {found}")]
    Arity {
        rule: &'static str,
        expected: usize,
        found: usize,
    },
}

impl RuleError {
    pub fn malformed(rule: &'static str, argument: &str, reason: impl Into<String>) -> Self {
        Self::MalformedArgument {
            rule,
            argument: argument.to_string(),
            reason: reason.into(),
        }
    }
}

/// Fatal conversion errors
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Pipeline failure carrying everything recorded before it happened
    #[error("Failed to convert SQL: {message}")]
    Failed {
        message: String,
        warnings: Vec<String>,
        stats: ConversionStats,
    },
}

impl ConversionError {
    pub fn config(message: impl fmt::Display) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    /// Warnings accumulated up to the failure, empty for non-pipeline errors
    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Failed { warnings, .. } => warnings,
            _ => &[],
        }
    }

    pub fn stats(&self) -> Option<&ConversionStats> {
        match self {
            Self::Failed { stats, .. } => Some(stats),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ConversionError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err)
    }
}

impl From<std::io::Error> for ConversionError {
    fn from(err: std::io::Error) -> Self {
        Self::config(err)
    }
}
